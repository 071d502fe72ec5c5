//! Release metadata documents (`.release.xml`)

use std::path::Path;

use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use stagelog_core::{ChangelogError, Result};
use tracing::{debug, instrument};

/// Namespace written on generated release documents
pub const CHANGELOG_NAMESPACE: &str = "http://logging.apache.org/log4j/changelog";

const SCHEMA_LOCATION: &str =
    "http://logging.apache.org/log4j/changelog https://logging.apache.org/log4j/changelog-0.1.0.xsd";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Version and date of a release.
///
/// `date` is `None` only for the synthetic upcoming release of a major
/// version line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogRelease {
    pub version: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDocument {
    #[serde(rename = "@version")]
    version: String,
    #[serde(rename = "@date")]
    date: Option<String>,
}

impl ChangelogRelease {
    /// Create a dated release
    pub fn new(version: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            version: version.into(),
            date: Some(date),
        }
    }

    /// The placeholder release collecting staged changes of a major version line
    pub fn upcoming(version_major: u64) -> Self {
        Self {
            version: format!("{}.x.x", version_major),
            date: None,
        }
    }

    /// Whether this is the upcoming placeholder
    pub fn is_upcoming(&self) -> bool {
        self.date.is_none()
    }

    /// Read a release from an XML file.
    ///
    /// Stored releases are always dated; only [`ChangelogRelease::upcoming`] has no date.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from_xml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |reason: String| ChangelogError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let document: ReleaseDocument =
            quick_xml::de::from_str(&content).map_err(|e| parse_error(e.to_string()))?;

        let version = document.version.trim();
        if version.is_empty() {
            return Err(parse_error("release `version` cannot be blank".to_string()).into());
        }

        let date = document.date.as_deref().map(str::trim).unwrap_or_default();
        if date.is_empty() {
            return Err(parse_error("release `date` cannot be blank".to_string()).into());
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| parse_error(format!("invalid release date `{}`: {}", date, e)))?;

        debug!(version, ?date, "release metadata read");
        Ok(Self::new(version, date))
    }

    /// Serialize to an XML document
    pub fn to_xml_string(&self) -> std::result::Result<String, String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| e.to_string())?;

        let date = self.date.map(|date| date.format(DATE_FORMAT).to_string());
        let mut attributes = vec![
            ("xmlns", CHANGELOG_NAMESPACE),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ];
        if let Some(date) = date.as_deref() {
            attributes.push(("date", date));
        }
        attributes.push(("version", self.version.as_str()));

        writer
            .create_element("release")
            .with_attributes(attributes)
            .write_empty()
            .map_err(|e| e.to_string())?;

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
        xml.push('\n');
        Ok(xml)
    }

    /// Write to an XML file, replacing whatever is there
    #[instrument(skip_all, fields(path = %path.display(), version = %self.version))]
    pub fn write_to_xml_file(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml_string().map_err(|reason| ChangelogError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, reason),
        })?;
        std::fs::write(path, xml).map_err(|source| ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("release metadata written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_read_release() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");
        std::fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<release xmlns="http://logging.apache.org/log4j/changelog"
         date="2022-09-09"
         version="2.19.0"/>
"#,
        )
        .unwrap();

        let release = ChangelogRelease::read_from_xml_file(&path).unwrap();
        assert_eq!(release, ChangelogRelease::new("2.19.0", date("2022-09-09")));
        assert!(!release.is_upcoming());
    }

    #[test]
    fn test_read_release_without_date() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");

        for xml in [r#"<release version="3.0.0"/>"#, r#"<release version="3.0.0" date=" "/>"#] {
            std::fs::write(&path, xml).unwrap();
            let err = ChangelogRelease::read_from_xml_file(&path).unwrap_err();
            assert!(matches!(
                err,
                stagelog_core::StagelogError::Changelog(ChangelogError::Parse { .. })
            ));
            assert!(err.to_string().contains(".release.xml"));
        }
    }

    #[test]
    fn test_read_release_with_bad_date() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");
        std::fs::write(&path, r#"<release version="3.0.0" date="09/09/2022"/>"#).unwrap();

        let err = ChangelogRelease::read_from_xml_file(&path).unwrap_err();
        assert!(err.to_string().contains(".release.xml"));
    }

    #[test]
    fn test_read_release_without_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");
        std::fs::write(&path, r#"<release date="2022-09-09"/>"#).unwrap();

        assert!(ChangelogRelease::read_from_xml_file(&path).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");
        let release = ChangelogRelease::new("2.20.0", date("2023-02-17"));

        release.write_to_xml_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(content.contains("date=\"2023-02-17\""));
        assert!(content.contains("version=\"2.20.0\""));

        assert_eq!(ChangelogRelease::read_from_xml_file(&path).unwrap(), release);
    }

    #[test]
    fn test_write_omits_missing_date() {
        let xml = ChangelogRelease::upcoming(3).to_xml_string().unwrap();
        assert!(xml.contains("version=\"3.x.x\""));
        assert!(!xml.contains("date="));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".release.xml");
        std::fs::write(&path, "<release version=\"0.0.1\" date=\"2000-01-01\" legacy=\"yes\"/>")
            .unwrap();

        ChangelogRelease::new("2.20.0", date("2023-02-17"))
            .write_to_xml_file(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("legacy"));
        assert_eq!(content.matches("<release").count(), 1);
    }

    #[test]
    fn test_upcoming_release() {
        let release = ChangelogRelease::upcoming(2);
        assert_eq!(release.version, "2.x.x");
        assert!(release.is_upcoming());
    }
}
