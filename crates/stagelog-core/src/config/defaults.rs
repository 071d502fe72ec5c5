//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "stagelog.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "stagelog.yaml";

/// Default changelog root, relative to the working directory
pub const DEFAULT_CHANGELOG_DIRECTORY: &str = "src/changelog";

/// Default export directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target/site/changelog";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".stagelog.toml",
        ".stagelog.yaml",
    ]
}

/// License comment block prepended to generated AsciiDoc files
pub const DEFAULT_LICENSE_HEADER: &str = "////
Licensed to the Apache Software Foundation (ASF) under one or more
contributor license agreements. See the NOTICE file distributed with
this work for additional information regarding copyright ownership.
The ASF licenses this file to You under the Apache License, Version 2.0
(the \"License\"); you may not use this file except in compliance with
the License. You may obtain a copy of the License at

    https://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
////
";

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# stagelog configuration

[changelog]
directory = "src/changelog"

[export]
output_directory = "target/site/changelog"
# license_header = ""
"#;
