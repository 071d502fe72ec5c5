//! Exit codes for the CLI

use stagelog_core::{ChangelogError, StagelogError};

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// Filesystem error
pub const IO_ERROR: i32 = 6;

/// Map a command failure to the process exit code
pub fn for_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<std::io::Error>().is_some() {
        return IO_ERROR;
    }
    let Some(error) = error.downcast_ref::<StagelogError>() else {
        return ERROR;
    };
    if error.is_precondition() {
        return VALIDATION_ERROR;
    }
    match error.root() {
        StagelogError::Config(_) => CONFIG_ERROR,
        StagelogError::Version(_) => VERSION_ERROR,
        StagelogError::Changelog(
            ChangelogError::Read { .. }
            | ChangelogError::Write { .. }
            | ChangelogError::CreateDirectory { .. }
            | ChangelogError::Move { .. },
        ) => IO_ERROR,
        _ => ERROR,
    }
}
