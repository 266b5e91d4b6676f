//! Exit status codes for the CLI
//!
//! - 0: Success
//! - 1: Any error (bad curl command, missing entity, request failure with
//!   `--check-status`, config problems)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Exit status for a completed request.
    ///
    /// Transport failures are always errors. HTTP error statuses only count
    /// when `check_status` is set.
    pub fn from_response(status_code: u16, is_error: bool, check_status: bool) -> Self {
        if is_error {
            return ExitStatus::Error;
        }
        if !check_status || (200..300).contains(&status_code) {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}
