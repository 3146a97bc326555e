use std::process::ExitCode;

/// Process exit status of a covfix run, suitable for gating CI.
///
/// - `Success` (0): attributes already correct, or rewritten with `--apply`
/// - `Failure` (1): classes need new attributes (`check`, `fix` dry-run), or
///   `resolve` was given a class that is not a test
/// - `Error` (2): a PHP file could not be parsed, or the run aborted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Rewrites are pending.
    Failure,
    /// Parse failure or invalid input.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
