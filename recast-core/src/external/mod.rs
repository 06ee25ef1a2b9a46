//! Adapters around the external encoder and prober binaries.
//!
//! All invocations build structured argument vectors and spawn the
//! configured binary directly; no shell is involved, so paths containing
//! whitespace or metacharacters need no escaping.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

pub mod encoder;
pub mod prober;

pub use encoder::{EncodeProfile, extract_frames, run_encode};
pub use prober::{DurationTolerance, HmsDuration, export_metadata, probe_duration};

/// Captured streams of a finished tool invocation.
pub(crate) struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Checks that a required external binary is present and executable.
///
/// Spawns the binary with `-version` and discards its output; only the
/// ability to start the process matters here.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the binary does not exist
/// * `CoreError::CommandStart` - the binary exists but failed to start
pub fn check_dependency(bin: &Path) -> CoreResult<()> {
    let result = Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", bin.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found", bin.display());
            Err(CoreError::DependencyNotFound(bin.display().to_string()))
        }
        Err(e) => Err(command_start_error(bin, e)),
    }
}

/// Runs a tool to completion, capturing both output streams fully.
///
/// A non-zero exit status becomes `CoreError::CommandFailed` carrying the
/// captured stderr as diagnostic text.
pub(crate) fn run_captured<I, S>(bin: &Path, args: I) -> CoreResult<CapturedOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(bin)
        .args(args)
        .output()
        .map_err(|e| command_start_error(bin, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(command_failed_error(bin, output.status, &stderr));
    }

    Ok(CapturedOutput { stdout, stderr })
}
