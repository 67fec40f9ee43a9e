//! Input validation for log files.
//!
//! Validation runs before any file content is read, so a wrong path is
//! reported as such and never as a parse failure.

use crate::error::{NboError, Result};
use log::debug;
use std::path::Path;

/// File extension Gaussian gives its output logs.
pub const LOG_EXTENSION: &str = "log";

/// Validates that `path` names an existing Gaussian log file.
///
/// The extension is checked first, case-insensitively, so a mistyped output
/// path is rejected even when it does not exist.
///
/// # Arguments
///
/// * `path` - Path of the log to validate
///
/// # Returns
///
/// Returns `Ok(())` when the path carries a `.log` extension and resolves to a
/// regular file, [`NboError::InvalidFormat`] when the extension is wrong and
/// [`NboError::FileNotFound`] when nothing exists at the path.
///
/// # Examples
///
/// ```
/// use gaussnbo::error::NboError;
/// use gaussnbo::validation::validate_log_path;
/// use std::path::Path;
///
/// match validate_log_path(Path::new("input.gjf")) {
///     Err(NboError::InvalidFormat(msg)) => assert!(msg.contains("input.gjf")),
///     other => panic!("unexpected result: {:?}", other),
/// }
/// ```
pub fn validate_log_path(path: &Path) -> Result<()> {
    let is_log = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LOG_EXTENSION));
    if !is_log {
        return Err(NboError::InvalidFormat(format!(
            "'{}' is not a .{} file",
            path.display(),
            LOG_EXTENSION
        )));
    }

    if !path.is_file() {
        return Err(NboError::FileNotFound(path.to_path_buf()));
    }

    debug!("Validated log path {}", path.display());
    Ok(())
}
