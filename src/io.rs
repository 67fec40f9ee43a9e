//! File I/O for log input and JSON export.

use crate::error::Result;
use crate::validation::validate_log_path;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a Gaussian log into memory after validating its path.
///
/// # Arguments
///
/// * `path` - Path of the `.log` file
///
/// # Returns
///
/// Returns the complete log text, or the validation or I/O error that
/// prevented reading it.
pub fn read_log(path: &Path) -> Result<String> {
    validate_log_path(path)?;
    let text = fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Default JSON export path for a log: same stem, `.json` extension, placed
/// in `output_dir` when one is configured and next to the log otherwise.
///
/// # Examples
///
/// ```
/// use gaussnbo::io::export_path;
/// use std::path::Path;
///
/// let path = export_path(Path::new("runs/methane.log"), None);
/// assert_eq!(path, Path::new("runs/methane.json"));
///
/// let path = export_path(Path::new("runs/methane.log"), Some(Path::new("out")));
/// assert_eq!(path, Path::new("out/methane.json"));
/// ```
pub fn export_path(log_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = log_path.with_extension("json");
    match (output_dir, file_name.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file_name,
    }
}

/// Writes `json` to `path`, creating missing parent directories.
pub fn write_json(json: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    info!("Wrote {}", path.display());
    Ok(())
}
