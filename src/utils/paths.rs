use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "quantum-chat";

// Maximum transcript size accepted for loading: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default config file: `<config_dir>/quantum-chat/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(base.join(APP_DIR_NAME).join("config.toml"))
}

/// Default log file for the interactive UI: `<data_local_dir>/quantum-chat/quantum-chat.log`
pub fn default_log_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Failed to get platform data directory")?;
    Ok(base.join(APP_DIR_NAME).join("quantum-chat.log"))
}

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle so the size check and the subsequent read see the
/// same file.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or the file is larger than 10MB.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use quantum_chat::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/home/alice/chat.jsonl");
/// // "~/chat.jsonl" when the home directory is /home/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    let home = dirs::home_dir();
    format_path_with_home(path, home.as_deref())
}

pub(crate) fn format_path_with_home(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }

    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
