//! Where loudviz keeps its files.
//!
//! Unix uses the XDG-style dot directories under `$HOME` (also on macOS);
//! Windows uses the per-user directories from `dirs`.

use std::path::PathBuf;

const APP_DIR: &str = "loudviz";
const LOG_FILE: &str = "loudviz.log";

#[cfg(unix)]
fn base(kind: &[&str]) -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    path.extend(kind);
    path.join(APP_DIR)
}

/// `~/.local/share/loudviz`
#[cfg(unix)]
pub fn data_dir() -> PathBuf {
    base(&[".local", "share"])
}

/// `~/.config/loudviz`
#[cfg(unix)]
pub fn config_dir() -> PathBuf {
    base(&[".config"])
}

#[cfg(windows)]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}
