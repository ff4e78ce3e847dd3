//! Filesystem locations for config, session storage and logs

use std::path::PathBuf;

use crate::constants::paths::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOGS_DIR_NAME, SESSIONS_DIR_NAME,
};

/// Root config directory (`~/.vitrine`), falling back to the working directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default config file path
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Directory holding per-session storage files
pub fn sessions_dir() -> PathBuf {
    config_dir().join(SESSIONS_DIR_NAME)
}

/// Directory holding log files
pub fn logs_dir() -> PathBuf {
    config_dir().join(LOGS_DIR_NAME)
}
