use std::env;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Catalog file used when `BOOK_CATALOG_FILE` is not set, relative to the
/// working directory.
const DEFAULT_CATALOG_FILE: &str = "books.json";
/// Folder name used beneath the user's home directory for the log file.
const DATA_DIR_NAME: &str = ".book-catalog";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "book-catalog.log";
/// Filter directive applied when `BOOK_CATALOG_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

pub const CATALOG_FILE_VAR: &str = "BOOK_CATALOG_FILE";
pub const LOG_FILE_VAR: &str = "BOOK_CATALOG_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "BOOK_CATALOG_LOG";

/// Runtime settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_file: PathBuf,
    /// `None` when no override is set and the home directory is unknown; the
    /// catalog then runs without a log file.
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    /// Resolve the settings from the process environment.
    pub fn from_env() -> Self {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self::from_lookup(|key| env::var(key).ok(), home.as_deref())
    }

    /// Resolve the settings through `lookup`, which stands in for the
    /// environment, and `home`, the user's home directory if one is known.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F, home: Option<&Path>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let catalog_file = var(CATALOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));

        let log_file = var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .or_else(|| home.map(|home| home.join(DATA_DIR_NAME).join(LOG_FILE_NAME)));

        let log_filter = var(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            catalog_file,
            log_file,
            log_filter,
        }
    }
}
