//! Runtime configuration
//!
//! All settings come from environment variables (loaded via dotenvy in main),
//! with defaults matching a stock Apple Books installation on macOS.

use std::env;
use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Relative location of the annotation store inside the user's home
const ANNOTATION_DB_SUFFIX: &str = "Library/Containers/com.apple.iBooksX/Data/Documents/AEAnnotation";

/// Relative location of the library store inside the user's home
const LIBRARY_DB_SUFFIX: &str = "Library/Containers/com.apple.iBooksX/Data/Documents/BKLibrary";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the AEAnnotation SQLite database
    pub annotation_db: PathBuf,
    /// Path to the BKLibrary SQLite database
    pub library_db: PathBuf,
    /// Directory where rendered documents are written
    pub output_dir: PathBuf,
    /// Stable-sort annotations by position (otherwise keep coalesced order)
    pub sort_annotations: bool,
    /// Read the book container for richer metadata
    pub enrich_metadata: bool,
    /// Group annotations under chapter headings when rendering
    pub group_by_chapter: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let home = env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| AppError::Config("HOME is not set".to_string()))?;

        let annotation_db = env::var("DOGEAR_ANNOTATION_DB")
            .map(PathBuf::from)
            .ok()
            .or_else(|| find_store(&home.join(ANNOTATION_DB_SUFFIX)))
            .ok_or_else(|| {
                AppError::Config("annotation store not found; set DOGEAR_ANNOTATION_DB".to_string())
            })?;

        let library_db = env::var("DOGEAR_LIBRARY_DB")
            .map(PathBuf::from)
            .ok()
            .or_else(|| find_store(&home.join(LIBRARY_DB_SUFFIX)))
            .ok_or_else(|| {
                AppError::Config("library store not found; set DOGEAR_LIBRARY_DB".to_string())
            })?;

        let output_dir = env::var("DOGEAR_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./books"));

        Ok(Self {
            annotation_db,
            library_db,
            output_dir,
            sort_annotations: env_flag("DOGEAR_SORT_ANNOTATIONS", true),
            enrich_metadata: env_flag("DOGEAR_ENRICH_METADATA", true),
            group_by_chapter: env_flag("DOGEAR_GROUP_BY_CHAPTER", true),
        })
    }
}

/// Parse a boolean environment flag with a default
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Apple Books names its store files with a random component
/// (e.g. AEAnnotation_v10312011_1727_local.sqlite), so scan the directory
/// for the first .sqlite file.
fn find_store(dir: &std::path::Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "sqlite").unwrap_or(false))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_flag_default() {
        assert!(env_flag("DOGEAR_TEST_FLAG_UNSET", true));
        assert!(!env_flag("DOGEAR_TEST_FLAG_UNSET", false));
    }

    #[test]
    fn test_find_store_picks_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("AEAnnotation_local.sqlite"), b"x").unwrap();

        let found = find_store(dir.path()).unwrap();
        assert_eq!(
            found.file_name().unwrap().to_str().unwrap(),
            "AEAnnotation_local.sqlite"
        );
    }

    #[test]
    fn test_find_store_missing_dir() {
        assert!(find_store(std::path::Path::new("/nonexistent/dogear")).is_none());
    }
}
