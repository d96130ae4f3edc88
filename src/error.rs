//! Crate error types
//!
//! Unified error handling for store access, container parsing, and export.

use thiserror::Error;

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Annotation or library store could not be opened/queried
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Book container could not be read
    #[error("Container error: {0}")]
    Container(String),

    /// XML deserialization error (container.xml, content.opf)
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// ZIP archive error (.epub containers)
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, AppError>;
