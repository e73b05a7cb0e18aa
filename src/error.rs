use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scaffold operations
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// IO error when reading templates or writing the output tree
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Template root directory does not exist
    #[error("Template directory not found: {path}")]
    TemplateRootNotFound { path: PathBuf },

    /// Token definition file is missing from the template root
    #[error("Token definition file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Token definition file could not be parsed
    #[error("Invalid token definitions in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Two tokens share the same name
    #[error("Duplicate token name: {name}")]
    DuplicateToken { name: String },

    /// Token name could not be compiled in pattern mode
    #[error("Invalid pattern for token {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Substituted path would leave the destination directory
    #[error("Path traversal detected (generated path escapes the destination): {path}")]
    PathTraversal { path: PathBuf },

    /// Substituted path of a template file is empty
    #[error("Generated path is empty for template file: {source_path}")]
    EmptyOutputPath { source_path: PathBuf },

    /// Malformed `NAME=VALUE` overlay assignment
    #[error("Invalid value assignment (expected NAME=VALUE): {assignment}")]
    InvalidAssignment { assignment: String },

    /// Exclude glob compilation error
    #[error("Glob error: {0}")]
    Glob(#[from] globset::Error),

    /// `WalkDir` error when traversing the template tree
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
