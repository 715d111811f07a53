//! Configuration management for codemap.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables
//! - JSON configuration file
//! - Built-in defaults (lowest priority)

mod settings;

pub use settings::{
    ScanConfig, ARTIFACT_FILE_NAME, DEFAULT_ARTIFACTS_DIR, DEFAULT_IGNORE_GLOBS,
    DEFAULT_TEXT_EXTENSIONS,
};
