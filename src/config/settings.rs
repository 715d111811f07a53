//! Scan configuration, defaults and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ScanError;
use crate::{Error, Result};

/// Name of the artifact written inside the artifacts directory.
pub const ARTIFACT_FILE_NAME: &str = "code-map.json";

/// Default output directory for the artifact.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Extensions treated as text-like when none are configured.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".json", ".md", ".txt", ".yml", ".yaml", ".css", ".scss",
];

/// Ignore globs applied when none are configured.
pub const DEFAULT_IGNORE_GLOBS: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.git/**",
];

/// Configuration for a single repository scan.
///
/// The scanner takes this value explicitly; nothing in the scan core reads
/// process-wide state apart from the working directory recorded as `rootDir`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Directories to search, in order.
    pub scan_roots: Vec<PathBuf>,

    /// Glob patterns; any matching file is excluded.
    pub ignore_globs: Vec<String>,

    /// Allowed file extensions, each with a leading dot (`.ts`).
    pub text_extensions: Vec<String>,

    /// Directory that receives `code-map.json`.
    pub artifacts_dir: PathBuf,

    /// Match dot-files and descend into dot-directories.
    pub include_hidden: bool,

    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_roots: vec![PathBuf::from(".")],
            ignore_globs: DEFAULT_IGNORE_GLOBS.iter().map(ToString::to_string).collect(),
            text_extensions: DEFAULT_TEXT_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            include_hidden: false,
            follow_links: true,
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded scan configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        for ext in &self.text_extensions {
            if ext.len() < 2 || !ext.starts_with('.') || ext.contains(['/', '\\']) {
                return Err(ScanError::InvalidExtension(ext.clone()).into());
            }
        }

        if self.artifacts_dir.as_os_str().is_empty() {
            return Err(Error::config("artifacts_dir cannot be empty"));
        }

        Ok(())
    }

    /// Get the path of the code map artifact.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.artifacts_dir.join(ARTIFACT_FILE_NAME)
    }
}
