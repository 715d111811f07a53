//! Data models for the code map artifact.
//!
//! This module defines the records written to `code-map.json`:
//! - Source files with size, language tag and imports
//! - Chunks with their line ranges
//! - The aggregate code map

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::filter::language_tag;
use super::imports::extract_imports;
use crate::config::ARTIFACT_FILE_NAME;
use crate::error::ScanError;
use crate::Result;

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    /// Path as discovered under its scan root.
    pub path: String,

    /// File extension without the leading dot (e.g., "ts", "json").
    pub language: String,

    /// UTF-8 byte length of `content`.
    pub size_bytes: usize,

    /// Full file text.
    pub content: String,

    /// ES-module references followed by CommonJS references.
    pub imports: Vec<String>,
}

impl CodeFile {
    /// Build a file record from text that was read from `path`.
    #[must_use]
    pub fn from_source(path: &Path, content: String) -> Self {
        Self {
            path: path.to_string_lossy().into_owned(),
            language: language_tag(path),
            size_bytes: content.len(),
            imports: extract_imports(&content),
            content,
        }
    }
}

/// A line range of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChunk {
    /// `<filePath>#<index>`.
    pub id: String,

    /// Path of the owning file.
    pub file_path: String,

    /// Starting line (1-based).
    pub start_line: usize,

    /// Ending line (1-based, inclusive).
    pub end_line: usize,

    /// Chunk text.
    pub text: String,
}

/// Aggregate result of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMap {
    /// Scan completion time, millisecond precision.
    #[serde(with = "iso_millis")]
    pub scanned_at: DateTime<Utc>,

    /// Working directory of the process at scan time.
    pub root_dir: String,

    /// Files in discovery order.
    pub files: Vec<CodeFile>,

    /// Chunks, index-aligned with `files`.
    pub chunks: Vec<CodeChunk>,
}

impl CodeMap {
    /// Create a code map stamped with the current time.
    #[must_use]
    pub fn new(root_dir: impl Into<String>, files: Vec<CodeFile>, chunks: Vec<CodeChunk>) -> Self {
        Self {
            scanned_at: Utc::now().trunc_subsecs(3),
            root_dir: root_dir.into(),
            files,
            chunks,
        }
    }

    /// Number of files in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the map has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find a file by path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&CodeFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Get the chunks belonging to a file.
    pub fn chunks_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a CodeChunk> + 'a {
        self.chunks.iter().filter(move |c| c.file_path == path)
    }

    /// Serialize as indented JSON, the exact artifact text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScanError::Serialize(e.to_string()).into())
    }

    /// Write `code-map.json` into `artifacts_dir`, creating the directory if
    /// needed and overwriting any previous artifact.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written.
    pub fn write_artifact(&self, artifacts_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let artifacts_dir = artifacts_dir.as_ref();
        let json = self.to_json()?;

        std::fs::create_dir_all(artifacts_dir)
            .map_err(|e| ScanError::artifact_write(artifacts_dir.display().to_string(), e))?;

        let path = artifacts_dir.join(ARTIFACT_FILE_NAME);
        std::fs::write(&path, json)
            .map_err(|e| ScanError::artifact_write(path.display().to_string(), e))?;

        tracing::debug!(path = %path.display(), files = self.files.len(), "Wrote code map");

        Ok(path)
    }

    /// Load a previously written artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// ISO-8601 UTC timestamps with exactly three fractional digits.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
