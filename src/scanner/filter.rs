//! Path filtering by text extension and ignore globs.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::Result;

/// Decides which walked files belong in the code map.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extensions: Vec<String>,
    ignore: GlobSet,
    pruned_dirs: HashSet<OsString>,
}

impl PathFilter {
    /// Create a filter from an extension allow-list and ignore globs.
    ///
    /// `*` and `?` do not cross path separators; `**` does.
    ///
    /// # Errors
    ///
    /// Returns an error if any ignore glob is malformed.
    pub fn new<S: AsRef<str>>(extensions: &[S], ignore_globs: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut pruned_dirs = HashSet::new();

        for pattern in ignore_globs {
            let pattern = pattern.as_ref();
            if let Some(name) = pruned_dir_name(pattern) {
                pruned_dirs.insert(OsString::from(name));
            }
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ScanError::InvalidGlob {
                    pattern: pattern.to_string(),
                    reason: e.kind().to_string(),
                })?;
            builder.add(glob);
        }

        let ignore = builder.build().map_err(|e| ScanError::InvalidGlob {
            pattern: e.glob().unwrap_or_default().to_string(),
            reason: e.kind().to_string(),
        })?;

        Ok(Self {
            extensions: extensions.iter().map(|e| e.as_ref().to_string()).collect(),
            ignore,
            pruned_dirs,
        })
    }

    /// Create a filter from a scan configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any ignore glob is malformed.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(&config.text_extensions, &config.ignore_globs)
    }

    /// Check if everything below a directory with this name is ignored.
    ///
    /// Only `**/<name>/**` globs give that guarantee, so only they prune.
    #[must_use]
    pub fn prunes_dir(&self, name: &OsStr) -> bool {
        self.pruned_dirs.contains(name)
    }

    /// Directory names pruned from the walk.
    #[must_use]
    pub fn pruned_dirs(&self) -> &HashSet<OsString> {
        &self.pruned_dirs
    }

    /// Check if the file name ends with an allowed extension.
    ///
    /// Case-sensitive, like a `*<ext>` glob on a case-sensitive filesystem.
    #[must_use]
    pub fn has_text_extension(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| n.to_string_lossy())
            .is_some_and(|name| {
                self.extensions
                    .iter()
                    .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
            })
    }

    /// Check if the path matches any ignore glob.
    ///
    /// Globs are tested against the path as discovered and against the path
    /// relative to its root, so both `**/dist/**` and `dist/**` behave as
    /// expected.
    #[must_use]
    pub fn is_ignored(&self, path: &Path, root: &Path) -> bool {
        if self.ignore.is_empty() {
            return false;
        }

        if self.ignore.is_match(path) {
            return true;
        }

        path.strip_prefix(root)
            .is_ok_and(|relative| self.ignore.is_match(relative))
    }

    /// Number of ignore globs in effect.
    #[must_use]
    pub fn ignore_count(&self) -> usize {
        self.ignore.len()
    }
}

/// Extract `<name>` from a literal `**/<name>/**` glob.
fn pruned_dir_name(pattern: &str) -> Option<&str> {
    let name = pattern.strip_prefix("**/")?.strip_suffix("/**")?;
    let is_literal = !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '*' | '?' | '[' | ']' | '{' | '}' | '!'));
    is_literal.then_some(name)
}

/// Get the language tag for a file: its extension without the leading dot.
///
/// Returns an empty string when the file has no extension.
#[must_use]
pub fn language_tag(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}
