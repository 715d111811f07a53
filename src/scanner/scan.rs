//! Repository scan that builds and persists the code map.
//!
//! Walks each root, filters by extension and ignore globs, reads files as
//! UTF-8 and writes the aggregate to `<artifacts_dir>/code-map.json`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use super::chunker::chunk_file;
use super::filter::PathFilter;
use super::model::{CodeChunk, CodeFile, CodeMap};
use crate::config::{ScanConfig, ARTIFACT_FILE_NAME};
use crate::Result;

/// Scan statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Files with an allowed extension, before ignore globs.
    pub files_matched: u64,
    /// Files written to the code map.
    pub files_recorded: u64,
    /// Files dropped by an ignore glob. Files under pruned directories are
    /// never visited and not counted.
    pub files_ignored: u64,
    /// Files skipped because they could not be read as UTF-8.
    pub files_unreadable: u64,
    /// Walk errors (missing roots, unreadable directories, link loops).
    pub walk_errors: u64,
}

/// Scanner bound to one configuration.
#[derive(Debug, Clone)]
pub struct RepoScanner {
    config: ScanConfig,
    filter: PathFilter,
}

impl RepoScanner {
    /// Create a scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an ignore glob
    /// does not compile.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let filter = PathFilter::from_config(&config)?;
        Ok(Self { config, filter })
    }

    /// Get the scanner configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan all roots and write the artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or the
    /// artifact cannot be written. Unreadable files are skipped.
    pub fn scan(&self) -> Result<CodeMap> {
        self.scan_with_stats().map(|(map, _)| map)
    }

    /// Scan all roots, write the artifact and return the statistics too.
    ///
    /// # Errors
    ///
    /// See [`RepoScanner::scan`].
    pub fn scan_with_stats(&self) -> Result<(CodeMap, ScanStats)> {
        let (map, stats) = self.collect()?;
        let path = map.write_artifact(&self.config.artifacts_dir)?;

        tracing::info!(
            artifact = %path.display(),
            recorded = stats.files_recorded,
            ignored = stats.files_ignored,
            unreadable = stats.files_unreadable,
            errors = stats.walk_errors,
            "Repository scan complete"
        );

        Ok((map, stats))
    }

    /// Scan all roots without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved.
    pub fn collect(&self) -> Result<(CodeMap, ScanStats)> {
        let mut stats = ScanStats::default();
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        let mut chunks = Vec::new();

        tracing::info!(
            roots = self.config.scan_roots.len(),
            extensions = self.config.text_extensions.len(),
            ignores = self.filter.ignore_count(),
            "Starting repository scan"
        );

        let artifact = self.existing_artifact();

        for root in &self.config.scan_roots {
            for path in self.discover(root, artifact.as_deref(), &mut stats) {
                if !seen.insert(path.clone()) {
                    continue;
                }

                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable file");
                        stats.files_unreadable += 1;
                        continue;
                    }
                };

                let file = CodeFile::from_source(&path, content);
                chunks.push(chunk_file(&file));
                files.push(file);
                stats.files_recorded += 1;
            }
        }

        let root_dir = std::env::current_dir()?;
        let map = CodeMap::new(root_dir.to_string_lossy(), files, chunks);

        Ok((map, stats))
    }

    /// Canonical path of a previously written artifact, if any.
    fn existing_artifact(&self) -> Option<PathBuf> {
        std::fs::canonicalize(self.config.artifact_path()).ok()
    }

    /// Walk one root and return the files to record, in file-name order.
    ///
    /// `artifact` is never recorded, so a scan does not read back its own
    /// output when the artifacts directory sits inside a root.
    fn discover(
        &self,
        root: &Path,
        artifact: Option<&Path>,
        stats: &mut ScanStats,
    ) -> Vec<PathBuf> {
        let pruned = self.filter.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false) // Only the configured globs decide
            .hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !entry.file_type().is_some_and(|t| t.is_dir())
                    || !pruned.prunes_dir(entry.file_name())
            })
            .build();

        let mut paths = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Error walking directory");
                    stats.walk_errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            if is_artifact(path, artifact) {
                tracing::debug!(path = %path.display(), "Skipping code map artifact");
                continue;
            }

            if !self.filter.has_text_extension(path) {
                continue;
            }
            stats.files_matched += 1;

            if self.filter.is_ignored(path, root) {
                stats.files_ignored += 1;
                continue;
            }

            paths.push(path.to_path_buf());
        }

        tracing::debug!(root = %root.display(), files = paths.len(), "Root discovered");

        paths
    }
}

fn is_artifact(path: &Path, artifact: Option<&Path>) -> bool {
    artifact.is_some_and(|artifact| {
        path.file_name().is_some_and(|n| n == ARTIFACT_FILE_NAME)
            && std::fs::canonicalize(path).is_ok_and(|p| p == artifact)
    })
}

/// Scan the configured roots and write `code-map.json`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the artifact cannot be
/// written.
pub fn scan_repository(config: &ScanConfig) -> Result<CodeMap> {
    RepoScanner::new(config.clone())?.scan()
}

/// Async version of [`scan_repository`], run on the blocking pool.
///
/// # Errors
///
/// Same as [`scan_repository`], plus an internal error if the scan task
/// panics.
pub async fn scan_repository_async(config: ScanConfig) -> Result<CodeMap> {
    tokio::task::spawn_blocking(move || scan_repository(&config))
        .await
        .map_err(|e| crate::Error::internal(format!("Scan task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(tmp: &TempDir, exts: &[&str], ignores: &[&str]) -> ScanConfig {
        ScanConfig {
            scan_roots: vec![tmp.path().join("repo")],
            ignore_globs: ignores.iter().map(ToString::to_string).collect(),
            text_extensions: exts.iter().map(ToString::to_string).collect(),
            artifacts_dir: tmp.path().join("artifacts"),
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("a.ts"), "export {}").unwrap();

        let scanner = RepoScanner::new(config_for(&tmp, &[".ts"], &[])).unwrap();
        let (map, stats) = scanner.collect().unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(stats.files_recorded, 1);
        assert!(!tmp.path().join("artifacts").exists());
    }

    #[test]
    fn test_stats_track_ignored_and_unreadable() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join("vendor")).unwrap();
        fs::write(repo.join("ok.js"), "require('x')").unwrap();
        fs::write(repo.join("bad.js"), [0xff_u8, 0xfe, 0x00, 0x41]).unwrap();
        fs::write(repo.join("vendor").join("lib.js"), "1").unwrap();
        fs::write(repo.join("skip.bin"), "1").unwrap();

        let scanner = RepoScanner::new(config_for(&tmp, &[".js"], &["vendor/*.js"])).unwrap();
        let (map, stats) = scanner.scan_with_stats().unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(
            stats,
            ScanStats {
                files_matched: 3,
                files_recorded: 1,
                files_ignored: 1,
                files_unreadable: 1,
                walk_errors: 0,
            }
        );
    }

    #[test]
    fn test_pruned_dirs_are_not_walked() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join("node_modules").join("pkg")).unwrap();
        fs::create_dir_all(repo.join("src").join("node_modules")).unwrap();
        fs::write(repo.join("node_modules").join("pkg").join("index.js"), "1").unwrap();
        fs::write(repo.join("src").join("node_modules").join("x.js"), "1").unwrap();
        fs::write(repo.join("src").join("app.js"), "1").unwrap();

        let scanner =
            RepoScanner::new(config_for(&tmp, &[".js"], &["**/node_modules/**"])).unwrap();
        let (map, stats) = scanner.collect().unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.files[0].path.ends_with("app.js"));
        // Pruned before any file below them is visited.
        assert_eq!(stats.files_matched, 1);
        assert_eq!(stats.files_ignored, 0);
    }

    #[test]
    fn test_artifact_inside_root_is_not_recorded() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("a.json"), "{}").unwrap();

        let config = ScanConfig {
            artifacts_dir: repo.join("out"),
            ..config_for(&tmp, &[".json"], &[])
        };
        let scanner = RepoScanner::new(config).unwrap();
        scanner.scan().unwrap();

        let (map, stats) = scanner.scan_with_stats().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(stats.files_matched, 1);
        assert!(map.files[0].path.ends_with("a.json"));
    }

    #[test]
    fn test_same_named_json_elsewhere_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join("fixtures")).unwrap();
        fs::write(repo.join("fixtures").join("code-map.json"), "{}").unwrap();

        let config = ScanConfig {
            artifacts_dir: repo.join("out"),
            ..config_for(&tmp, &[".json"], &[])
        };
        let scanner = RepoScanner::new(config).unwrap();
        scanner.scan().unwrap();

        let (map, _) = scanner.collect().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.files[0].path.ends_with("fixtures/code-map.json"));
    }

    #[test]
    fn test_missing_root_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("a.md"), "# hi").unwrap();

        let mut config = config_for(&tmp, &[".md"], &[]);
        config.scan_roots.insert(0, tmp.path().join("missing"));

        let (map, stats) = RepoScanner::new(config).unwrap().scan_with_stats().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(stats.walk_errors, 1);
    }

    #[test]
    fn test_overlapping_roots_record_once() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("a.ts"), "").unwrap();

        let mut config = config_for(&tmp, &[".ts"], &[]);
        config.scan_roots.push(repo.clone());

        let (map, _) = RepoScanner::new(config).unwrap().collect().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.chunks.len(), 1);
    }

    #[test]
    fn test_hidden_entries_skipped_by_default() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(repo.join(".cache")).unwrap();
        fs::write(repo.join(".cache").join("c.json"), "{}").unwrap();
        fs::write(repo.join(".eslintrc.json"), "{}").unwrap();
        fs::write(repo.join("package.json"), "{}").unwrap();

        let config = config_for(&tmp, &[".json"], &[]);
        let (map, _) = RepoScanner::new(config.clone()).unwrap().collect().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.files[0].path.ends_with("package.json"));

        let config = ScanConfig {
            include_hidden: true,
            ..config
        };
        let (map, _) = RepoScanner::new(config).unwrap().collect().unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_discovery_order_is_sorted() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        for name in ["c.ts", "a.ts", "b.ts"] {
            fs::write(repo.join(name), name).unwrap();
        }

        let (map, _) = RepoScanner::new(config_for(&tmp, &[".ts"], &[]))
            .unwrap()
            .collect()
            .unwrap();
        let names: Vec<_> = map
            .files
            .iter()
            .map(|f| Path::new(&f.path).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ts", "b.ts", "c.ts"]);
    }

    #[test]
    fn test_invalid_glob_rejected_before_scan() {
        let tmp = TempDir::new().unwrap();
        let err = RepoScanner::new(config_for(&tmp, &[".ts"], &["{unclosed"])).unwrap_err();
        assert!(err.to_string().contains("invalid ignore glob"));
    }

    #[test]
    fn test_root_dir_is_working_directory() {
        let tmp = TempDir::new().unwrap();
        let (map, _) = RepoScanner::new(config_for(&tmp, &[".ts"], &[]))
            .unwrap()
            .collect()
            .unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(map.root_dir, cwd.to_string_lossy());
    }

    #[tokio::test]
    async fn test_scan_repository_async() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("a.ts"), "import x from 'y';").unwrap();

        let map = scan_repository_async(config_for(&tmp, &[".ts"], &[]))
            .await
            .unwrap();
        assert_eq!(map.files[0].imports, vec!["y"]);
        assert!(tmp.path().join("artifacts").join("code-map.json").exists());
    }
}
