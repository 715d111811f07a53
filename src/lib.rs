//! codemap
//!
//! Scans repository source trees and emits a JSON code map: text-like files
//! with their size, language tag and import references, plus one chunk per
//! file, written to `<artifacts_dir>/code-map.json`.
//!
//! ```no_run
//! use codemap::{scan_repository, ScanConfig};
//!
//! let config = ScanConfig {
//!     scan_roots: vec!["src".into()],
//!     ..ScanConfig::default()
//! };
//! let map = scan_repository(&config)?;
//! println!("{} files", map.files.len());
//! # Ok::<(), codemap::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod observability;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{Error, Result, ScanError};
pub use scanner::{
    scan_repository, scan_repository_async, CodeChunk, CodeFile, CodeMap, RepoScanner, ScanStats,
};
