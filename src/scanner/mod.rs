//! Repository scanning.
//!
//! This module provides:
//! - Extension and ignore-glob filtering of walked files
//! - Regex-based import extraction
//! - Whole-file chunking
//! - The code map model and its JSON artifact

pub mod chunker;
pub mod filter;
pub mod imports;
mod model;
mod scan;

pub use filter::{language_tag, PathFilter};
pub use imports::extract_imports;
pub use model::{CodeChunk, CodeFile, CodeMap};
pub use scan::{scan_repository, scan_repository_async, RepoScanner, ScanStats};
