//! codemap - repository code map generator
//!
//! Entry point for the `codemap` command.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;

use clap::Parser;
use codemap::observability::{init_tracing, TracingConfig};
use codemap::{scan_repository_async, Result, ScanConfig};

/// Scan source trees and write a JSON code map
#[derive(Parser, Debug)]
#[command(name = "codemap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (scanRoots, ignoreGlobs, textExtensions, artifactsDir)
    #[arg(short, long, env = "CODEMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Directories to scan
    #[arg(short, long = "root", env = "CODEMAP_ROOTS", value_delimiter = ',')]
    roots: Vec<PathBuf>,

    /// Glob patterns to exclude
    #[arg(short, long = "ignore", env = "CODEMAP_IGNORE", value_delimiter = ',')]
    ignores: Vec<String>,

    /// Text extensions to include, with leading dot
    #[arg(short, long = "ext", env = "CODEMAP_EXTENSIONS", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Output directory for code-map.json
    #[arg(short = 'o', long, env = "CODEMAP_ARTIFACTS_DIR")]
    artifacts_dir: Option<PathBuf>,

    /// Include dot-files and dot-directories
    #[arg(long)]
    include_hidden: bool,

    /// Do not follow symbolic links
    #[arg(long)]
    no_follow_links: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CODEMAP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "CODEMAP_LOG_JSON")]
    log_json: bool,
}

impl Cli {
    /// Layer command-line values over the file (or default) configuration.
    fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::default(),
        };

        if !self.roots.is_empty() {
            config.scan_roots.clone_from(&self.roots);
        }
        if !self.ignores.is_empty() {
            config.ignore_globs.clone_from(&self.ignores);
        }
        if !self.extensions.is_empty() {
            config.text_extensions.clone_from(&self.extensions);
        }
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts_dir.clone_from(dir);
        }
        if self.include_hidden {
            config.include_hidden = true;
        }
        if self.no_follow_links {
            config.follow_links = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tracing_config = TracingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    };
    tracing_config.validate()?;
    init_tracing(&tracing_config);

    tracing::info!("codemap v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli.scan_config()?;
    tracing::debug!(?config, "Configuration loaded");

    let artifact = config.artifact_path();
    let map = scan_repository_async(config).await?;

    tracing::info!(files = map.files.len(), "Code map ready");
    println!("{}", artifact.display());

    Ok(())
}
