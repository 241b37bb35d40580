//! Command-line interface definitions for Crypto Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every flag is optional: with none at all the binary runs `update` against
//! the default [`Config`].

use crate::config::Config;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Crypto Digest pipeline.
///
/// # Examples
///
/// ```sh
/// # Convert the newest digest and rebuild the feed
/// crypto_digest
///
/// # Convert a specific digest under a given date
/// crypto_digest convert -d digest_20250314_0900.txt --date 2025-03-14
///
/// # Rebuild only the feed, with a YAML config
/// crypto_digest -c dzen.yaml feed
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "CRYPTO_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory scanned for digest_*.txt files
    #[arg(long, global = true)]
    pub digest_dir: Option<PathBuf>,

    /// Directory for article JSON and Markdown files
    #[arg(short, long, global = true)]
    pub articles_dir: Option<PathBuf>,

    /// Output path of the RSS feed
    #[arg(short, long, global = true)]
    pub feed_file: Option<PathBuf>,

    /// Public site URL used for item links and covers
    #[arg(long, global = true, env = "CRYPTO_DIGEST_SITE_URL")]
    pub site_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Pipeline stages.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert a digest into an article (JSON + Markdown)
    Convert(ConvertArgs),
    /// Rebuild the RSS feed from stored articles
    Feed,
    /// Convert, then rebuild the feed
    Update(ConvertArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Update(ConvertArgs::default())
    }
}

/// Options for picking the digest to convert.
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Digest file to convert (default: newest digest_*.txt in the digest dir)
    #[arg(short, long)]
    pub digest: Option<PathBuf>,

    /// Publication date, YYYY-MM-DD (default: from the file name, else now)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl Cli {
    /// Apply path and URL flags on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.digest_dir {
            config.paths.digest_dir = dir.clone();
        }
        if let Some(dir) = &self.articles_dir {
            config.paths.articles_dir = dir.clone();
        }
        if let Some(file) = &self.feed_file {
            config.paths.feed_file = file.clone();
        }
        if let Some(url) = &self.site_url {
            config.feed.site_url = url.clone();
        }
    }
}
