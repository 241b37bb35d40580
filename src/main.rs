//! # Crypto Digest
//!
//! Turns a daily plain-text crypto digest into a publishable article and an
//! RSS 2.0 feed accepted by a publisher with a strict HTML tag whitelist.
//!
//! ## Features
//!
//! - Picks the newest `digest_YYYYMMDD_*.txt` and dates the article from it
//! - Writes each article as JSON (for the feed) and Markdown with front matter
//! - Renders a small Markdown dialect (headings, lists, bold/italic, rules)
//!   into whitelist-only HTML for `content:encoded`
//! - Builds a capped, newest-first feed; broken article records are skipped
//!
//! ## Usage
//!
//! ```sh
//! crypto_digest                    # convert + feed with defaults
//! crypto_digest convert -d digest_20250314_0900.txt
//! crypto_digest -c dzen.yaml feed
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: find the digest by file-name convention
//! 2. **Assembly**: build the article record (title, slug, tags, body)
//! 3. **Persistence**: write `{slug}.json` and `{slug}.md`
//! 4. **Feed**: load all records, render bodies, write `rss.xml`

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod article;
mod cli;
mod config;
mod error;
mod feed;
mod inputs;
mod models;
mod outputs;
mod render;
mod stages;
mod utils;

use cli::{Cli, Command};
use config::Config;
use error::DigestError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("crypto_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref()).await?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let command = args.command.clone().unwrap_or_default();
    let result = run(&config, command).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(()) => {
            info!(?elapsed, "Execution complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_input_not_found() => {
            warn!(error = %e, "Nothing to publish; no output written");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            error!(error = %e, ?elapsed, "Run failed");
            Err(e.into())
        }
    }
}

async fn run(config: &Config, command: Command) -> Result<(), DigestError> {
    let build_date = Utc::now();
    match command {
        Command::Convert(args) => {
            let report = stages::convert(config, args.digest.as_deref(), args.date).await?;
            info!(
                slug = %report.article.slug,
                digest = %report.digest_path.display(),
                json = %report.json_path.display(),
                markdown = %report.markdown_path.display(),
                "Converted digest"
            );
        }
        Command::Feed => {
            let report = stages::feed(config, build_date).await?;
            info!(
                items = report.items,
                loaded = report.loaded,
                skipped = report.skipped,
                path = %report.path.display(),
                "Feed rebuilt"
            );
        }
        Command::Update(args) => {
            let (converted, published) =
                stages::update(config, args.digest.as_deref(), args.date, build_date).await?;
            info!(
                slug = %converted.article.slug,
                items = published.items,
                skipped = published.skipped,
                feed = %published.path.display(),
                "Content updated; deploy the public directory to publish"
            );
        }
    }
    Ok(())
}
