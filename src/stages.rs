//! The pipeline stages behind each subcommand.
//!
//! ```text
//! digest_*.txt ──convert──▶ {slug}.json + {slug}.md ──feed──▶ rss.xml
//! ```
//!
//! Stages run strictly one after another. Nothing here guards against two
//! processes converting the same date at once; callers serialize runs.

use crate::article::ArticleAssembler;
use crate::config::Config;
use crate::error::DigestError;
use crate::feed::FeedAssembler;
use crate::inputs::digest::{latest_digest, read_digest};
use crate::inputs::records::load_articles;
use crate::models::Article;
use crate::outputs::{json, markdown, rss};
use crate::utils::ensure_writable_dir;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What `convert` produced.
#[derive(Debug)]
pub struct ConvertReport {
    pub digest_path: PathBuf,
    pub article: Article,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}

/// What `feed` produced.
#[derive(Debug)]
pub struct FeedReport {
    pub path: PathBuf,
    pub items: usize,
    pub loaded: usize,
    pub skipped: usize,
}

/// Convert one digest into an article and persist it.
///
/// Uses `digest` when given, otherwise the newest digest in
/// `config.paths.digest_dir`.
#[instrument(level = "info", skip_all)]
pub async fn convert(
    config: &Config,
    digest: Option<&Path>,
    date: Option<NaiveDate>,
) -> Result<ConvertReport, DigestError> {
    let digest_path = match digest {
        Some(path) => path.to_path_buf(),
        None => latest_digest(&config.paths.digest_dir).await?,
    };
    info!(path = %digest_path.display(), "Using digest");

    let source = read_digest(&digest_path, date).await?;
    let article =
        ArticleAssembler::new(config.article.clone()).assemble(&source.text, source.date)?;

    let articles_dir = &config.paths.articles_dir;
    ensure_writable_dir(articles_dir).await?;

    let json_path = json::write_article(&article, articles_dir).await?;
    let markdown_path = markdown::write_article(&article, articles_dir).await?;
    info!(
        title = %article.title,
        slug = %article.slug,
        json = %json_path.display(),
        markdown = %markdown_path.display(),
        "Article ready for publishing"
    );

    Ok(ConvertReport {
        digest_path: source.path,
        article,
        json_path,
        markdown_path,
    })
}

/// Rebuild the feed from every stored article record.
///
/// Malformed records are skipped and counted; they never abort the feed.
#[instrument(level = "info", skip_all)]
pub async fn feed(config: &Config, build_date: DateTime<Utc>) -> Result<FeedReport, DigestError> {
    let loaded = load_articles(&config.paths.articles_dir).await?;
    if !loaded.skipped.is_empty() {
        warn!(
            skipped = loaded.skipped.len(),
            "Some article records were left out of the feed"
        );
    }

    let assembler = FeedAssembler::new(config.feed.clone());
    let items = assembler.assemble(&loaded.articles);
    let xml = assembler.to_xml(&items, build_date)?;

    let path = config.paths.feed_file.clone();
    rss::write_feed(&xml, &path).await?;
    info!(
        path = %path.display(),
        items = items.len(),
        loaded = loaded.articles.len(),
        skipped = loaded.skipped.len(),
        url = %format!("{}/rss.xml", config.feed.site_url.trim_end_matches('/')),
        "Feed written"
    );

    Ok(FeedReport {
        path,
        items: items.len(),
        loaded: loaded.articles.len(),
        skipped: loaded.skipped.len(),
    })
}

/// `convert` followed by `feed`; stops at the first failure.
pub async fn update(
    config: &Config,
    digest: Option<&Path>,
    date: Option<NaiveDate>,
    build_date: DateTime<Utc>,
) -> Result<(ConvertReport, FeedReport), DigestError> {
    info!("Step 1: converting digest to article");
    let converted = convert(config, digest, date).await?;
    info!("Step 2: rebuilding feed");
    let published = feed(config, build_date).await?;
    Ok((converted, published))
}
