//! Runtime configuration.
//!
//! Every stage receives its settings through [`Config`] instead of reading
//! fixed paths or URLs. All fields have defaults, so an empty YAML file (or no
//! file at all) yields the stock publisher profile.
//!
//! ```yaml
//! paths:
//!   articles_dir: public/articles
//! feed:
//!   site_url: https://dzen-auto.vercel.app
//!   item_cap: 20
//!   render:
//!     list_item_emphasis: strip
//! ```

use crate::error::DigestError;
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Top-level configuration for all stages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub article: ArticleConfig,
    pub feed: FeedConfig,
}

/// Where digests are read from and where outputs go.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for `digest_*.txt`.
    pub digest_dir: PathBuf,
    /// Directory holding `{slug}.json` / `{slug}.md`.
    pub articles_dir: PathBuf,
    /// Output path of the RSS document.
    pub feed_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            digest_dir: PathBuf::from("."),
            articles_dir: PathBuf::from("public/articles"),
            feed_file: PathBuf::from("public/rss.xml"),
        }
    }
}

/// How the article description is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionMode {
    /// Always the fixed summary string.
    #[default]
    Static,
    /// First lines of the digest, cut to `excerpt_chars`.
    Excerpt,
}

/// Static fields stamped on every article.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArticleConfig {
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub description: DescriptionMode,
    pub static_description: String,
    pub excerpt_chars: usize,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            author: "Crypto Digest".to_string(),
            category: "Криптовалюты".to_string(),
            tags: ["криптовалюта", "биткоин", "блокчейн", "трейдинг", "крипторынок"]
                .into_iter()
                .map(String::from)
                .collect(),
            description: DescriptionMode::Static,
            static_description: "Главные события крипторынка: биткоин, альткоины, сигналы трейдеров и on-chain аналитика".to_string(),
            excerpt_chars: 150,
        }
    }
}

/// Cover image used for the enclosure and the `<figure>` in the body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Absolute URL or site-relative path. When unset, each article's own
    /// `image` is used.
    pub url: Option<String>,
    pub mime: String,
    pub length: Option<u64>,
    /// Publisher requires at least 700px on the shortest side.
    pub width: u32,
    pub height: u32,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            url: Some("/cover.jpg".to_string()),
            mime: "image/jpeg".to_string(),
            length: Some(150_000),
            width: 1200,
            height: 800,
        }
    }
}

/// Channel metadata and per-item settings for the RSS document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub site_title: String,
    pub site_url: String,
    pub site_description: String,
    pub language: String,
    /// Maximum number of `<item>`s.
    pub item_cap: usize,
    /// Path segment between the site URL and the slug.
    pub article_path: String,
    /// Publisher-required `<category>` values on every item.
    pub categories: Vec<String>,
    pub cover: CoverConfig,
    /// Body rendering options. Feed content always drops the body's own
    /// title heading.
    pub render: RenderOptions,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            site_title: "Crypto Digest — Ежедневные крипто-дайджесты".to_string(),
            site_url: "https://dzen-auto.vercel.app".to_string(),
            site_description: "Ежедневная сводка главных событий криптовалютного рынка. Агрегация данных из ведущих крипто-каналов.".to_string(),
            language: "ru".to_string(),
            item_cap: 20,
            article_path: "articles".to_string(),
            categories: ["format-article", "index", "comment-all"]
                .into_iter()
                .map(String::from)
                .collect(),
            cover: CoverConfig::default(),
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or return defaults when no path is
    /// given. An explicitly named file that does not exist is an error.
    ///
    /// Call [`Config::validate`] once CLI overrides have been applied.
    #[instrument(level = "info", skip_all, fields(path = ?path))]
    pub async fn load(path: Option<&Path>) -> Result<Self, DigestError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| DigestError::io(path, e))?;
        let config = Self::from_yaml(&raw).map_err(|source| DigestError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML; an empty document means all defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Reject settings that would produce an unusable feed.
    pub fn validate(&self) -> Result<(), DigestError> {
        if let Err(e) = Url::parse(&self.feed.site_url) {
            return Err(DigestError::InvalidConfig(format!(
                "feed.site_url {:?} is not a valid URL: {e}",
                self.feed.site_url
            )));
        }
        if self.feed.item_cap == 0 {
            return Err(DigestError::InvalidConfig(
                "feed.item_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
