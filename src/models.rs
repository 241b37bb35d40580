//! Data models for articles and feed items.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: one publishable article, persisted as JSON and read back
//!   unchanged by the feed stage
//! - [`FrontMatter`]: the metadata header of the Markdown sibling file
//! - [`FeedItem`] and [`Enclosure`]: one `<item>` of the RSS document
//!
//! The JSON keys are fixed (`title, description, content, date, slug, tags,
//! image, author, category`) because other tools consume the same files.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A publishable article built from one digest.
///
/// Created once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Human-readable title with the localized date.
    pub title: String,
    /// Short plain-text summary, no markup.
    pub description: String,
    /// Body in the digest Markdown dialect, starting with the title as `# `.
    pub content: String,
    /// Publication timestamp, timezone-naive ISO-8601.
    #[serde(rename = "date")]
    pub publication_date: NaiveDateTime,
    /// `crypto-digest-YYYY-MM-DD`; one article per calendar date.
    pub slug: String,
    /// Topic tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Site-relative cover path, e.g. `/images/crypto-20250314.jpg`.
    #[serde(rename = "image", default)]
    pub image_path: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: String,
}

impl Article {
    /// The metadata block written at the top of the Markdown file.
    pub fn front_matter(&self) -> FrontMatter<'_> {
        FrontMatter {
            title: &self.title,
            description: &self.description,
            date: self.publication_date,
            image: &self.image_path,
            tags: &self.tags,
            author: &self.author,
            category: &self.category,
        }
    }
}

/// YAML front matter for the Markdown sibling of an article.
#[derive(Debug, Serialize)]
pub struct FrontMatter<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub date: NaiveDateTime,
    pub image: &'a str,
    pub tags: &'a [String],
    pub author: &'a str,
    pub category: &'a str,
}

/// Cover image reference attached to a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime: String,
    /// Size in bytes; optional for the publisher.
    pub length: Option<u64>,
}

/// One `<item>` of the feed, derived 1:1 from an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// RFC-822 style, e.g. `Fri, 14 Mar 2025 00:00:00 +0000`.
    pub pub_date: String,
    /// Same as `link`; emitted with `isPermaLink="true"`.
    pub guid: String,
    pub author: String,
    pub categories: Vec<String>,
    pub enclosure: Enclosure,
    /// Whitelist HTML for `content:encoded`.
    pub content_html: String,
}
