//! RSS 2.0 feed assembly.
//!
//! Articles are ordered newest first, capped, and mapped 1:1 to
//! [`FeedItem`]s. Each item's `content:encoded` is whitelist HTML: the title,
//! the description, a cover `<figure>`, then the article body rendered with
//! its own leading title heading dropped.
//!
//! Free-text fields are escaped by the XML writer. The HTML payload goes out
//! as CDATA, unescaped.

use crate::config::FeedConfig;
use crate::error::DigestError;
use crate::models::{Article, Enclosure, FeedItem};
use crate::render::blocks::blocks_to_html;
use crate::render::inline::escape_markup;
use crate::render::{Block, BlockRenderer, RenderOptions};
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io;
use tracing::{debug, info, instrument};
use url::Url;

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Format a timestamp the way RSS `pubDate` expects.
///
/// Naive timestamps are taken as UTC, so the offset is always `+0000`.
pub fn rfc822(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

fn rfc822_naive(date: NaiveDateTime) -> String {
    rfc822(date.and_utc())
}

/// Builds feed items and serializes the RSS document.
#[derive(Debug, Clone)]
pub struct FeedAssembler {
    config: FeedConfig,
    renderer: BlockRenderer,
}

impl FeedAssembler {
    pub fn new(config: FeedConfig) -> Self {
        let renderer = BlockRenderer::new(RenderOptions {
            skip_leading_heading: true,
            ..config.render.clone()
        });
        Self { config, renderer }
    }

    /// Newest first, at most `item_cap`. Equal dates keep their input order.
    pub fn select<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        let mut selected: Vec<&Article> = articles.iter().collect();
        selected.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
        selected.truncate(self.config.item_cap);
        selected
    }

    /// Map selected articles to feed items.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub fn assemble(&self, articles: &[Article]) -> Vec<FeedItem> {
        let items: Vec<FeedItem> = self
            .select(articles)
            .into_iter()
            .map(|article| self.build_item(article))
            .collect();
        info!(
            items = items.len(),
            cap = self.config.item_cap,
            "Assembled feed items"
        );
        items
    }

    /// Build the feed item for one article.
    pub fn build_item(&self, article: &Article) -> FeedItem {
        let link = self.article_link(&article.slug);
        let cover_url = self.cover_url(article);
        debug!(slug = %article.slug, %link, %cover_url, "Building feed item");

        FeedItem {
            title: article.title.clone(),
            link: link.clone(),
            description: article.description.clone(),
            pub_date: rfc822_naive(article.publication_date),
            guid: link,
            author: article.author.clone(),
            categories: self.config.categories.clone(),
            enclosure: Enclosure {
                url: cover_url.clone(),
                mime: self.config.cover.mime.clone(),
                length: self.config.cover.length,
            },
            content_html: self.content_html(article, &cover_url),
        }
    }

    /// Serialize channel metadata and `items` into one RSS document.
    ///
    /// Zero items is fine and yields an empty channel.
    #[instrument(level = "info", skip_all, fields(items = items.len()))]
    pub fn to_xml(
        &self,
        items: &[FeedItem],
        build_date: DateTime<Utc>,
    ) -> Result<String, DigestError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_document(&mut writer, items, build_date)
            .map_err(DigestError::Xml)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes)
            .map_err(|e| DigestError::Xml(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn write_document(
        &self,
        writer: &mut Writer<Vec<u8>>,
        items: &[FeedItem],
        build_date: DateTime<Utc>,
    ) -> io::Result<()> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:content", CONTENT_NS));
        rss.push_attribute(("xmlns:dc", DC_NS));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        let channel = &self.config;
        writer
            .create_element("title")
            .write_text_content(BytesText::new(&channel.site_title))?;
        writer
            .create_element("link")
            .write_text_content(BytesText::new(&channel.site_url))?;
        writer
            .create_element("description")
            .write_text_content(BytesText::new(&channel.site_description))?;
        writer
            .create_element("language")
            .write_text_content(BytesText::new(&channel.language))?;
        writer
            .create_element("lastBuildDate")
            .write_text_content(BytesText::new(&rfc822(build_date)))?;

        for item in items {
            write_item(writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;
        Ok(())
    }

    fn article_link(&self, slug: &str) -> String {
        let path = self.config.article_path.trim_matches('/');
        if path.is_empty() {
            self.site_link(slug)
        } else {
            self.site_link(&format!("{path}/{slug}"))
        }
    }

    fn cover_url(&self, article: &Article) -> String {
        match &self.config.cover.url {
            Some(url) => self.site_link(url),
            None => self.site_link(&article.image_path),
        }
    }

    /// Absolute URLs pass through; anything else is appended to the site URL.
    fn site_link(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.site_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn content_html(&self, article: &Article, cover_url: &str) -> String {
        let escape_apostrophe = self.config.render.escape_apostrophe;
        let cover = &self.config.cover;

        let mut blocks = vec![
            Block::Heading {
                level: 1,
                text: escape_markup(&article.title, escape_apostrophe).into_owned(),
            },
            Block::Paragraph(escape_markup(&article.description, escape_apostrophe).into_owned()),
            Block::figure(cover_url, &article.title, cover.width, cover.height),
        ];
        blocks.extend(self.renderer.render(&article.content));
        blocks_to_html(&blocks)
    }
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &FeedItem) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    writer
        .create_element("title")
        .write_text_content(BytesText::new(&item.title))?;
    writer
        .create_element("link")
        .write_text_content(BytesText::new(&item.link))?;
    writer
        .create_element("description")
        .write_text_content(BytesText::new(&item.description))?;
    writer
        .create_element("pubDate")
        .write_text_content(BytesText::new(&item.pub_date))?;
    writer
        .create_element("guid")
        .with_attribute(("isPermaLink", "true"))
        .write_text_content(BytesText::new(&item.guid))?;
    if !item.author.is_empty() {
        writer
            .create_element("dc:creator")
            .write_text_content(BytesText::new(&item.author))?;
    }
    for category in &item.categories {
        writer
            .create_element("category")
            .write_text_content(BytesText::new(category))?;
    }

    let length = item.enclosure.length.map(|l| l.to_string());
    let mut enclosure = writer
        .create_element("enclosure")
        .with_attribute(("url", item.enclosure.url.as_str()))
        .with_attribute(("type", item.enclosure.mime.as_str()));
    if let Some(length) = &length {
        enclosure = enclosure.with_attribute(("length", length.as_str()));
    }
    enclosure.write_empty()?;

    writer.write_event(Event::Start(BytesStart::new("content:encoded")))?;
    for segment in cdata_segments(&item.content_html) {
        writer.write_event(Event::CData(BytesCData::new(segment)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("content:encoded")))?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Split `text` so no segment contains `]]>`; each segment becomes its own
/// CDATA section and the concatenated character data is unchanged.
fn cdata_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // Keep "]]" in this section and start the next one at ">".
        segments.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    segments.push(rest);
    segments
}
