//! Turning raw digest text into an [`Article`].
//!
//! The title carries a Russian date ("14 марта 2025"), the slug and cover
//! path are derived from the same date, and the body is the digest wrapped
//! between the title heading and a fixed footer.

use crate::config::{ArticleConfig, DescriptionMode};
use crate::error::DigestError;
use crate::models::Article;
use crate::render::inline::strip_emphasis;
use crate::render::line::{Line, classify};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

/// Genitive month names, as used after a day number.
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const TITLE_PREFIX: &str = "Криптовалютный дайджест за";

const FOOTER: &str = "## 📌 О дайджесте

Ежедневная сводка главных событий криптовалютного рынка. Материал основан на агрегации данных из ведущих крипто-каналов с общим охватом более 270 тысяч участников.

### Категории:
- **🔴 Рынок** — движение цен, анализ трендов
- **📈 Сигналы** — торговые идеи и уровни
- **⛓️ On-Chain** — анализ блокчейн-данных
- **⚡️ Новости** — важные события индустрии
- **💡 Анализ** — экспертные мнения и прогнозы

### Подпишитесь
Чтобы получать ежедневные обновления, подпишитесь на наш канал!

---

*Дисклеймер: данный материал носит информационный характер и не является инвестиционной рекомендацией. Всегда проводите собственное исследование перед принятием финансовых решений.*
";

static DIGEST_FILENAME_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"digest_(\d{8})_").unwrap());

/// Format a date as `DD <month> YYYY` with the genitive Russian month.
///
/// The day is zero-padded: `05 марта 2025`.
pub fn localized_date(date: NaiveDate) -> String {
    let month = MONTHS_GENITIVE[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}

/// `crypto-digest-YYYY-MM-DD`.
pub fn slug_for(date: NaiveDate) -> String {
    format!("crypto-digest-{}", date.format("%Y-%m-%d"))
}

/// `/images/crypto-YYYYMMDD.jpg`.
pub fn image_path_for(date: NaiveDate) -> String {
    format!("/images/crypto-{}.jpg", date.format("%Y%m%d"))
}

/// Extract the 8-digit date from a `digest_YYYYMMDD_*.txt` file name.
pub fn date_from_filename(name: &str) -> Option<NaiveDate> {
    let caps = DIGEST_FILENAME_DATE.captures(name)?;
    NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()
}

/// Builds articles from digest text using static per-site settings.
#[derive(Debug, Clone, Default)]
pub struct ArticleAssembler {
    config: ArticleConfig,
}

impl ArticleAssembler {
    pub fn new(config: ArticleConfig) -> Self {
        Self { config }
    }

    /// Build the article for `digest` published at `date`.
    ///
    /// # Errors
    ///
    /// [`DigestError::EmptyInput`] when the digest is empty or whitespace.
    #[instrument(level = "info", skip_all, fields(%date, bytes = digest.len()))]
    pub fn assemble(&self, digest: &str, date: NaiveDateTime) -> Result<Article, DigestError> {
        if digest.trim().is_empty() {
            return Err(DigestError::EmptyInput);
        }

        let day = date.date();
        let title = format!("{} {}", TITLE_PREFIX, localized_date(day));
        let content = format!("# {title}\n\n{digest}\n\n---\n\n{FOOTER}");
        let tags = self.config.tags.iter().unique().cloned().collect::<Vec<_>>();

        let article = Article {
            description: self.description(digest),
            content,
            publication_date: date,
            slug: slug_for(day),
            tags,
            image_path: image_path_for(day),
            author: self.config.author.clone(),
            category: self.config.category.clone(),
            title,
        };
        info!(slug = %article.slug, title = %article.title, "Assembled article");
        Ok(article)
    }

    fn description(&self, digest: &str) -> String {
        match self.config.description {
            DescriptionMode::Static => self.config.static_description.clone(),
            DescriptionMode::Excerpt => excerpt(digest, self.config.excerpt_chars)
                .unwrap_or_else(|| self.config.static_description.clone()),
        }
    }
}

/// Plain-text excerpt from the text and list lines of `digest`, at most
/// `max_chars` characters plus an ellipsis when cut.
fn excerpt(digest: &str, max_chars: usize) -> Option<String> {
    let mut text = String::new();
    let mut chars = 0;
    for line in digest.lines() {
        let payload = match classify(line) {
            Line::Text(t) | Line::ListItem(t) => t.trim(),
            _ => continue,
        };
        if payload.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
            chars += 1;
        }
        let plain = strip_emphasis(payload);
        chars += plain.chars().count();
        text.push_str(&plain);
        if chars > max_chars {
            break;
        }
    }

    if text.is_empty() || max_chars == 0 {
        return None;
    }
    if chars <= max_chars {
        return Some(text);
    }
    let cut: String = text.chars().take(max_chars).collect();
    debug!(max_chars, "Truncated excerpt");
    Some(format!("{}…", cut.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_assemble_basic_digest() {
        let article = ArticleAssembler::default()
            .assemble("Bitcoin up 5%", midnight(2025, 3, 14))
            .unwrap();

        assert_eq!(article.slug, "crypto-digest-2025-03-14");
        assert!(article.title.contains("марта"));
        assert_eq!(article.title, "Криптовалютный дайджест за 14 марта 2025");
        assert_eq!(article.image_path, "/images/crypto-20250314.jpg");
        assert_eq!(article.author, "Crypto Digest");
        assert_eq!(article.category, "Криптовалюты");
        assert_eq!(article.tags.len(), 5);
    }

    #[test]
    fn test_content_layout() {
        let digest = "## Рынок\n- **BTC** +5%";
        let article = ArticleAssembler::default()
            .assemble(digest, midnight(2025, 1, 5))
            .unwrap();

        assert!(article
            .content
            .starts_with("# Криптовалютный дайджест за 05 января 2025\n\n## Рынок\n- **BTC** +5%\n\n---\n\n## 📌 О дайджесте"));
        assert!(article.content.contains("*Дисклеймер:"));
    }

    #[test]
    fn test_empty_digest_is_rejected() {
        let assembler = ArticleAssembler::default();
        assert!(matches!(
            assembler.assemble("", midnight(2025, 3, 14)),
            Err(DigestError::EmptyInput)
        ));
        assert!(matches!(
            assembler.assemble(" \n\t\n", midnight(2025, 3, 14)),
            Err(DigestError::EmptyInput)
        ));
    }

    #[test]
    fn test_all_months() {
        let expected = [
            "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа",
            "сентября", "октября", "ноября", "декабря",
        ];
        for (i, month) in expected.iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2024, i as u32 + 1, 1).unwrap();
            assert_eq!(localized_date(date), format!("01 {} 2024", month));
        }
    }

    #[test]
    fn test_duplicate_tags_are_dropped_in_order() {
        let config = ArticleConfig {
            tags: vec!["btc".into(), "eth".into(), "btc".into(), "sol".into()],
            ..ArticleConfig::default()
        };
        let article = ArticleAssembler::new(config)
            .assemble("x", midnight(2025, 3, 14))
            .unwrap();
        assert_eq!(article.tags, vec!["btc", "eth", "sol"]);
    }

    #[test]
    fn test_static_description_ignores_content() {
        let a = ArticleAssembler::default()
            .assemble("one", midnight(2025, 3, 14))
            .unwrap();
        let b = ArticleAssembler::default()
            .assemble("two", midnight(2025, 3, 15))
            .unwrap();
        assert_eq!(a.description, b.description);
    }

    #[test]
    fn test_excerpt_description() {
        let config = ArticleConfig {
            description: DescriptionMode::Excerpt,
            excerpt_chars: 20,
            ..ArticleConfig::default()
        };
        let digest = "# Header\n\n**BTC** пробил $70k\n- ETH следом за ним растёт";
        let article = ArticleAssembler::new(config)
            .assemble(digest, midnight(2025, 3, 14))
            .unwrap();
        assert_eq!(article.description, "BTC пробил $70k ETH…");
    }

    #[test]
    fn test_excerpt_falls_back_to_static() {
        let config = ArticleConfig {
            description: DescriptionMode::Excerpt,
            ..ArticleConfig::default()
        };
        let static_text = config.static_description.clone();
        let article = ArticleAssembler::new(config)
            .assemble("# Only a heading\n---", midnight(2025, 3, 14))
            .unwrap();
        assert_eq!(article.description, static_text);
    }

    #[test]
    fn test_excerpt_stops_reading_once_long_enough() {
        let digest = "биткоин растёт\n".repeat(10_000);
        let out = excerpt(&digest, 30).unwrap();
        assert_eq!(out.chars().count(), 30);
        assert!(out.starts_with("биткоин растёт биткоин растёт"));
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_excerpt_short_text_not_cut() {
        assert_eq!(excerpt("short line", 150).as_deref(), Some("short line"));
    }

    #[test]
    fn test_date_from_filename() {
        assert_eq!(
            date_from_filename("digest_20250314_0900.txt"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert_eq!(date_from_filename("digest_2025_0900.txt"), None);
        assert_eq!(date_from_filename("digest_20251399_x.txt"), None);
        assert_eq!(date_from_filename("notes.txt"), None);
    }
}
