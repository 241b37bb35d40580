//! Loading persisted article records for feed assembly.
//!
//! Each `*.json` file in the articles directory is parsed independently. A
//! record that fails to read or parse is logged and set aside in
//! [`LoadedArticles::skipped`]; it never aborts the feed.

use crate::error::DigestError;
use crate::models::Article;
use crate::utils::{looks_truncated, truncate_for_log};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Outcome of loading an articles directory.
#[derive(Debug, Default)]
pub struct LoadedArticles {
    /// Parsed records, in file-name order.
    pub articles: Vec<Article>,
    /// Records that could not be used, with the reason.
    pub skipped: Vec<DigestError>,
}

/// List `*.json` files in `dir`, sorted by name.
async fn index_records(dir: &Path) -> Result<Vec<PathBuf>, DigestError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| DigestError::InputNotFound {
            path: dir.to_path_buf(),
            reason: format!("cannot read articles directory: {e}"),
        })?;

    let mut records = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DigestError::io(dir, e))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            records.push(path);
        }
    }
    records.sort();
    Ok(records)
}

/// Parse one record's JSON text.
pub fn parse_record(path: &Path, raw: &str) -> Result<Article, DigestError> {
    serde_json::from_str(raw).map_err(|source| {
        if looks_truncated(&source) {
            warn!(
                path = %path.display(),
                preview = %truncate_for_log(raw, 80),
                "Record ends early; was it written partially?"
            );
        }
        DigestError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Load every article record in `dir`.
///
/// # Errors
///
/// [`DigestError::InputNotFound`] when the directory is missing or holds no
/// `*.json` files. Per-record failures are returned in
/// [`LoadedArticles::skipped`] instead.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn load_articles(dir: &Path) -> Result<LoadedArticles, DigestError> {
    let paths = index_records(dir).await?;
    if paths.is_empty() {
        return Err(DigestError::InputNotFound {
            path: dir.to_path_buf(),
            reason: "no article records (*.json)".to_string(),
        });
    }

    let mut loaded = LoadedArticles::default();
    for path in paths {
        let parsed = match fs::read_to_string(&path).await {
            Ok(raw) => parse_record(&path, &raw),
            Err(e) => Err(DigestError::io(&path, e)),
        };
        match parsed {
            Ok(article) => {
                debug!(path = %path.display(), slug = %article.slug, "Loaded article record");
                loaded.articles.push(article);
            }
            Err(e) => {
                warn!(error = %e, "Skipping article record");
                loaded.skipped.push(e);
            }
        }
    }

    info!(
        loaded = loaded.articles.len(),
        skipped = loaded.skipped.len(),
        "Loaded article records"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleAssembler;
    use chrono::NaiveDate;

    fn write_record(dir: &Path, day: u32) {
        let date = NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let article = ArticleAssembler::default().assemble("x", date).unwrap();
        let json = serde_json::to_string_pretty(&article).unwrap();
        std::fs::write(dir.join(format!("{}.json", article.slug)), json).unwrap();
    }

    #[tokio::test]
    async fn test_malformed_record_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), 12);
        write_record(dir.path(), 14);
        std::fs::write(dir.path().join("broken.json"), "{\"title\": ").unwrap();
        std::fs::write(dir.path().join("wrong-shape.json"), "[1, 2, 3]").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let loaded = load_articles(dir.path()).await.unwrap();
        assert_eq!(loaded.articles.len(), 2);
        assert_eq!(loaded.skipped.len(), 2);
        assert!(loaded
            .skipped
            .iter()
            .all(|e| matches!(e, DigestError::MalformedRecord { .. })));
    }

    #[tokio::test]
    async fn test_records_load_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), 20);
        write_record(dir.path(), 3);
        write_record(dir.path(), 11);

        let slugs: Vec<String> = load_articles(dir.path())
            .await
            .unwrap()
            .articles
            .into_iter()
            .map(|a| a.slug)
            .collect();
        assert_eq!(
            slugs,
            vec![
                "crypto-digest-2025-03-03",
                "crypto-digest-2025-03-11",
                "crypto-digest-2025-03-20"
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_or_missing_dir_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_articles(dir.path()).await.unwrap_err().is_input_not_found());
        assert!(load_articles(&dir.path().join("nope"))
            .await
            .unwrap_err()
            .is_input_not_found());
    }

    #[test]
    fn test_parse_record_error_names_path() {
        let err = parse_record(Path::new("a/b.json"), "{}").unwrap_err();
        assert!(err.to_string().contains("a/b.json"));
    }
}
