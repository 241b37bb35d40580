//! JSON article records.
//!
//! One file per article, `{articles_dir}/{slug}.json`, pretty-printed UTF-8.
//! These are the records the feed stage reads back.

use crate::error::DigestError;
use crate::models::Article;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `article` as `{dir}/{slug}.json`, creating `dir` if needed.
///
/// # Returns
///
/// The path that was written.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), slug = %article.slug))]
pub async fn write_article(article: &Article, dir: &Path) -> Result<PathBuf, DigestError> {
    let json = serde_json::to_string_pretty(article)?;

    if let Err(e) = fs::create_dir_all(dir).await {
        error!(error = %e, "Failed to create articles dir");
        return Err(DigestError::io(dir, e));
    }

    let path = dir.join(format!("{}.json", article.slug));
    fs::write(&path, json)
        .await
        .map_err(|e| DigestError::io(&path, e))?;
    info!(path = %path.display(), "Wrote article JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleAssembler;
    use crate::inputs::records::parse_record;
    use chrono::NaiveDate;

    fn article() -> Article {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ArticleAssembler::default()
            .assemble("Bitcoin up 5%", date)
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_article_reads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public/articles");
        let original = article();

        let path = write_article(&original, &nested).await.unwrap();
        assert_eq!(path, nested.join("crypto-digest-2025-03-14.json"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"date\": \"2025-03-14T00:00:00\""));
        assert!(raw.contains("марта"), "non-ASCII must not be \\u-escaped");
        assert_eq!(parse_record(&path, &raw).unwrap(), original);
    }

    #[tokio::test]
    async fn test_same_slug_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = article();
        let mut second = article();
        second.description = "second".to_string();

        write_article(&first, dir.path()).await.unwrap();
        let path = write_article(&second, dir.path()).await.unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"description\": \"second\""));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
