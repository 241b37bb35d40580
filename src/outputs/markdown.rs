//! Markdown article files with YAML front matter.
//!
//! ```text
//! ---
//! title: Криптовалютный дайджест за 14 марта 2025
//! description: ...
//! date: 2025-03-14T00:00:00
//! image: /images/crypto-20250314.jpg
//! tags:
//! - криптовалюта
//! author: Crypto Digest
//! category: Криптовалюты
//! ---
//!
//! # Криптовалютный дайджест за 14 марта 2025
//! ...
//! ```

use crate::error::DigestError;
use crate::models::Article;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render the full Markdown document for `article`.
pub fn article_to_markdown(article: &Article) -> Result<String, DigestError> {
    let front_matter = serde_yaml::to_string(&article.front_matter())?;
    Ok(format!("---\n{front_matter}---\n\n{}\n", article.content))
}

/// Write `article` as `{dir}/{slug}.md`, creating `dir` if needed.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), slug = %article.slug))]
pub async fn write_article(article: &Article, dir: &Path) -> Result<PathBuf, DigestError> {
    let md = article_to_markdown(article)?;
    fs::create_dir_all(dir)
        .await
        .map_err(|e| DigestError::io(dir, e))?;

    let path = dir.join(format!("{}.md", article.slug));
    fs::write(&path, md)
        .await
        .map_err(|e| DigestError::io(&path, e))?;
    info!(path = %path.display(), "Wrote article Markdown");
    Ok(path)
}
