//! Digest discovery by file-name convention.
//!
//! Digests are named `digest_YYYYMMDD_<anything>.txt`. The newest one is the
//! last in name order, and its embedded date becomes the publication date.

use crate::article::date_from_filename;
use crate::error::DigestError;
use crate::utils::truncate_for_log;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// A digest read from disk together with the date it will be published under.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSource {
    pub path: PathBuf,
    pub text: String,
    pub date: NaiveDateTime,
}

fn is_digest_file(name: &str) -> bool {
    name.starts_with("digest_") && name.ends_with(".txt")
}

/// List digest files in `dir`, newest (highest name) first.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn index_digests(dir: &Path) -> Result<Vec<PathBuf>, DigestError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| DigestError::InputNotFound {
            path: dir.to_path_buf(),
            reason: format!("cannot read digest directory: {e}"),
        })?;

    let mut digests = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DigestError::io(dir, e))?
    {
        let name = entry.file_name();
        if name.to_str().is_some_and(is_digest_file) {
            digests.push(entry.path());
        }
    }
    digests.sort_unstable_by(|a, b| b.cmp(a));

    info!(count = digests.len(), "Indexed digest files");
    debug!(files = ?digests, "Digest files");
    Ok(digests)
}

/// The newest digest in `dir`.
pub async fn latest_digest(dir: &Path) -> Result<PathBuf, DigestError> {
    index_digests(dir)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DigestError::InputNotFound {
            path: dir.to_path_buf(),
            reason: "no digest_*.txt files".to_string(),
        })
}

/// Read a digest and settle its publication date.
///
/// Precedence: `date_override`, then the date in the file name (both at
/// midnight), then the current local time.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_digest(
    path: &Path,
    date_override: Option<NaiveDate>,
) -> Result<DigestSource, DigestError> {
    let text = fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DigestError::InputNotFound {
            path: path.to_path_buf(),
            reason: "digest file does not exist".to_string(),
        },
        _ => DigestError::io(path, e),
    })?;

    let from_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(date_from_filename);

    let date = match date_override.or(from_name) {
        Some(day) => day.and_time(NaiveTime::MIN),
        None => {
            warn!("No date in digest file name; using current time");
            Local::now().naive_local()
        }
    };

    info!(
        %date,
        bytes = text.len(),
        preview = %truncate_for_log(text.trim(), 80),
        "Read digest"
    );
    Ok(DigestSource {
        path: path.to_path_buf(),
        text,
        date,
    })
}
