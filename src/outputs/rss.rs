//! Writing the feed document to disk.

use crate::error::DigestError;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `xml` to `path`, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_feed(xml: &str, path: &Path) -> Result<(), DigestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DigestError::io(parent, e))?;
    }
    fs::write(path, xml)
        .await
        .map_err(|e| DigestError::io(path, e))?;
    info!(bytes = xml.len(), "Wrote feed");
    Ok(())
}
