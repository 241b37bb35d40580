//! Output writers for articles and the feed.
//!
//! # Submodules
//!
//! - [`json`]: writes the article record consumed by the feed stage
//! - [`markdown`]: writes the Markdown sibling with YAML front matter
//! - [`rss`]: writes the assembled feed document
//!
//! # Output Structure
//!
//! ```text
//! public/
//! ├── articles/
//! │   ├── crypto-digest-2025-03-14.json
//! │   └── crypto-digest-2025-03-14.md
//! └── rss.xml
//! ```
//!
//! Writing the same slug twice overwrites the earlier files (last write wins).

pub mod json;
pub mod markdown;
pub mod rss;
