//! Digest Markdown to whitelist HTML.
//!
//! The publisher only accepts `h1-h4, p, br, strong/b, em/i, a, img, figure,
//! figcaption, ul, li` inside `content:encoded`. The dialect here is tiny
//! and is not a general Markdown renderer:
//!
//! - [`line`]: classifies each input line
//! - [`inline`]: escapes text and applies emphasis
//! - [`blocks`]: the single-pass list state machine producing [`Block`]s

pub mod blocks;
pub mod inline;
pub mod line;

pub use blocks::{Block, BlockRenderer};

use serde::{Deserialize, Serialize};

/// How emphasis markers inside list items are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListItemEmphasis {
    #[default]
    Preserve,
    Strip,
}

/// Rendering knobs shared by article bodies and feed content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Render or strip emphasis inside `<li>`.
    pub list_item_emphasis: ListItemEmphasis,
    /// Render `*italic*` inside list items too (bold is always rendered
    /// when emphasis is preserved).
    pub italic_in_lists: bool,
    /// Drop the first level-1 heading, for when the title is rendered
    /// outside the body. Set by the caller, never read from config.
    #[serde(skip)]
    pub skip_leading_heading: bool,
    /// Escape `'` as `&apos;`.
    pub escape_apostrophe: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            list_item_emphasis: ListItemEmphasis::Preserve,
            italic_in_lists: false,
            skip_leading_heading: false,
            escape_apostrophe: true,
        }
    }
}
