//! Block accumulation: the list state machine.
//!
//! Lines are consumed in order. The only state is whether a `<ul>` is
//! currently open; anything that is not a list item closes it, including a
//! blank line. So `- a`, blank, `- b` renders as two separate lists.

use super::inline::{Emphasis, escape_markup, format_inline};
use super::line::{Line, classify};
use super::{ListItemEmphasis, RenderOptions};
use tracing::{debug, instrument};

/// One rendered unit of whitelist markup. Text payloads are already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    List(Vec<String>),
    /// Emitted as `<br/>`; `<hr>` is not on the whitelist.
    Rule,
    Figure {
        src: String,
        alt: String,
        width: u32,
        height: u32,
    },
}

impl Block {
    /// Append this block's HTML to `out`.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Block::Heading { level, text } => {
                out.push_str(&format!("<h{level}>{text}</h{level}>"));
            }
            Block::Paragraph(text) => out.push_str(&format!("<p>{text}</p>")),
            Block::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str(&format!("<li>{item}</li>"));
                }
                out.push_str("</ul>");
            }
            Block::Rule => out.push_str("<br/>"),
            Block::Figure {
                src,
                alt,
                width,
                height,
            } => out.push_str(&format!(
                r#"<figure><img src="{src}" alt="{alt}" width="{width}" height="{height}"/></figure>"#
            )),
        }
    }

    /// Build a figure block, escaping the attribute values.
    pub fn figure(src: &str, alt: &str, width: u32, height: u32) -> Self {
        Block::Figure {
            src: escape_markup(src, true).into_owned(),
            alt: escape_markup(alt, true).into_owned(),
            width,
            height,
        }
    }
}

/// Join blocks into one HTML fragment, one block per line.
pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        block.write_html(&mut out);
    }
    out
}

#[derive(Debug)]
enum ListState {
    Outside,
    Inside(Vec<String>),
}

/// Converts digest Markdown into [`Block`]s according to [`RenderOptions`].
#[derive(Debug, Clone, Default)]
pub struct BlockRenderer {
    options: RenderOptions,
}

impl BlockRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `text` into blocks. Never fails.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn render(&self, text: &str) -> Vec<Block> {
        let mut acc = Accumulator {
            options: &self.options,
            blocks: Vec::new(),
            state: ListState::Outside,
            heading_skipped: false,
        };
        for line in text.lines() {
            acc.push(classify(line));
        }
        let blocks = acc.finish();
        debug!(blocks = blocks.len(), "Rendered digest blocks");
        blocks
    }
}

fn list_emphasis(options: &RenderOptions) -> Emphasis {
    match (options.list_item_emphasis, options.italic_in_lists) {
        (ListItemEmphasis::Strip, _) => Emphasis::Stripped,
        (ListItemEmphasis::Preserve, true) => Emphasis::Full,
        (ListItemEmphasis::Preserve, false) => Emphasis::BoldOnly,
    }
}

struct Accumulator<'a> {
    options: &'a RenderOptions,
    blocks: Vec<Block>,
    state: ListState,
    heading_skipped: bool,
}

impl Accumulator<'_> {
    fn push(&mut self, line: Line<'_>) {
        let escape_apostrophe = self.options.escape_apostrophe;

        if let Line::ListItem(text) = line {
            let item = format_inline(text, list_emphasis(self.options), escape_apostrophe);
            match &mut self.state {
                ListState::Inside(items) => items.push(item),
                ListState::Outside => self.state = ListState::Inside(vec![item]),
            }
            return;
        }

        self.close_list();

        match line {
            Line::Heading { level, text } => {
                if level == 1 && self.options.skip_leading_heading && !self.heading_skipped {
                    self.heading_skipped = true;
                    return;
                }
                self.blocks.push(Block::Heading {
                    level,
                    text: escape_markup(text, escape_apostrophe).into_owned(),
                });
            }
            Line::Rule => self.blocks.push(Block::Rule),
            Line::Text(text) => self.blocks.push(Block::Paragraph(format_inline(
                text,
                Emphasis::Full,
                escape_apostrophe,
            ))),
            Line::Blank | Line::ListItem(_) => {}
        }
    }

    fn close_list(&mut self) {
        if let ListState::Inside(items) = std::mem::replace(&mut self.state, ListState::Outside) {
            self.blocks.push(Block::List(items));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_list();
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(text: &str) -> String {
        html(&BlockRenderer::default(), text)
    }

    fn html(renderer: &BlockRenderer, text: &str) -> String {
        blocks_to_html(&renderer.render(text))
    }

    #[test]
    fn test_blank_line_splits_lists() {
        assert_eq!(
            render("- a\n\n- b"),
            "<ul><li>a</li></ul>\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_consecutive_items_share_one_list() {
        assert_eq!(
            BlockRenderer::default().render("• one\n- two\n* three"),
            vec![Block::List(vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string()
            ])]
        );
    }

    #[test]
    fn test_headings_rules_and_paragraphs() {
        let text = "# Title\n## Market\nBTC **up** *fast*\n---\n### Notes\n━━━━━━";
        assert_eq!(
            render(text),
            "<h1>Title</h1>\n<h2>Market</h2>\n<p>BTC <strong>up</strong> <em>fast</em></p>\n<br/>\n<h3>Notes</h3>\n<br/>"
        );
    }

    #[test]
    fn test_heading_closes_open_list() {
        assert_eq!(
            render("- a\n## Next\ntext"),
            "<ul><li>a</li></ul>\n<h2>Next</h2>\n<p>text</p>"
        );
    }

    #[test]
    fn test_list_is_closed_at_end_of_input() {
        assert_eq!(
            render("intro\n- a\n- b"),
            "<p>intro</p>\n<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_list_items_bold_only_by_default() {
        assert_eq!(
            render("- **BTC** *note*"),
            "<ul><li><strong>BTC</strong> *note*</li></ul>"
        );
    }

    #[test]
    fn test_list_items_italic_when_enabled() {
        let renderer = BlockRenderer::new(RenderOptions {
            italic_in_lists: true,
            ..RenderOptions::default()
        });
        assert_eq!(
            html(&renderer, "- **BTC** *note*"),
            "<ul><li><strong>BTC</strong> <em>note</em></li></ul>"
        );
    }

    #[test]
    fn test_list_items_stripped() {
        let renderer = BlockRenderer::new(RenderOptions {
            list_item_emphasis: ListItemEmphasis::Strip,
            ..RenderOptions::default()
        });
        assert_eq!(
            html(&renderer, "- **BTC** up\nplain **bold**"),
            "<ul><li>BTC up</li></ul>\n<p>plain <strong>bold</strong></p>"
        );
    }

    #[test]
    fn test_skip_leading_heading_fires_once() {
        let renderer = BlockRenderer::new(RenderOptions {
            skip_leading_heading: true,
            ..RenderOptions::default()
        });
        assert_eq!(
            html(&renderer, "## Before\n# Title\ntext\n# Second"),
            "<h2>Before</h2>\n<p>text</p>\n<h1>Second</h1>"
        );
        // The flag is per call, not per renderer.
        assert_eq!(html(&renderer, "# Again\nx"), "<p>x</p>");
    }

    #[test]
    fn test_headings_are_escaped_not_formatted() {
        assert_eq!(render("# A & B **x**"), "<h1>A &amp; B **x**</h1>");
    }

    #[test]
    fn test_apostrophe_option() {
        let renderer = BlockRenderer::new(RenderOptions {
            escape_apostrophe: false,
            ..RenderOptions::default()
        });
        assert_eq!(html(&renderer, "it's"), "<p>it's</p>");
        assert_eq!(render("it's"), "<p>it&apos;s</p>");
    }

    #[test]
    fn test_overlapping_emphasis_renders_nested_html() {
        let renderer = BlockRenderer::new(RenderOptions {
            italic_in_lists: true,
            ..RenderOptions::default()
        });
        let text = "***bold italic***\n**a *b** c*\nplain *x **y* z**\n- ***item***";
        let doc = format!("<root>{}</root>", html(&renderer, text));

        let mut reader = quick_xml::Reader::from_str(&doc);
        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("ill-formed output {doc:?}: {e}"),
            }
        }
        assert!(doc.contains("<p><strong>*bold italic</strong>*</p>"));
        assert!(doc.contains("<li><strong>*item</strong>*</li>"));
    }

    #[test]
    fn test_no_unescaped_chars_in_payloads() {
        let blocks =
            BlockRenderer::default().render("<b>\"x\" & y</b>\n- <i>'z'</i>\n# <h1>");
        for block in blocks {
            let payloads = match block {
                Block::Heading { text, .. } => vec![text],
                Block::Paragraph(text) => vec![text],
                Block::List(items) => items,
                _ => vec![],
            };
            for payload in payloads {
                assert!(!payload.contains(['<', '>', '"', '\'']), "unescaped: {payload}");
                let stripped = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]
                    .iter()
                    .fold(payload.clone(), |acc, entity| acc.replace(entity, ""));
                assert!(!stripped.contains('&'), "bare ampersand: {payload}");
            }
        }
    }

    #[test]
    fn test_figure_escapes_attributes() {
        let mut out = String::new();
        Block::figure("https://x.test/c.jpg?a=1&b=2", "Say \"hi\"", 1200, 800)
            .write_html(&mut out);
        assert_eq!(
            out,
            r#"<figure><img src="https://x.test/c.jpg?a=1&amp;b=2" alt="Say &quot;hi&quot;" width="1200" height="800"/></figure>"#
        );
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert!(BlockRenderer::default().render("").is_empty());
        assert_eq!(render("\n\n"), "");
    }
}
