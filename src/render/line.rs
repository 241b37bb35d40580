//! Line classification for the digest Markdown dialect.
//!
//! Each physical line maps to exactly one [`Line`] kind. Order of checks:
//! headings, list markers, rules, blank, then plain text.

/// A classified digest line, borrowing its payload from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `#`, `##` or `###` followed by a space.
    Heading { level: u8, text: &'a str },
    /// `• `, `- ` or `* ` prefix; payload is trimmed.
    ListItem(&'a str),
    /// Starts with `---` or `━━━`.
    Rule,
    Blank,
    Text(&'a str),
}

const HEADING_PREFIXES: [(&str, u8); 3] = [("# ", 1), ("## ", 2), ("### ", 3)];
const LIST_MARKERS: [&str; 3] = ["• ", "- ", "* "];
const RULE_MARKERS: [&str; 2] = ["---", "━━━"];

/// Classify a single line. Trailing whitespace is ignored.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();

    for (prefix, level) in HEADING_PREFIXES {
        if let Some(text) = line.strip_prefix(prefix) {
            return Line::Heading { level, text };
        }
    }

    for marker in LIST_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return Line::ListItem(rest.trim());
        }
    }

    if RULE_MARKERS.iter().any(|m| line.starts_with(m)) {
        return Line::Rule;
    }

    if line.is_empty() {
        Line::Blank
    } else {
        Line::Text(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(
            classify("# Title"),
            Line::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            classify("## Section"),
            Line::Heading {
                level: 2,
                text: "Section"
            }
        );
        assert_eq!(
            classify("### Sub"),
            Line::Heading {
                level: 3,
                text: "Sub"
            }
        );
    }

    #[test]
    fn test_deeper_heading_is_text() {
        assert_eq!(classify("#### Too deep"), Line::Text("#### Too deep"));
        assert_eq!(classify("#NoSpace"), Line::Text("#NoSpace"));
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(classify("• BTC up"), Line::ListItem("BTC up"));
        assert_eq!(classify("- ETH flat"), Line::ListItem("ETH flat"));
        assert_eq!(classify("*   SOL down  "), Line::ListItem("SOL down"));
    }

    #[test]
    fn test_heading_never_list_and_list_never_heading() {
        assert!(matches!(classify("# - not a list"), Line::Heading { level: 1, .. }));
        assert_eq!(classify("- # not a heading"), Line::ListItem("# not a heading"));
    }

    #[test]
    fn test_rules() {
        assert_eq!(classify("---"), Line::Rule);
        assert_eq!(classify("-----------"), Line::Rule);
        assert_eq!(classify("━━━━━━━━━━"), Line::Rule);
    }

    #[test]
    fn test_bold_line_is_text_not_list() {
        assert_eq!(classify("**Bold** start"), Line::Text("**Bold** start"));
    }

    #[test]
    fn test_blank_and_whitespace() {
        assert_eq!(classify(""), Line::Blank);
        assert_eq!(classify("   \t"), Line::Blank);
    }

    #[test]
    fn test_plain_text_keeps_leading_whitespace() {
        assert_eq!(classify("  indented  "), Line::Text("  indented"));
    }
}
