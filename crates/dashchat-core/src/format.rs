// dashchat core: Message Formatter
//
// Turns assistant text written in a small markdown-like dialect into an HTML
// fragment made only of <p> and <span> elements.
//
//   **x**        → <span class="bold-text">x</span>
//   ###          → section break (literal split, may appear mid-line)
//   1. Title     → <p class="section-title">1. Title</p>
//   -Point       → <p class="subsection"><span class="bold-text">Point</span></p>
//   Key: value   → <p><span class="subtitle">Key</span>: value</p>
//   anything     → <p>anything</p>
//
// No escaping is performed. Callers that feed untrusted text must escape it
// themselves before inserting the fragment into a page.

use regex::Regex;
use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

// ── Markers ────────────────────────────────────────────────────────────

const SECTION_MARKER: &str = "###";

const BOLD_REPLACEMENT: &str = r#"<span class="bold-text">${1}</span>"#;

/// `**X**`, non-greedy, never spanning a newline (`.` excludes `\n`).
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is a valid regex"));

// ── Public API ─────────────────────────────────────────────────────────

/// Format raw assistant text into an HTML fragment.
///
/// Accepts `&str` or `Option<&str>`; `None` and `""` both yield `""`.
/// Total over its input: never fails, never panics.
pub fn format_message<'a>(text: impl Into<Option<&'a str>>) -> String {
    let text = match text.into() {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };

    let emphasized = text
        .split('\n')
        .map(apply_bold)
        .collect::<Vec<_>>()
        .join("\n");

    emphasized
        .split(SECTION_MARKER)
        .filter(|section| !section.trim().is_empty())
        .map(render_section)
        .collect()
}

fn apply_bold(line: &str) -> Cow<'_, str> {
    BOLD.replace_all(line, BOLD_REPLACEMENT)
}

fn render_section(section: &str) -> String {
    let mut out = String::new();
    for line in section.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        LineShape::classify(line).render_into(&mut out);
    }
    out
}

// ── Line classification ────────────────────────────────────────────────

/// Shape of one trimmed, non-empty line. Variants are listed in match
/// priority: the first rule that fits wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape<'a> {
    /// Starts with one or more ASCII digits followed by `.`.
    SectionTitle(&'a str),
    /// Starts with `-`; holds the text after the first dash, trimmed.
    Subsection(&'a str),
    /// Contains `:`; split on the first one only.
    Field { subtitle: &'a str, content: &'a str },
    Plain(&'a str),
}

impl<'a> LineShape<'a> {
    fn classify(line: &'a str) -> Self {
        if starts_with_ordinal(line) {
            return LineShape::SectionTitle(line);
        }
        if let Some(rest) = line.strip_prefix('-') {
            return LineShape::Subsection(rest.trim());
        }
        if let Some((subtitle, content)) = line.split_once(':') {
            return LineShape::Field {
                subtitle: subtitle.trim(),
                content: content.trim(),
            };
        }
        LineShape::Plain(line)
    }

    fn render_into(self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match self {
            LineShape::SectionTitle(line) => write!(out, r#"<p class="section-title">{line}</p>"#),
            LineShape::Subsection(rest) => write!(
                out,
                r#"<p class="subsection"><span class="bold-text">{rest}</span></p>"#
            ),
            LineShape::Field { subtitle, content } => write!(
                out,
                r#"<p><span class="subtitle">{subtitle}</span>: {content}</p>"#
            ),
            LineShape::Plain(line) => write!(out, "<p>{line}</p>"),
        };
    }
}

/// `^[0-9]+\.`: ASCII digits only, unlike Unicode-aware `\d`.
fn starts_with_ordinal(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert_eq!(format_message(None), "");
        assert_eq!(format_message(""), "");
        assert_eq!(format_message("   \n###\n  "), "");
        assert_eq!(format_message("######"), "");
    }

    #[test]
    fn plain_line_is_wrapped_in_paragraph() {
        assert_eq!(format_message("hello"), "<p>hello</p>");
    }

    #[test]
    fn bold_spans_replaced_left_to_right() {
        assert_eq!(
            format_message("**hi** there"),
            r#"<p><span class="bold-text">hi</span> there</p>"#
        );
        assert_eq!(
            format_message("**a** and **b**"),
            r#"<p><span class="bold-text">a</span> and <span class="bold-text">b</span></p>"#
        );
    }

    #[test]
    fn unmatched_asterisks_left_alone() {
        assert_eq!(format_message("a * b"), "<p>a * b</p>");
        assert_eq!(format_message("**open only"), "<p>**open only</p>");
        assert_eq!(format_message("a *** b"), "<p>a *** b</p>");
    }

    #[test]
    fn bold_does_not_cross_lines() {
        assert_eq!(format_message("**a\nb**"), "<p>**a</p><p>b**</p>");
    }

    #[test]
    fn numbered_heading_wins_over_colon_and_dash() {
        assert_eq!(
            format_message("### 1. Title: detail"),
            r#"<p class="section-title">1. Title: detail</p>"#
        );
        assert_eq!(
            format_message("1.-Point"),
            r#"<p class="section-title">1.-Point</p>"#
        );
        assert_eq!(
            format_message("12. Twelve"),
            r#"<p class="section-title">12. Twelve</p>"#
        );
    }

    #[test]
    fn digits_without_dot_are_not_headings() {
        assert_eq!(format_message("2024 was a year"), "<p>2024 was a year</p>");
        assert_eq!(format_message(".5 percent"), "<p>.5 percent</p>");
    }

    #[test]
    fn non_ascii_digits_are_not_headings() {
        assert_eq!(format_message("١. one"), "<p>١. one</p>");
    }

    #[test]
    fn dash_subsection_strips_first_dash_only() {
        assert_eq!(
            format_message("### -Point A"),
            r#"<p class="subsection"><span class="bold-text">Point A</span></p>"#
        );
        assert_eq!(
            format_message("-- double"),
            r#"<p class="subsection"><span class="bold-text">- double</span></p>"#
        );
        assert_eq!(
            format_message("- key: value"),
            r#"<p class="subsection"><span class="bold-text">key: value</span></p>"#
        );
    }

    #[test]
    fn key_value_splits_on_first_colon() {
        assert_eq!(
            format_message("### Name: Alice"),
            r#"<p><span class="subtitle">Name</span>: Alice</p>"#
        );
        assert_eq!(
            format_message("Time:  10:30 : sharp "),
            r#"<p><span class="subtitle">Time</span>: 10:30 : sharp</p>"#
        );
        assert_eq!(
            format_message("Note:"),
            r#"<p><span class="subtitle">Note</span>: </p>"#
        );
    }

    #[test]
    fn sections_render_in_order_without_separator() {
        assert_eq!(
            format_message("### A: 1\n### B: 2"),
            concat!(
                r#"<p><span class="subtitle">A</span>: 1</p>"#,
                r#"<p><span class="subtitle">B</span>: 2</p>"#
            )
        );
    }

    #[test]
    fn section_marker_splits_mid_line() {
        assert_eq!(
            format_message("Intro ### Name: Bob"),
            r#"<p>Intro</p><p><span class="subtitle">Name</span>: Bob</p>"#
        );
    }

    #[test]
    fn blank_lines_and_carriage_returns_are_dropped() {
        assert_eq!(
            format_message("first\r\n\r\n   \n  second  "),
            "<p>first</p><p>second</p>"
        );
    }

    #[test]
    fn bold_applied_before_classification() {
        assert_eq!(
            format_message("-**Key** point"),
            r#"<p class="subsection"><span class="bold-text"><span class="bold-text">Key</span> point</span></p>"#
        );
        // Generated spans carry no colon, so the split lands after them.
        assert_eq!(
            format_message("**Label**: text"),
            r#"<p><span class="subtitle"><span class="bold-text">Label</span></span>: text</p>"#
        );
    }

    #[test]
    fn classify_prefers_first_matching_rule() {
        assert_eq!(LineShape::classify("3. x: y"), LineShape::SectionTitle("3. x: y"));
        assert_eq!(LineShape::classify("-x: y"), LineShape::Subsection("x: y"));
        assert_eq!(
            LineShape::classify("x : y"),
            LineShape::Field { subtitle: "x", content: "y" }
        );
        assert_eq!(LineShape::classify("x"), LineShape::Plain("x"));
    }
}
