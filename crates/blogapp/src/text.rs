//! Plain-text helpers for HTML post bodies and dates.

use crate::i18n::Language;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Extracts the readable text of an HTML fragment.
///
/// Tags are dropped, `<br>` and block-level closers become whitespace, and the
/// common character entities are decoded. Contents of `<script>` and
/// `<style>` never contribute text.
pub fn strip_html(html: &str) -> String {
    extract_text(html, true)
}

/// The text nodes of an HTML fragment joined with nothing in between.
///
/// Same rules as [`strip_html`] except that tags never add whitespace, so
/// `<p>a</p><p>b</p>` is `ab`. Length rules count this.
pub fn text_content(html: &str) -> String {
    extract_text(html, false)
}

fn extract_text(html: &str, separate_blocks: bool) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.char_indices().peekable();
    let mut skip_until: Option<&'static str> = None;

    while let Some((i, ch)) = chars.next() {
        if ch == '<' {
            let rest = &html[i..];
            let end = match rest.find('>') {
                Some(end) => end,
                None => {
                    // Unterminated tag: treat the rest as text.
                    out.push_str(&decode_entities(rest));
                    break;
                }
            };
            let tag = rest[1..end].trim().to_ascii_lowercase();
            let name: String = tag
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();

            if let Some(closer) = skip_until {
                if tag.starts_with('/') && name == closer {
                    skip_until = None;
                }
            } else if !tag.starts_with('/') && (name == "script" || name == "style") {
                skip_until = Some(if name == "script" { "script" } else { "style" });
            } else if separate_blocks
                && (name == "br" || (tag.starts_with('/') && is_block(&name)))
            {
                out.push(' ');
            }

            // Advance past the tag.
            while let Some(&(j, _)) = chars.peek() {
                if j > i + end {
                    break;
                }
                chars.next();
            }
            continue;
        }

        if skip_until.is_some() {
            continue;
        }

        if ch == '&' {
            let rest = &html[i..];
            let semi = rest
                .char_indices()
                .take(10)
                .find(|&(_, c)| c == ';')
                .map(|(k, _)| k);
            if let Some(semi) = semi {
                if let Some(decoded) = decode_entity(&rest[1..semi]) {
                    out.push(decoded);
                    while let Some(&(j, _)) = chars.peek() {
                        if j > i + semi {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                }
            }
        }
        out.push(ch);
    }

    out
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre" | "tr"
    )
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Number of visible characters once markup is removed.
pub fn visible_len(html: &str) -> usize {
    text_content(html).trim().chars().count()
}

/// Plain-text excerpt of at most `max_chars` characters, `...` appended when cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    truncate(strip_html(html).trim(), max_chars)
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Long-form date in the given language, e.g. `18 Ekim 2026` or
/// `October 18, 2026`; `with_time` appends `HH:MM`.
pub fn format_date(at: &NaiveDateTime, language: Language, with_time: bool) -> String {
    let month = language.month_name(at.month());
    let date = match language {
        Language::Tr => format!("{} {} {}", at.day(), month, at.year()),
        Language::En => format!("{} {}, {}", month, at.day(), at.year()),
    };
    if with_time {
        format!("{} {:02}:{:02}", date, at.hour(), at.minute())
    } else {
        date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_strip_simple_markup() {
        assert_eq!(strip_html("<p>short</p>"), "short ");
        assert_eq!(visible_len("<p>short</p>"), 5);
    }

    #[test]
    fn test_text_content_adds_no_separators() {
        let html = "<p>one</p><p>two<br>three</p>";
        assert_eq!(text_content(html), "onetwothree");
        assert_eq!(strip_html(html).trim(), "one two three");
        assert_eq!(visible_len(&"<p>x</p>".repeat(26)), 26);
        assert_eq!(text_content("<b>a &amp; b</b>"), "a & b");
    }

    #[test]
    fn test_strip_nested_and_attributes() {
        let html = r#"<h1 class="x">Title</h1><p>Some <strong>bold</strong> text</p>"#;
        assert_eq!(strip_html(html).trim(), "Title Some bold text");
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(strip_html("a &amp; b &lt;c&gt; &#39;d&#39; &#x41;"), "a & b <c> 'd' A");
        assert_eq!(strip_html("R&D"), "R&D");
    }

    #[test]
    fn test_script_and_style_are_invisible() {
        assert_eq!(
            strip_html("<p>x</p><script>alert(1)</script><style>p{}</style>").trim(),
            "x"
        );
    }

    #[test]
    fn test_empty_editor_output_has_no_text() {
        assert_eq!(visible_len("<p><br></p>"), 0);
    }

    #[test]
    fn test_unterminated_tag_kept_as_text() {
        assert_eq!(strip_html("a <b"), "a <b");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("çğüşöı", 3), "çğü...");
    }

    #[test]
    fn test_excerpt_strips_then_truncates() {
        assert_eq!(excerpt("<p>abcdef</p>", 3), "abc...");
    }

    #[test]
    fn test_format_date() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(format_date(&at, Language::Tr, false), "18 Ekim 2026");
        assert_eq!(format_date(&at, Language::En, false), "October 18, 2026");
        assert_eq!(format_date(&at, Language::Tr, true), "18 Ekim 2026 09:05");
    }
}
