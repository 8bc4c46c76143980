//! Markup cleanup that runs before and during line parsing.
//!
//! - `strip_comments` removes `<!-- -->` blocks (an unterminated one is an error).
//! - `strip_templates` drops `{{...}}` transclusions, nested ones included.
//! - `render_inline` turns a single line of inline markup into plain text.

use lazy_regex::regex_replace_all;

use crate::errors::{Result, WikiError};

/// Remove every html comment from `input`.
pub fn strip_comments(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut offset = 0usize;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        let body = &rest[start + 4..];
        let end = body
            .find("-->")
            .ok_or_else(|| WikiError::parse_at("unterminated comment", offset + start))?;
        let consumed = start + 4 + end + 3;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Name of a template body, for diagnostics (`Infobox|a=b` -> `Infobox`).
fn template_name(body: &str) -> &str {
    body.split('|').next().unwrap_or("").trim()
}

/// Drop all top-level templates (and everything nested in them).
///
/// An unterminated `{{` is left in place as literal text.
pub fn strip_templates(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0usize;
    let mut i = 0usize;

    // Only ascii braces are compared, so byte stepping never splits a char we slice at.
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            let start = i;
            i += 2;
            let mut depth = 1usize;

            while i + 1 < bytes.len() && depth > 0 {
                if bytes[i] == b'{' && bytes[i + 1] == b'{' {
                    depth += 1;
                    i += 2;
                    continue;
                }
                if bytes[i] == b'}' && bytes[i + 1] == b'}' {
                    depth -= 1;
                    i += 2;
                    continue;
                }
                i += 1;
            }

            if depth == 0 {
                out.push_str(&input[copied..start]);
                log::debug!(
                    "Dropping template {:?}",
                    template_name(&input[start + 2..i - 2])
                );
                copied = i;
                continue;
            }
            log::warn!("Unterminated template at byte {}, keeping it as text", start);
            break;
        }
        i += 1;
    }

    out.push_str(&input[copied..]);
    out
}

/// Render one line of inline markup to plain text.
///
/// Links become their label (or target), bold/italic quotes and html tags are
/// removed. Media and category links render as nothing.
pub fn render_inline(line: &str) -> String {
    let s = regex_replace_all!(
        r"(?i)\[\[\s*(?:file|image|category):[^\]]*\]\]",
        line,
        ""
    );
    let s = regex_replace_all!(r"\[\[([^\]|]*)\|([^\]]*)\]\]", &s, "${2}");
    let s = regex_replace_all!(r"\[\[([^\]]*)\]\]", &s, "${1}");
    let s = regex_replace_all!(r"\[(?:https?:)?//[^\s\]]+\s+([^\]]+)\]", &s, "${1}");
    let s = regex_replace_all!(r"\[((?:https?:)?//[^\s\]]+)\]", &s, "${1}");
    let s = regex_replace_all!(r"'{2,}", &s, "");
    let s = regex_replace_all!(r"__[A-Z]+__", &s, "");
    let s = regex_replace_all!(r"</?[a-zA-Z][^>]*>", &s, "");
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_removed() {
        let s = strip_comments("a<!-- hidden -->b<!--\nmulti\n-->c").unwrap();
        assert_eq!(s, "abc");
    }

    #[test]
    fn unterminated_comment_reports_offset() {
        match strip_comments("ok <!-- x --> then <!-- never") {
            Err(WikiError::Parse { offset, .. }) => assert_eq!(offset, Some(19)),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn nested_templates_are_dropped() {
        let s = strip_templates("before {{Infobox|a={{Sub|x=y}}|b=c}} after");
        assert_eq!(s, "before  after");
    }

    #[test]
    fn multiline_template_is_dropped() {
        let s = strip_templates("{{Box\n|a=1\n|b=2\n}}\n== Head ==");
        assert_eq!(s, "\n== Head ==");
    }

    #[test]
    fn unterminated_template_is_kept() {
        let s = strip_templates("x {{broken|y");
        assert_eq!(s, "x {{broken|y");
    }

    #[test]
    fn links_render_as_labels() {
        assert_eq!(render_inline("[[Milk|whole milk]] and [[Eggs]]"), "whole milk and Eggs");
        assert_eq!(
            render_inline("see [https://example.org the shop] or [https://example.org]"),
            "see the shop or https://example.org"
        );
    }

    #[test]
    fn formatting_is_removed() {
        assert_eq!(render_inline("'''bold''' and ''it''"), "bold and it");
        assert_eq!(render_inline("a<br/>b <span class=\"x\">c</span>"), "ab c");
        assert_eq!(render_inline("[[File:Pic.png|thumb]]caption"), "caption");
        assert_eq!(render_inline("__NOTOC__text"), "text");
    }
}
