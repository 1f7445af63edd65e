//! Rich-text cell markup
//!
//! Cells hold HTML-like markup as produced by document import and by the
//! cell editor: `<p>`, `<strong>`/`<b>`, `<em>`/`<i>`, `<u>`, `<br>` and
//! character entities. Two projections are derived from it:
//!
//! - [`plain_text`] - the searchable text of a cell (what a DOM would report
//!   as `textContent`, trimmed)
//! - [`paragraphs`] - styled runs grouped by paragraph, used by export
//!
//! The scanner is deliberately lenient: unknown tags are ignored, unclosed
//! tags are fine, and a `<` that does not open a tag is kept as text.

use std::borrow::Cow;

/// Longest entity name we try to decode (`#x10FFFF` plus slack)
const MAX_ENTITY_LEN: usize = 10;

/// A styled span of text inside a paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Tag { name: String, closing: bool },
    Comment,
}

/// Derive the plain-text projection of a cell's markup
pub fn plain_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(markup.len());
    for token in tokenize(markup) {
        if let Token::Text(text) = token {
            out.push_str(&decode_entities(text));
        }
    }
    out.trim().to_string()
}

/// Split markup into paragraphs of styled runs
///
/// `</p>`, `</div>` and `<br>` end a paragraph. The result always contains
/// at least one (possibly empty) paragraph.
pub fn paragraphs(markup: &str) -> Vec<Vec<TextRun>> {
    let mut result: Vec<Vec<TextRun>> = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut underline = 0usize;

    for token in tokenize(markup) {
        match token {
            Token::Text(text) => {
                let text = decode_entities(text);
                if text.is_empty() {
                    continue;
                }
                current.push(TextRun {
                    text: text.into_owned(),
                    bold: bold > 0,
                    italic: italic > 0,
                    underline: underline > 0,
                });
            }
            Token::Tag { name, closing } => match name.as_str() {
                "strong" | "b" => adjust_depth(&mut bold, closing),
                "em" | "i" => adjust_depth(&mut italic, closing),
                "u" => adjust_depth(&mut underline, closing),
                "br" => result.push(std::mem::take(&mut current)),
                "p" | "div" => {
                    if closing || !current.is_empty() {
                        result.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Token::Comment => {}
        }
    }

    if !current.is_empty() || result.is_empty() {
        result.push(current);
    }
    result
}

/// Escape plain text so it can be embedded in markup
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Build cell markup from plain text (newlines become `<br>`)
pub fn from_plain_text(text: &str) -> String {
    text.lines()
        .map(|line| escape(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>")
}

fn adjust_depth(depth: &mut usize, closing: bool) {
    if closing {
        *depth = depth.saturating_sub(1);
    } else {
        *depth += 1;
    }
}

fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = markup;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let tail = &rest[lt..];
        match parse_tag(tail) {
            Some((token, consumed)) => {
                tokens.push(token);
                rest = &tail[consumed..];
            }
            None => {
                tokens.push(Token::Text(&tail[..1]));
                rest = &tail[1..];
            }
        }
    }

    tokens
}

/// Parse a tag at the start of `s` (which begins with `<`).
///
/// Returns the token and the number of bytes consumed.
fn parse_tag(s: &str) -> Option<(Token<'_>, usize)> {
    if let Some(body) = s.strip_prefix("<!--") {
        let end = body.find("-->")?;
        return Some((Token::Comment, 4 + end + 3));
    }

    let gt = s.find('>')?;
    let inner = &s[1..gt];
    let closing = inner.starts_with('/');
    let body = inner.trim_start_matches('/');
    let name: String = body
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    Some((Token::Tag { name, closing }, gt + 1))
}

/// Decode character entities (`&amp;`, `&#39;`, `&#x2014;`, `&nbsp;`, ...)
///
/// Unknown entities are left untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail[1..]
            .find(';')
            .filter(|&semi| semi <= MAX_ENTITY_LEN)
            .and_then(|semi| entity_char(&tail[1..1 + semi]).map(|ch| (ch, semi + 2)));

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(plain_text("<p><strong>apple</strong> pie</p>"), "apple pie");
        assert_eq!(plain_text(""), "");
        assert_eq!(plain_text("   padded   "), "padded");
    }

    #[test]
    fn test_plain_text_concatenates_paragraphs() {
        // Same as textContent: block boundaries add no characters
        assert_eq!(plain_text("<p>one</p><p>two</p>"), "onetwo");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        assert_eq!(plain_text("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(plain_text("&lt;tag&gt;"), "<tag>");
        assert_eq!(plain_text("it&#39;s"), "it's");
        assert_eq!(plain_text("dash&#x2014;here"), "dash\u{2014}here");
        assert_eq!(plain_text("AT&T"), "AT&T");
        assert_eq!(plain_text("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_plain_text_keeps_stray_angle_bracket() {
        assert_eq!(plain_text("a < b"), "a < b");
        assert_eq!(plain_text("1 <2"), "1 <2");
    }

    #[test]
    fn test_plain_text_skips_comments() {
        assert_eq!(plain_text("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_paragraphs_styles() {
        let paras = paragraphs("<p><strong>Bold</strong> and <em><u>both</u></em></p>");
        assert_eq!(paras.len(), 1);
        let runs = &paras[0];
        assert_eq!(runs.len(), 3);
        assert!(runs[0].bold && !runs[0].italic);
        assert_eq!(runs[1], TextRun::plain(" and "));
        assert!(runs[2].italic && runs[2].underline && !runs[2].bold);
    }

    #[test]
    fn test_paragraphs_split_on_p_and_br() {
        let paras = paragraphs("<p>one</p><p>two<br>three</p>");
        let texts: Vec<String> = paras
            .iter()
            .map(|p| p.iter().map(|r| r.text.as_str()).collect())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_paragraphs_never_empty() {
        assert_eq!(paragraphs(""), vec![Vec::<TextRun>::new()]);
    }

    #[test]
    fn test_escape_and_from_plain_text() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(from_plain_text("line 1\nline <2>"), "line 1<br>line &lt;2&gt;");
        assert_eq!(plain_text(&from_plain_text("x & y")), "x & y");
    }
}
