//! Simplified HTML tokenizer with a constrained, practical name character set.
//!
//! Tag and attribute names are ASCII `[A-Za-z0-9:_-]` and are lowercased. This is not the
//! HTML5 state machine: there is no parse-error recovery beyond skipping bytes that cannot
//! start a token. `script`/`style` bodies are rawtext, `textarea`/`title` bodies are
//! rcdata (entities decoded, no tags).
use crate::entities::decode_entities;
use crate::types::{Attributes, Token};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn is_rawtext_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

fn is_rcdata_element(name: &str) -> bool {
    matches!(name, "textarea" | "title")
}

// `</name` followed by optional ASCII whitespace and `>`, case-insensitive.
// Only matches starting at ASCII '<', which never appears inside a UTF-8 continuation byte.
fn find_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let n = name.len() + 2;
    let mut i = 0;
    while i + n <= bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if i + n > bytes.len() {
            return None;
        }
        if bytes[i + 1] == b'/' && bytes[i + 2..i + n].eq_ignore_ascii_case(name.as_bytes()) {
            let mut k = i + n;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    // Slices are only cut at ASCII structural bytes, so every endpoint is a char boundary.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            let text = decode_entities(&input[start..i]);
            if !text.is_empty() {
                out.push(Token::Text(text));
            }
            continue;
        }

        if input[i..].starts_with(HTML_COMMENT_START) {
            let body_start = i + HTML_COMMENT_START.len();
            match input[body_start..].find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + HTML_COMMENT_END.len();
                    continue;
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    break;
                }
            }
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            let doctype = rest[..end].trim();
            // Drop the `doctype` keyword itself.
            let doctype = doctype.get(7..).map_or(doctype, str::trim);
            out.push(Token::Doctype(doctype.to_string()));
            i += 2 + end + 1;
            continue;
        }

        // end tag
        if i + 1 < len && bytes[i + 1] == b'/' {
            let start = i + 2;
            let mut j = start;
            while j < len && is_name_char(bytes[j]) {
                j += 1;
            }
            let name = input[start..j].to_ascii_lowercase();
            j = memchr(b'>', &bytes[j..]).map_or(len, |rel| j + rel + 1);
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            i = j;
            continue;
        }

        // start tag
        let start = i + 1;
        let mut k = start;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        if k == start {
            // A lone '<' is text.
            out.push(Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let name = input[start..k].to_ascii_lowercase();
        let mut attributes: Attributes = Vec::new();
        let mut self_closing = false;

        loop {
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }
            let name_start = k;
            while k < len && is_name_char(bytes[k]) {
                k += 1;
            }
            if name_start == k {
                k += 1;
                continue;
            }
            let attribute_name = input[name_start..k].to_ascii_lowercase();

            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            let value = if k < len && bytes[k] == b'=' {
                k += 1;
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let vstart = k;
                    k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                    let raw = &input[vstart..k];
                    if k < len {
                        k += 1;
                    }
                    Some(decode_entities(raw))
                } else {
                    let vstart = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                            break;
                        }
                        k += 1;
                    }
                    Some(decode_entities(&input[vstart..k]))
                }
            } else {
                None
            };
            // First declaration wins, as in the host DOM.
            if !attributes.iter().any(|(n, _)| *n == attribute_name) {
                attributes.push((attribute_name, value));
            }
        }

        if is_void_element(&name) {
            self_closing = true;
        }
        let raw_body = !self_closing && (is_rawtext_element(&name) || is_rcdata_element(&name));
        let decode_body = is_rcdata_element(&name);
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if raw_body {
            let body = &input[k.min(len)..];
            let (text, next) = match find_close_tag(body, &name) {
                Some((rel_start, rel_end)) => (&body[..rel_start], k + rel_end),
                None => (body, len),
            };
            if !text.is_empty() {
                let text = if decode_body {
                    decode_entities(text)
                } else {
                    text.to_string()
                };
                out.push(Token::Text(text));
            }
            out.push(Token::EndTag(name));
            i = next;
            continue;
        }

        i = k;
    }
    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", len, out.len());
    out
}
