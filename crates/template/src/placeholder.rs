//! `{{identifier}}` placeholders inside attribute templates.
//!
//! An identifier is one or more ASCII word characters (`[A-Za-z0-9_]`). Anything else
//! between braces (`{{ name }}`, `{{}}`, `{{a-b}}`) is literal text. Matching is
//! leftmost-first and non-overlapping, so `{{{a}}}` keeps the outer braces.

use memchr::memchr;

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte range of the placeholder starting at or after `from`, with the identifier range.
fn next_placeholder(bytes: &[u8], mut from: usize) -> Option<(usize, usize, usize)> {
    while let Some(rel) = memchr(b'{', &bytes[from..]) {
        let start = from + rel;
        if bytes.get(start + 1) == Some(&b'{') {
            let ident_start = start + 2;
            let mut end = ident_start;
            while end < bytes.len() && is_word(bytes[end]) {
                end += 1;
            }
            if end > ident_start && bytes[end..].starts_with(b"}}") {
                return Some((start, ident_start, end));
            }
        }
        from = start + 1;
    }
    None
}

/// Identifiers referenced by `template`, in order of appearance (duplicates kept).
pub fn placeholder_keys(template: &str) -> Vec<&str> {
    let bytes = template.as_bytes();
    let mut keys = Vec::new();
    let mut at = 0;
    while let Some((_, ident_start, ident_end)) = next_placeholder(bytes, at) {
        keys.push(&template[ident_start..ident_end]);
        at = ident_end + 2;
    }
    keys
}

/// Replaces every placeholder with `resolve(identifier)`, stopping at the first error.
pub(crate) fn substitute<E>(
    template: &str,
    mut resolve: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut copied = 0;
    while let Some((start, ident_start, ident_end)) = next_placeholder(bytes, copied) {
        out.push_str(&template[copied..start]);
        out.push_str(&resolve(&template[ident_start..ident_end])?);
        copied = ident_end + 2;
    }
    out.push_str(&template[copied..]);
    Ok(out)
}
