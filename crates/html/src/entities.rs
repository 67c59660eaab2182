/// Decode the small entity subset that template markup uses in practice.
///
/// Contract:
/// - Named entities decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric entities decoded only when semicolon-terminated: `&#123;` and `&#x1F4A9;`.
/// - Only valid Unicode scalar values decode; everything else passes through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    const NAMED: [(&[u8], char); 6] = [
        (b"&amp;", '&'),
        (b"&lt;", '<'),
        (b"&gt;", '>'),
        (b"&quot;", '"'),
        (b"&apos;", '\''),
        (b"&nbsp;", '\u{00A0}'),
    ];
    const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
    const MAX_DEC_DIGITS: usize = 7; // 1114111

    // Bounded scan; returns the index of the terminating ';'.
    fn scan_numeric(bytes: &[u8], start: usize, max_digits: usize, hex: bool) -> Option<usize> {
        let mut j = start;
        while j < bytes.len() && j - start <= max_digits {
            let b = bytes[j];
            if b == b';' {
                return (j > start).then_some(j);
            }
            let ok = if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            };
            if !ok {
                return None;
            }
            j += 1;
        }
        None
    }

    let bytes = s.as_bytes();
    if memchr::memchr(b'&', bytes).is_none() {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copy_start = 0;

    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        i += rel;
        out.push_str(&s[copy_start..i]);

        if let Some((pat, ch)) = NAMED.iter().find(|(pat, _)| bytes[i..].starts_with(pat)) {
            out.push(*ch);
            i += pat.len();
            copy_start = i;
            continue;
        }

        let numeric = if bytes[i..].starts_with(b"&#x") || bytes[i..].starts_with(b"&#X") {
            scan_numeric(bytes, i + 3, MAX_HEX_DIGITS, true).and_then(|end| {
                u32::from_str_radix(&s[i + 3..end], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .map(|ch| (ch, end))
            })
        } else if bytes[i..].starts_with(b"&#") {
            scan_numeric(bytes, i + 2, MAX_DEC_DIGITS, false).and_then(|end| {
                s[i + 2..end]
                    .parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .map(|ch| (ch, end))
            })
        } else {
            None
        };

        match numeric {
            Some((ch, end)) => {
                out.push(ch);
                i = end + 1;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
        copy_start = i;
    }

    out.push_str(&s[copy_start..]);
    out
}
