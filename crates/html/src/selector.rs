//! Small selector engine for element lookup.
//!
//! Supported grammar:
//! - compound selectors built from `*`, `tag`, `#id`, `.class`, `[attr]` and `[attr=value]`
//!   (value may be bare or quoted with `"`/`'`)
//! - the descendant combinator (whitespace)
//! - comma-separated selector lists
//!
//! Tag and attribute names match ASCII case-insensitively; ids, classes and attribute values
//! match exactly.

use std::fmt;

/// Borrowed view of an element, enough to run selector matching against.
#[derive(Clone, Copy, Debug)]
pub struct ElementRef<'a> {
    pub name: &'a str,
    pub attributes: &'a [(String, Option<String>)],
}

impl<'a> ElementRef<'a> {
    pub fn new(name: &'a str, attributes: &'a [(String, Option<String>)]) -> Self {
        Self { name, attributes }
    }

    fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector {:?}: {}", self.selector, self.reason)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn matches(&self, element: ElementRef<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if !element.name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if element.attribute("id") != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let Some(classlist) = element.attribute("class") else {
                return false;
            };
            if !self
                .classes
                .iter()
                .all(|want| classlist.split_whitespace().any(|c| c == want))
            {
                return false;
            }
        }
        self.attrs.iter().all(|m| match m {
            AttrMatch::Exists(name) => element.attribute(name).is_some(),
            AttrMatch::Equals(name, value) => element.attribute(name) == Some(value.as_str()),
        })
    }
}

/// A chain of compound selectors joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    /// `ancestors` is ordered root-first, nearest ancestor last.
    pub fn matches(&self, element: ElementRef<'_>, ancestors: &[ElementRef<'_>]) -> bool {
        self.matches_nearest_first(element, ancestors.iter().rev().copied())
    }

    /// Like [`Selector::matches`], with ancestors yielded nearest first. Ancestors are pulled
    /// only while compounds remain unmatched, so a single compound never touches them.
    pub fn matches_nearest_first<'a>(
        &self,
        element: ElementRef<'_>,
        mut ancestors: impl Iterator<Item = ElementRef<'a>>,
    ) -> bool {
        let Some((subject, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }
        let mut remaining = rest.iter().rev().peekable();
        while let Some(compound) = remaining.peek() {
            let Some(ancestor) = ancestors.next() else {
                return false;
            };
            if compound.matches(ancestor) {
                remaining.next();
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let err = |reason| SelectorError {
            selector: input.to_string(),
            reason,
        };
        let mut selectors = Vec::new();
        for part in split_outside_brackets(input, |c| c == ',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(err("empty selector"));
            }
            let mut compounds = Vec::new();
            for piece in split_outside_brackets(part, char::is_whitespace) {
                if piece.is_empty() {
                    continue;
                }
                compounds.push(parse_compound(piece).map_err(err)?);
            }
            selectors.push(Selector { compounds });
        }
        if selectors.is_empty() {
            return Err(err("empty selector"));
        }
        Ok(Self { selectors })
    }

    pub fn matches(&self, element: ElementRef<'_>, ancestors: &[ElementRef<'_>]) -> bool {
        self.selectors.iter().any(|s| s.matches(element, ancestors))
    }

    pub fn matches_nearest_first<'a, I>(&self, element: ElementRef<'_>, ancestors: I) -> bool
    where
        I: Iterator<Item = ElementRef<'a>> + Clone,
    {
        self.selectors
            .iter()
            .any(|s| s.matches_nearest_first(element, ancestors.clone()))
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectorList::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

// Splits on `is_sep` while ignoring separators inside `[...]` and quotes.
fn split_outside_brackets(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn parse_compound(input: &str) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();
    let mut first = true;
    let mut universal = false;

    while let Some(&c) = chars.peek() {
        match c {
            '*' if first => {
                chars.next();
                universal = true;
            }
            c if first && is_ident_char(c) => {
                compound.tag = Some(take_ident(&mut chars).to_ascii_lowercase());
            }
            '#' => {
                chars.next();
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return Err("expected identifier after '#'");
                }
                compound.id = Some(id);
            }
            '.' => {
                chars.next();
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return Err("expected identifier after '.'");
                }
                compound.classes.push(class);
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr_match(&mut chars)?);
            }
            '>' | '+' | '~' => return Err("only the descendant combinator is supported"),
            _ => return Err("unexpected character"),
        }
        first = false;
    }

    if !universal && compound == Compound::default() {
        return Err("empty compound selector");
    }
    Ok(compound)
}

fn parse_attr_match(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<AttrMatch, &'static str> {
    let skip_ws = |chars: &mut std::iter::Peekable<std::str::Chars<'_>>| {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
    };

    skip_ws(chars);
    let name = take_ident(chars).to_ascii_lowercase();
    if name.is_empty() {
        return Err("expected attribute name");
    }
    skip_ws(chars);
    match chars.next() {
        Some(']') => Ok(AttrMatch::Exists(name)),
        Some('=') => {
            skip_ws(chars);
            let value = match chars.peek().copied() {
                Some(q @ ('"' | '\'')) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == q => break,
                            Some(c) => value.push(c),
                            None => return Err("unterminated attribute value"),
                        }
                    }
                    value
                }
                _ => take_ident(chars),
            };
            skip_ws(chars);
            if chars.next() != Some(']') {
                return Err("expected ']'");
            }
            Ok(AttrMatch::Equals(name, value))
        }
        _ => Err("expected ']' or '='"),
    }
}
