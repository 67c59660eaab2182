//! In-memory HTML DOM: tokenizer, tree builder, mutable arena, selectors and serialization.

mod dom;
mod dom_builder;
mod entities;
mod selector;
mod serialize;
mod tokenizer;
mod types;

pub use crate::dom::{Dom, InsertPosition, NodeId};
pub use crate::selector::{ElementRef, Selector, SelectorError, SelectorList};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Attributes, Node, Token};

/// True for a `type` attribute naming HTML markup (`text/html`, any case, optional
/// parameters such as `; charset=utf-8`).
pub fn is_html_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case("text/html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_type_detection() {
        assert!(is_html_type("text/html"));
        assert!(is_html_type(" Text/HTML; charset=utf-8"));
        assert!(!is_html_type("text/javascript"));
        assert!(!is_html_type(""));
    }
}
