//! HTML serialization for owned trees.
//!
//! Output follows the host DOM's `outerHTML` conventions: lowercase names, attributes in
//! declaration order with double-quoted values (bare attributes stay bare), no end tag for
//! void elements, and rawtext bodies (`script`, `style`) written verbatim.

use crate::tokenizer::{is_rawtext_element, is_void_element};
use crate::types::Node;

enum Step<'a> {
    Node(&'a Node),
    RawText(&'a str),
    EndTag(&'a str),
}

pub(crate) fn write_node(out: &mut String, node: &Node) {
    let mut pending = vec![Step::Node(node)];
    while let Some(step) = pending.pop() {
        let node = match step {
            Step::Node(node) => node,
            Step::RawText(text) => {
                out.push_str(text);
                continue;
            }
            Step::EndTag(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
                continue;
            }
        };
        match node {
            Node::Document { doctype, children } => {
                if let Some(dt) = doctype {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(dt);
                    out.push('>');
                }
                pending.extend(children.iter().rev().map(Step::Node));
            }
            Node::Element {
                name,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        escape_into(out, value, true);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(name) {
                    continue;
                }
                pending.push(Step::EndTag(name));
                let raw = is_rawtext_element(name);
                pending.extend(children.iter().rev().map(|c| match c {
                    Node::Text { text } if raw => Step::RawText(text),
                    _ => Step::Node(c),
                }));
            }
            Node::Text { text } => escape_into(out, text, false),
            Node::Comment { text } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dom, Node};

    #[test]
    fn escapes_text_and_attribute_values() {
        let node = Node::element(
            "p",
            vec![("title".into(), Some(r#"a "b" <c>"#.into()))],
            vec![Node::text("1 < 2 & 3")],
        );
        assert_eq!(
            node.outer_html(),
            r#"<p title="a &quot;b&quot; <c>">1 &lt; 2 &amp; 3</p>"#
        );
    }

    #[test]
    fn void_and_bare_attributes() {
        let dom = Dom::parse_fragment(r#"<input type=checkbox checked><br>"#);
        assert_eq!(
            dom.inner_html(dom.root()),
            r#"<input type="checkbox" checked><br>"#
        );
    }

    #[test]
    fn script_body_is_verbatim() {
        let markup = r#"<script type="text/html"><b>&amp;</b></script>"#;
        let dom = Dom::parse_fragment(markup);
        assert_eq!(dom.inner_html(dom.root()), markup);
    }
}
