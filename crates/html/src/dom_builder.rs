use crate::dom::{Dom, NodeData, NodeId};
use crate::types::Token;

/// Builds `tokens` into `dom` below `parent`.
///
/// Tree construction is deliberately simple: start tags open elements, end tags close the
/// nearest open element with the same name (and everything opened after it), and an end tag
/// with no matching open element is dropped.
pub(crate) fn build_into(dom: &mut Dom, parent: NodeId, tokens: Vec<Token>) {
    let mut open_elements: Vec<(NodeId, String)> = Vec::new();

    for token in tokens {
        let current = open_elements.last().map_or(parent, |(id, _)| *id);
        match token {
            Token::Doctype(doctype) => {
                if let NodeData::Document { doctype: dt } = dom.data_mut(parent) {
                    *dt = Some(doctype);
                }
            }
            Token::Comment(text) => {
                let node = dom.create_comment(text);
                dom.append_child(current, node);
            }
            Token::Text(text) => {
                if !text.is_empty() {
                    let node = dom.create_text(text);
                    dom.append_child(current, node);
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let node = dom.push(NodeData::Element {
                    name: name.clone(),
                    attributes,
                });
                dom.append_child(current, node);
                if !self_closing {
                    open_elements.push((node, name));
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = open_elements.iter().rposition(|(_, open)| *open == name) {
                    open_elements.truncate(pos);
                }
            }
        }
    }
}
