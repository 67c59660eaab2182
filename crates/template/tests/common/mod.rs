#![allow(dead_code)]

use html::{Dom, Node, NodeId};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use template::Value;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"))
}

pub fn cards_document() -> Dom {
    Dom::parse_document(&read_fixture("cards.html"))
}

pub fn card_attr() -> serde_json::Value {
    json!({
        "cardName": "card",
        "cardIndex": 0,
        "cardAction": "Clique para uma surpresa",
    })
}

pub fn card_content() -> serde_json::Value {
    json!({
        "cardTitle": "Lorem Ipsum Dolo Sit",
        "cardContent": "Nadinha",
    })
}

/// `{ content, attr }` record built from the two halves.
pub fn split(content: serde_json::Value, attr: serde_json::Value) -> Value {
    Value::from(json!({ "content": content, "attr": attr }))
}

/// Both halves merged into one flat record.
pub fn flat(content: serde_json::Value, attr: serde_json::Value) -> Value {
    let mut merged = content;
    if let (Some(into), Some(from)) = (merged.as_object_mut(), attr.as_object()) {
        into.extend(from.clone());
    }
    Value::from(merged)
}

pub fn select<'a>(node: &'a Node, selector: &str) -> &'a Node {
    node.select_first(selector)
        .unwrap_or_else(|err| panic!("bad selector {selector:?}: {err}"))
        .unwrap_or_else(|| panic!("nothing matches {selector:?} in {}", node.outer_html()))
}

pub fn element(doc: &Dom, selector: &str) -> NodeId {
    doc.query_selector(doc.root(), selector)
        .unwrap_or_else(|err| panic!("bad selector {selector:?}: {err}"))
        .unwrap_or_else(|| panic!("nothing matches {selector:?}"))
}

/// Asserts the rendered card matches the given halves.
pub fn assert_card(card: &Node, attr: &serde_json::Value, content: &serde_json::Value) {
    assert_eq!(
        card.attribute("id").map(str::to_string),
        Some(format!("{}-{}", attr["cardName"].as_str().unwrap(), attr["cardIndex"]))
    );
    assert_eq!(
        select(card, ".card-header").attribute("title"),
        attr["cardAction"].as_str()
    );
    assert_eq!(
        select(card, ".card-title").text_content(),
        content["cardTitle"].as_str().unwrap()
    );
    assert_eq!(
        select(card, ".card-body").text_content(),
        content["cardContent"].as_str().unwrap()
    );
}

/// True when no `item` or `item-*` marker survived anywhere under `node`.
pub fn has_no_markers(node: &Node) -> bool {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        let marked = node
            .attributes()
            .iter()
            .any(|(name, _)| name == "item" || name.starts_with("item-"));
        if marked {
            return false;
        }
        pending.extend(node.children());
    }
    true
}
