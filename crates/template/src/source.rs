//! Capturing the canonical, unfilled fragment a template renders from.

use crate::error::{TemplateError, TemplateResult};
use html::{Dom, NodeId, is_html_type};

/// How a caller points at a template element (or a render container) in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Selector(&'a str),
    Element(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(id: NodeId) -> Self {
        Target::Element(id)
    }
}

fn invalid(reason: impl Into<String>) -> TemplateError {
    TemplateError::InvalidArgument {
        reason: reason.into(),
    }
}

/// Resolves a selector or node handle to an element of `doc`.
pub fn resolve_element(doc: &Dom, target: Target<'_>) -> TemplateResult<NodeId> {
    let id = match target {
        Target::Selector(selector) => {
            if selector.trim().is_empty() {
                return Err(invalid("empty selector"));
            }
            doc.query_selector(doc.root(), selector)
                .map_err(|e| invalid(e.to_string()))?
                .ok_or_else(|| invalid(format!("no element matches {selector:?}")))?
        }
        Target::Element(id) => id,
    };
    if !doc.is_element(id) {
        return Err(invalid(format!("{id:?} is not an element")));
    }
    Ok(id)
}

/// The immutable fragment a [`Template`](crate::Template) clones on every render.
///
/// The fragment root is a container whose children are the template's top-level nodes.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    fragment: Dom,
}

impl TemplateSource {
    /// Captures the element `target` resolves to.
    ///
    /// - `<template>`: its children are the fragment.
    /// - `<script type="text/html">`: its text is parsed as markup.
    /// - anything else: a copy of the element itself is the single root.
    pub fn new<'a>(doc: &Dom, target: impl Into<Target<'a>>) -> TemplateResult<Self> {
        let element = resolve_element(doc, target.into())?;
        Ok(Self::capture(doc, element))
    }

    pub fn from_selector(doc: &Dom, selector: &str) -> TemplateResult<Self> {
        Self::new(doc, Target::Selector(selector))
    }

    pub fn from_element(doc: &Dom, element: NodeId) -> TemplateResult<Self> {
        Self::new(doc, Target::Element(element))
    }

    /// Like [`TemplateSource::new`], but removes the element from `doc` first.
    pub fn once<'a>(doc: &mut Dom, target: impl Into<Target<'a>>) -> TemplateResult<Self> {
        let element = resolve_element(doc, target.into())?;
        doc.detach(element);
        Ok(Self::capture(doc, element))
    }

    /// Uses `markup` itself as the fragment.
    pub fn from_markup(markup: &str) -> Self {
        Self {
            fragment: Dom::parse_fragment(markup),
        }
    }

    fn capture(doc: &Dom, element: NodeId) -> Self {
        let name = doc.element_name(element).unwrap_or_default();
        if name == "script" && doc.attribute(element, "type").is_some_and(is_html_type) {
            log::debug!(target: "template.source", "capturing script template {element:?}");
            return Self::from_markup(&doc.text_content(element));
        }

        let mut fragment = Dom::new_fragment();
        let root = fragment.root();
        let roots: Vec<NodeId> = if name == "template" {
            doc.children(element).to_vec()
        } else {
            vec![element]
        };
        for node in roots {
            let copy = fragment.import_subtree(doc, node);
            fragment.append_child(root, copy);
        }
        log::debug!(
            target: "template.source",
            "captured <{name}> template {element:?} with {} root node(s)",
            fragment.children(root).len()
        );
        Self { fragment }
    }

    pub fn fragment(&self) -> &Dom {
        &self.fragment
    }

    /// Fresh deep copy of the fragment for one render pass.
    pub(crate) fn instantiate(&self) -> Dom {
        self.fragment.clone()
    }
}
