//! Mutable DOM arena.
//!
//! Nodes live in a flat `Vec` and refer to each other through [`NodeId`] handles. Detached
//! nodes stay in the arena until the whole `Dom` is dropped; nothing is ever freed
//! individually, so a `NodeId` stays valid for the lifetime of its `Dom`.
//!
//! Invariants:
//! - A node has at most one parent, and `parent`/`children` links always agree.
//! - Only documents, fragments and elements have children.
//! - Attribute order is declaration order; `set_attribute` on an existing name replaces in
//!   place.
//! - Cloning a `Dom` deep-copies every node; ids stay valid in the copy.

use crate::dom_builder::build_into;
use crate::selector::{ElementRef, SelectorError, SelectorList};
use crate::tokenizer::tokenize;
use crate::types::{Attributes, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where to insert relative to a target node, named after `insertAdjacentElement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the target, as a sibling.
    BeforeBegin,
    /// Inside the target, before its first child.
    AfterBegin,
    /// Inside the target, after its last child.
    BeforeEnd,
    /// After the target, as a sibling.
    AfterEnd,
}

impl InsertPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            InsertPosition::BeforeBegin => "beforebegin",
            InsertPosition::AfterBegin => "afterbegin",
            InsertPosition::BeforeEnd => "beforeend",
            InsertPosition::AfterEnd => "afterend",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeData {
    Document { doctype: Option<String> },
    Fragment,
    Element { name: String, attributes: Attributes },
    Text(String),
    Comment(String),
}

impl NodeData {
    fn from_node(node: &Node) -> Self {
        match node {
            Node::Document { .. } => NodeData::Fragment,
            Node::Element {
                name, attributes, ..
            } => NodeData::Element {
                name: name.clone(),
                attributes: attributes.clone(),
            },
            Node::Text { text } => NodeData::Text(text.clone()),
            Node::Comment { text } => NodeData::Comment(text.clone()),
        }
    }

    fn detached_copy(&self) -> Self {
        match self {
            NodeData::Document { .. } => NodeData::Fragment,
            other => other.clone(),
        }
    }

    fn to_node(&self, children: Vec<Node>) -> Node {
        match self {
            NodeData::Document { doctype } => Node::Document {
                doctype: doctype.clone(),
                children,
            },
            NodeData::Fragment => Node::Document {
                doctype: None,
                children,
            },
            NodeData::Element { name, attributes } => Node::Element {
                name: name.clone(),
                attributes: attributes.clone(),
                children,
            },
            NodeData::Text(text) => Node::Text { text: text.clone() },
            NodeData::Comment(text) => Node::Comment { text: text.clone() },
        }
    }
}

#[derive(Clone, Debug)]
struct DomNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Clone, Debug)]
pub struct Dom {
    nodes: Vec<DomNode>,
    root: NodeId,
}

impl Dom {
    fn with_root(data: NodeData) -> Self {
        Self {
            nodes: vec![DomNode {
                parent: None,
                children: Vec::new(),
                data,
            }],
            root: NodeId(0),
        }
    }

    pub fn new_document() -> Self {
        Self::with_root(NodeData::Document { doctype: None })
    }

    pub fn new_fragment() -> Self {
        Self::with_root(NodeData::Fragment)
    }

    pub fn parse_document(markup: &str) -> Self {
        let mut dom = Self::new_document();
        let root = dom.root;
        build_into(&mut dom, root, tokenize(markup));
        dom
    }

    pub fn parse_fragment(markup: &str) -> Self {
        let mut dom = Self::new_fragment();
        let root = dom.root;
        build_into(&mut dom, root, tokenize(markup));
        dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut DomNode {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(DomNode {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.node_mut(id).data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&c| self.is_element(c))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Element { .. })
    }

    pub fn is_fragment(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Fragment)
    }

    fn can_have_children(&self, id: NodeId) -> bool {
        matches!(
            self.node(id).data,
            NodeData::Document { .. } | NodeData::Fragment | NodeData::Element { .. }
        )
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeData::Fragment)
    }

    /// Parses `markup` into a new detached fragment owned by this arena.
    pub fn parse_into_fragment(&mut self, markup: &str) -> NodeId {
        let fragment = self.create_fragment();
        build_into(self, fragment, tokenize(markup));
        fragment
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        if self.children(ancestor).is_empty() {
            return ancestor == node;
        }
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let at = self.children(parent).len();
        self.insert_nodes(parent, at, child)
    }

    // Inserts `node` (or, for a fragment, its children in order) into `parent` at `index`.
    // `index` is interpreted after the moved nodes have been detached.
    fn insert_nodes(&mut self, parent: NodeId, index: usize, node: NodeId) -> bool {
        if !self.can_have_children(parent) || self.is_inclusive_ancestor(node, parent) {
            log::debug!(target: "html.dom", "refusing insertion of {node:?} into {parent:?}");
            return false;
        }
        let moved: Vec<NodeId> = if self.is_fragment(node) {
            self.children(node).to_vec()
        } else {
            vec![node]
        };
        for &m in &moved {
            self.detach(m);
        }
        let index = index.min(self.children(parent).len());
        for (offset, &m) in moved.iter().enumerate() {
            self.node_mut(m).parent = Some(parent);
            self.node_mut(parent).children.insert(index + offset, m);
        }
        true
    }

    /// Inserts `node` relative to `target`. Fragments contribute their children.
    ///
    /// Returns `false` without touching the tree when the position has no anchor: a sibling
    /// position on a parentless node, or a child position on a text or comment node.
    pub fn insert_adjacent(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        node: NodeId,
    ) -> bool {
        if self.is_inclusive_ancestor(node, target) {
            log::debug!(target: "html.dom", "refusing insertion of {node:?} next to {target:?}");
            return false;
        }
        // Detach first so the anchor index accounts for `node` leaving a shared parent.
        if !self.is_fragment(node) {
            self.detach(node);
        }
        let anchor = match position {
            InsertPosition::BeforeBegin | InsertPosition::AfterEnd => {
                self.parent(target).and_then(|parent| {
                    let index = self.children(parent).iter().position(|&c| c == target)?;
                    let index = match position {
                        InsertPosition::AfterEnd => index + 1,
                        _ => index,
                    };
                    Some((parent, index))
                })
            }
            InsertPosition::AfterBegin => Some((target, 0)),
            InsertPosition::BeforeEnd => Some((target, self.children(target).len())),
        };
        match anchor {
            Some((parent, index)) => self.insert_nodes(parent, index, node),
            None => {
                log::debug!(
                    target: "html.dom",
                    "no anchor for {} insertion at {target:?}",
                    position.as_str()
                );
                false
            }
        }
    }

    pub fn insert_adjacent_text(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        text: &str,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        let node = self.create_text(text);
        self.insert_adjacent(target, position, node)
    }

    pub fn insert_adjacent_html(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        markup: &str,
    ) -> bool {
        let fragment = self.parse_into_fragment(markup);
        self.insert_adjacent(target, position, fragment)
    }

    /// Detached deep copy of `id` and its subtree from `source` into this arena. A document
    /// node arrives as a fragment.
    pub fn import_subtree(&mut self, source: &Dom, id: NodeId) -> NodeId {
        let root = self.push(source.node(id).data.detached_copy());
        let mut pending: Vec<(NodeId, NodeId)> =
            source.children(id).iter().rev().map(|&c| (c, root)).collect();
        while let Some((from, parent)) = pending.pop() {
            let copy = self.push(source.node(from).data.detached_copy());
            self.node_mut(copy).parent = Some(parent);
            self.node_mut(parent).children.push(copy);
            pending.extend(source.children(from).iter().rev().map(|&c| (c, copy)));
        }
        root
    }

    /// Copies an owned tree into this arena as a detached subtree. Documents become fragments.
    pub fn import(&mut self, node: &Node) -> NodeId {
        let root = self.push(NodeData::from_node(node));
        let mut pending: Vec<(&Node, NodeId)> =
            node.children().iter().rev().map(|c| (c, root)).collect();
        while let Some((child, parent)) = pending.pop() {
            let id = self.push(NodeData::from_node(child));
            self.node_mut(id).parent = Some(parent);
            self.node_mut(parent).children.push(id);
            pending.extend(child.children().iter().rev().map(|c| (c, id)));
        }
        root
    }

    /// Owned copy of the subtree at `id`. Fragments export as doctype-less documents.
    pub fn export(&self, id: NodeId) -> Node {
        // (node, next child to visit, children built so far)
        let mut current = (id, 0usize, Vec::new());
        let mut built_nodes: Vec<(NodeId, usize, Vec<Node>)> = Vec::new();
        loop {
            if let Some(&child) = self.children(current.0).get(current.1) {
                current.1 += 1;
                built_nodes.push(std::mem::replace(&mut current, (child, 0, Vec::new())));
                continue;
            }
            let node = self.node(current.0).data.to_node(std::mem::take(&mut current.2));
            match built_nodes.pop() {
                Some(parent) => {
                    current = parent;
                    current.2.push(node);
                }
                None => return node,
            }
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, Option<String>)] {
        match &self.node(id).data {
            NodeData::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Attribute value; a bare attribute reads as the empty string.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Sets an attribute on an element; no-op on other node kinds.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let NodeData::Element { attributes, .. } = &mut self.node_mut(id).data else {
            return;
        };
        let value = Some(value.into());
        match attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let NodeData::Element { attributes, .. } = &mut self.node_mut(id).data else {
            return false;
        };
        let before = attributes.len();
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        attributes.len() != before
    }

    /// Every node below `id` in preorder; `id` itself is excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match &self.node(id).data {
            NodeData::Element { name, attributes } => Some(ElementRef::new(name, attributes)),
            _ => None,
        }
    }

    pub fn matches(&self, id: NodeId, selector: &SelectorList) -> bool {
        let Some(element) = self.element_ref(id) else {
            return false;
        };
        let ancestors = std::iter::successors(self.parent(id), |&p| self.parent(p))
            .filter_map(|p| self.element_ref(p));
        selector.matches_nearest_first(element, ancestors)
    }

    pub fn query_selector_all_with(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.matches(n, selector))
            .collect()
    }

    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.query_selector_all_with(scope, &list))
    }

    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .find(|&n| self.matches(n, &list)))
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).data {
            NodeData::Text(text) => text.clone(),
            NodeData::Comment(_) => String::new(),
            _ => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| match &self.node(n).data {
                    NodeData::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Replaces all children of `id` with a single text node (none for empty text).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        match &mut self.node_mut(id).data {
            NodeData::Text(t) | NodeData::Comment(t) => {
                *t = text.to_string();
                return;
            }
            _ => {}
        }
        for child in self.children(id).to_vec() {
            self.detach(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        self.export(id).outer_html()
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        self.export(id).inner_html()
    }
}
