use crate::selector::{ElementRef, SelectorError, SelectorList};

/// Attribute list in declaration order. Bare attributes (`<input checked>`) carry `None`.
pub type Attributes = Vec<(String, Option<String>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

/// Owned node tree.
///
/// This is the value form of the DOM: render results are handed out as `Node`s and data
/// records carry `Node`s as content. Mutation happens in a [`Dom`](crate::Dom) arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document {
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        name: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn element(name: impl Into<String>, attributes: Attributes, children: Vec<Node>) -> Self {
        Node::Element {
            name: name.into().to_ascii_lowercase(),
            attributes,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    /// Tag name for elements, `None` for every other node kind.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[(String, Option<String>)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Attribute value; a bare attribute reads as the empty string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes()
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(|c| c.is_element())
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::Comment { .. } => {}
                Node::Document { children, .. } | Node::Element { children, .. } => {
                    pending.extend(children.iter().rev());
                }
            }
        }
        out
    }

    /// Descendant elements matching `selector`, in document order. `self` is never included.
    pub fn select(&self, selector: &str) -> Result<Vec<&Node>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select_with(&list))
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<&Node>, SelectorError> {
        Ok(self.select(selector)?.into_iter().next())
    }

    pub fn select_with(&self, list: &SelectorList) -> Vec<&Node> {
        let mut ancestors = Vec::new();
        if let Node::Element {
            name, attributes, ..
        } = self
        {
            ancestors.push(ElementRef::new(name, attributes));
        }
        let base = ancestors.len();

        // (node, element ancestors between `self` and the node)
        let mut pending: Vec<(&Node, usize)> =
            self.children().iter().rev().map(|c| (c, 0)).collect();
        let mut out = Vec::new();
        while let Some((node, depth)) = pending.pop() {
            let Node::Element {
                name,
                attributes,
                children,
            } = node
            else {
                continue;
            };
            ancestors.truncate(base + depth);
            let element = ElementRef::new(name, attributes);
            if list.matches(element, &ancestors) {
                out.push(node);
            }
            ancestors.push(element);
            pending.extend(children.iter().rev().map(|c| (c, depth + 1)));
        }
        out
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        crate::serialize::write_node(&mut out, self);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for c in self.children() {
            crate::serialize::write_node(&mut out, c);
        }
        out
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::text(text)
    }
}
