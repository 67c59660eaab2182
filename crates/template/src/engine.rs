//! Substitution engine: fills a cloned fragment from a data record.
//!
//! A render runs in two passes. The first collects every `[item]` element together with a
//! snapshot of its `item-*` markers, in document order and declaration order. The second
//! applies each marker and strips it. Content inserted during the second pass (nodes or
//! markup) is never scanned for markers.
//!
//! Marker dispatch goes through [`HANDLERS`]; a marker whose name has no handler is an
//! attribute template: `item-id="{{name}}-{{index}}"` sets `id` on the item.

use crate::error::{TemplateError, TemplateResult};
use crate::options::{DataMode, RenderOptions};
use crate::placeholder::substitute;
use crate::position::read_insert_plan;
use crate::value::{Record, Value};
use html::{Dom, Node, NodeId, SelectorList};
use std::sync::LazyLock;

pub const ITEM_MARKER: &str = "item";
pub const MARKER_PREFIX: &str = "item-";

static ITEMS: LazyLock<SelectorList> = LazyLock::new(|| selector("[item]"));
static FORM_CONTROLS: LazyLock<SelectorList> = LazyLock::new(|| selector("input, textarea"));

fn selector(text: &str) -> SelectorList {
    SelectorList::parse(text).expect("built-in selector parses")
}

/// The finished output of one render: a lone root element or several, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Single(Node),
    Many(Vec<Node>),
}

impl Rendered {
    pub fn nodes(&self) -> &[Node] {
        match self {
            Rendered::Single(node) => std::slice::from_ref(node),
            Rendered::Many(nodes) => nodes,
        }
    }

    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Rendered::Single(node) => vec![node],
            Rendered::Many(nodes) => nodes,
        }
    }

    /// The first root; every `Rendered` has at least one.
    pub fn first(&self) -> &Node {
        &self.nodes()[0]
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Rendered::Single(_))
    }
}

/// Where markers look up their keys.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scope<'a> {
    Flat(&'a Record),
    Split {
        content: Option<&'a Record>,
        attr: Option<&'a Record>,
    },
}

static EMPTY: Record = Record::new();

impl<'a> Scope<'a> {
    pub(crate) fn new(data: &'a Record, mode: DataMode) -> Self {
        let split = match mode {
            DataMode::Flat => false,
            DataMode::Split => true,
            DataMode::Auto => {
                !data.is_empty()
                    && data.iter().all(|(k, v)| {
                        matches!(k.as_str(), "content" | "attr") && v.as_map().is_some()
                    })
            }
        };
        if split {
            Scope::Split {
                content: data.get("content").and_then(Value::as_map),
                attr: data.get("attr").and_then(Value::as_map),
            }
        } else {
            Scope::Flat(data)
        }
    }

    fn content(&self) -> &'a Record {
        match *self {
            Scope::Flat(record) => record,
            Scope::Split { content, .. } => content.unwrap_or(&EMPTY),
        }
    }

    fn attr(&self) -> &'a Record {
        match *self {
            Scope::Flat(record) => record,
            Scope::Split { attr, .. } => attr.unwrap_or(&EMPTY),
        }
    }
}

/// Everything a marker handler may look at besides the node it is attached to.
pub(crate) struct Context<'a> {
    pub scope: Scope<'a>,
    pub options: &'a RenderOptions,
}

/// `(dom, item, marker value, context)`; the marker name selected the handler.
type Handler = fn(&mut Dom, NodeId, &str, &Context<'_>) -> TemplateResult<()>;

/// Named marker handlers, looked up by the marker name minus its `item-` prefix.
pub(crate) const HANDLERS: &[(&str, Handler)] = &[
    ("content", insert_content as Handler),
    ("value", assign_value as Handler),
];

fn handler_for(name: &str) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(handler, _)| *handler == name)
        .map(|(_, f)| *f)
}

#[derive(Debug)]
struct Marker {
    attribute: String,
    value: String,
}

#[derive(Debug)]
struct WorkItem {
    node: NodeId,
    markers: Vec<Marker>,
}

fn collect_work(dom: &Dom) -> Vec<WorkItem> {
    dom.query_selector_all_with(dom.root(), &ITEMS)
        .into_iter()
        .map(|node| WorkItem {
            node,
            markers: dom
                .attributes(node)
                .iter()
                .filter(|(name, _)| name.starts_with(MARKER_PREFIX))
                .map(|(name, value)| Marker {
                    attribute: name.clone(),
                    value: value.clone().unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

/// Fills `dom` in place. With no data the fragment is left untouched.
pub(crate) fn fill(
    dom: &mut Dom,
    data: Option<&Record>,
    options: &RenderOptions,
) -> TemplateResult<()> {
    let Some(data) = data else {
        return Ok(());
    };

    let work = collect_work(dom);
    if work.is_empty() {
        return Err(TemplateError::NoItemsFound);
    }

    let context = Context {
        scope: Scope::new(data, options.data_mode),
        options,
    };
    log::debug!(
        target: "template.engine",
        "filling {} item(s) ({:?} scope)",
        work.len(),
        match context.scope {
            Scope::Flat(_) => "flat",
            Scope::Split { .. } => "split",
        }
    );

    for item in work {
        for marker in &item.markers {
            let name = &marker.attribute[MARKER_PREFIX.len()..];
            log::trace!(
                target: "template.engine",
                "{:?}: {}={:?}",
                item.node,
                marker.attribute,
                marker.value
            );
            match handler_for(name) {
                Some(handler) => handler(dom, item.node, &marker.value, &context)?,
                None if name.is_empty() => {}
                None => interpolate_attribute(dom, item.node, name, &marker.value, &context)?,
            }
            dom.remove_attribute(item.node, &marker.attribute);
        }
        dom.remove_attribute(item.node, ITEM_MARKER);
    }
    Ok(())
}

/// Returns the fragment's root elements; fails when there are none.
pub(crate) fn unwrap(dom: &Dom) -> TemplateResult<Rendered> {
    let roots = dom.element_children(dom.root());
    match roots.as_slice() {
        [] => Err(TemplateError::EmptyTemplate),
        [root] => Ok(Rendered::Single(dom.export(*root))),
        _ => Ok(Rendered::Many(roots.iter().map(|&r| dom.export(r)).collect())),
    }
}

/// Clone-owned render pass: fill, then unwrap.
pub(crate) fn render(
    mut dom: Dom,
    data: Option<&Record>,
    options: &RenderOptions,
) -> TemplateResult<Rendered> {
    fill(&mut dom, data, options)?;
    unwrap(&dom)
}

enum Piece<'v> {
    Text(String),
    Node(&'v Node),
}

fn content_piece<'v>(key: &str, value: &'v Value) -> TemplateResult<Option<Piece<'v>>> {
    match value {
        Value::Null => Ok(None),
        Value::Node(node) => Ok(Some(Piece::Node(node))),
        Value::List(_) | Value::Map(_) => Err(TemplateError::InvalidContentValue {
            key: key.to_string(),
            found: value.type_name(),
        }),
        scalar => Ok(scalar.scalar_text().map(Piece::Text)),
    }
}

/// `item-content="key"`: inserts `data[key]` relative to the item.
///
/// Null, the empty string and the empty list are skipped without reading the item's
/// position markers. A non-empty list is never skipped, even when its elements insert
/// nothing. `0` and `false` are inserted as text.
fn insert_content(dom: &mut Dom, item: NodeId, key: &str, cx: &Context<'_>) -> TemplateResult<()> {
    if key.is_empty() {
        return Ok(());
    }
    let value = cx
        .scope
        .content()
        .get(key)
        .ok_or_else(|| TemplateError::MissingContent {
            key: key.to_string(),
        })?;

    let skip = match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    };
    if skip {
        return Ok(());
    }

    // Resolve everything before touching the tree so a bad element leaves no partial insert.
    let pieces: Vec<Piece<'_>> = match value {
        Value::List(items) => items
            .iter()
            .map(|v| content_piece(key, v))
            .filter_map(Result::transpose)
            .collect::<TemplateResult<_>>()?,
        other => content_piece(key, other)?.into_iter().collect(),
    };

    let plan = read_insert_plan(dom, item, false, false);
    for piece in pieces {
        match piece {
            Piece::Node(node) => {
                let id = dom.import(node);
                dom.insert_adjacent(item, plan.position, id);
            }
            Piece::Text(text) if cx.options.accept_html => {
                dom.insert_adjacent_html(item, plan.position, &text);
            }
            Piece::Text(text) => {
                dom.insert_adjacent_text(item, plan.position, &text);
            }
        }
    }
    plan.finish(dom, item);
    Ok(())
}

/// `item-value="key"`: sets the state of an `input` or `textarea`.
///
/// Checkboxes and radios are checked only by `true`; any other value unchecks them. Absent
/// and null values leave the markup default alone. Other elements are ignored.
fn assign_value(dom: &mut Dom, item: NodeId, key: &str, cx: &Context<'_>) -> TemplateResult<()> {
    if !dom.matches(item, &FORM_CONTROLS) {
        return Ok(());
    }
    let Some(value) = cx.scope.attr().get(key).filter(|v| !v.is_null()) else {
        return Ok(());
    };

    let checkable = dom
        .attribute(item, "type")
        .is_some_and(|t| t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio"));
    if checkable {
        if matches!(value, Value::Bool(true)) {
            dom.set_attribute(item, "checked", "");
        } else {
            dom.remove_attribute(item, "checked");
        }
        return Ok(());
    }

    let text = value
        .scalar_text()
        .ok_or_else(|| TemplateError::InvalidAttributeValue {
            key: key.to_string(),
            found: value.type_name(),
        })?;
    if dom.element_name(item) == Some("textarea") {
        dom.set_text_content(item, &text);
    } else {
        dom.set_attribute(item, "value", text);
    }
    Ok(())
}

/// Default path: `item-<name>="...{{key}}..."` becomes attribute `<name>`.
fn interpolate_attribute(
    dom: &mut Dom,
    item: NodeId,
    name: &str,
    template: &str,
    cx: &Context<'_>,
) -> TemplateResult<()> {
    let record = cx.scope.attr();
    let value = substitute(template, |key| {
        let value = record
            .get(key)
            .ok_or_else(|| TemplateError::MissingAttribute {
                key: key.to_string(),
            })?;
        value
            .scalar_text()
            .ok_or_else(|| TemplateError::InvalidAttributeValue {
                key: key.to_string(),
                found: value.type_name(),
            })
    })?;
    dom.set_attribute(item, name, value);
    Ok(())
}
