//! Clone-and-fill HTML templates.
//!
//! A template is a fragment of markup whose elements carry `item` markers. Rendering copies
//! the fragment and fills every `[item]` element from a data record:
//!
//! - `item-content="key"` inserts `data[key]` (text, markup, nodes or a list of those);
//! - `item-value="key"` sets the state of an `input` or `textarea`;
//! - `item-<attr>="...{{key}}..."` sets attribute `<attr>` from an interpolated string.
//!
//! ```
//! use template::{Template, Value};
//!
//! let card = Template::from_markup(
//!     r#"<div item item-id="card-{{index}}"><h2 item item-content="title"></h2></div>"#,
//! );
//! let data: Value = [("index", Value::from(3)), ("title", Value::from("Hello"))]
//!     .into_iter()
//!     .collect();
//! let rendered = card.create_element(Some(&data)).unwrap();
//! assert_eq!(
//!     rendered.first().outer_html(),
//!     r#"<div id="card-3"><h2>Hello</h2></div>"#
//! );
//! ```

mod engine;
mod error;
mod options;
mod placeholder;
mod position;
mod source;
mod template;
mod value;

pub use crate::engine::{ITEM_MARKER, MARKER_PREFIX, Rendered};
pub use crate::error::{TemplateError, TemplateResult};
pub use crate::options::{DataMode, RenderOptions};
pub use crate::placeholder::placeholder_keys;
pub use crate::position::{PREPEND_MARKER, REPLACE_MARKER};
pub use crate::source::{Target, TemplateSource, resolve_element};
pub use crate::template::Template;
pub use crate::value::{Record, Value, format_number};

pub use html;
