//! Error types for template acquisition and rendering.

use thiserror::Error;

/// Every failure aborts the current call; nothing is recovered or logged internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template (or render container) could not be resolved to an element.
    #[error(
        "The argument passed to Template must be a query string or an HTMLElement ({reason})"
    )]
    InvalidArgument { reason: String },

    /// Render data was present but not a plain record.
    #[error("Data must be an object containing keys (got {found})")]
    InvalidDataShape { found: &'static str },

    /// Data was supplied but the template has no `[item]` elements to receive it.
    #[error("No template items found. Just use data when you have items.")]
    NoItemsFound,

    #[error("The content {{{{{key}}}}} is missing.")]
    MissingContent { key: String },

    #[error("The attribute {{{{{key}}}}} is missing.")]
    MissingAttribute { key: String },

    /// Attribute interpolation only accepts strings, numbers and booleans.
    #[error("The value of a template attribute can't be: {found} (key {{{{{key}}}}})")]
    InvalidAttributeValue { key: String, found: &'static str },

    /// Content accepts scalars, nodes and lists of those; nothing else.
    #[error("The content {{{{{key}}}}} can't be: {found}")]
    InvalidContentValue { key: String, found: &'static str },

    /// Nothing element-shaped was left to return after substitution.
    #[error("Template is empty")]
    EmptyTemplate,

    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;
