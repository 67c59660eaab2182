use crate::error::{TemplateError, TemplateResult};
use serde::{Deserialize, Serialize};

/// Which record a marker resolves its key against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Split when the record looks like `{ content: {..}, attr: {..} }`, flat otherwise.
    #[default]
    Auto,
    /// One record shared by content, value and attribute markers.
    Flat,
    /// `content` markers read `data.content`; `value` and attribute markers read `data.attr`.
    Split,
}

/// Per-render configuration.
///
/// Deserializes from camelCase keys: `acceptHTML`, `prepend`, `replace` and `dataMode`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Insert string content as markup instead of literal text.
    #[serde(rename = "acceptHTML")]
    pub accept_html: bool,
    /// Render-into-container only: insert at the start of the container.
    pub prepend: bool,
    /// Render-into-container only: insert next to the container, then remove it.
    pub replace: bool,
    pub data_mode: DataMode,
}

impl RenderOptions {
    pub fn with_accept_html(mut self, accept_html: bool) -> Self {
        self.accept_html = accept_html;
        self
    }

    pub fn with_prepend(mut self, prepend: bool) -> Self {
        self.prepend = prepend;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = data_mode;
        self
    }

    pub fn from_toml_str(input: &str) -> TemplateResult<Self> {
        toml::from_str(input).map_err(|e| TemplateError::InvalidOptions(e.to_string()))
    }

    pub fn from_json_str(input: &str) -> TemplateResult<Self> {
        serde_json::from_str(input).map_err(|e| TemplateError::InvalidOptions(e.to_string()))
    }
}
