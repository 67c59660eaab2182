use crate::engine::{self, Rendered};
use crate::error::{TemplateError, TemplateResult};
use crate::options::RenderOptions;
use crate::position::read_insert_plan;
use crate::source::{Target, TemplateSource, resolve_element};
use crate::value::{Record, Value};
use html::Dom;

/// A reusable template. Every render works on a fresh copy of the captured fragment, so one
/// `Template` can be rendered any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    source: TemplateSource,
}

impl Template {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    pub fn from_selector(doc: &Dom, selector: &str) -> TemplateResult<Self> {
        TemplateSource::from_selector(doc, selector).map(Self::new)
    }

    pub fn from_markup(markup: &str) -> Self {
        Self::new(TemplateSource::from_markup(markup))
    }

    /// Captures the template and removes its element from `doc`.
    pub fn once<'a>(doc: &mut Dom, target: impl Into<Target<'a>>) -> TemplateResult<Self> {
        TemplateSource::once(doc, target).map(Self::new)
    }

    /// [`Template::once`] followed by [`Template::create_element`].
    pub fn create_once<'a>(
        doc: &mut Dom,
        target: impl Into<Target<'a>>,
        data: Option<&Value>,
    ) -> TemplateResult<Rendered> {
        Self::once(doc, target)?.create_element(data)
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Renders one instance with default options.
    pub fn create_element(&self, data: Option<&Value>) -> TemplateResult<Rendered> {
        self.create(data, &RenderOptions::default())
    }

    /// Renders one instance.
    ///
    /// `None` and [`Value::Null`] both mean "no data": the fragment comes back unfilled with
    /// its markers intact. Anything other than a map is rejected.
    pub fn create(&self, data: Option<&Value>, options: &RenderOptions) -> TemplateResult<Rendered> {
        let record = data_record(data)?;
        log::debug!(
            target: "template.render",
            "create: {} key(s), {:?}",
            record.map_or(0, Record::len),
            options
        );
        let rendered = engine::render(self.source.instantiate(), record, options)?;
        log::debug!(target: "template.render", "created {} root(s)", rendered.len());
        Ok(rendered)
    }

    /// Renders into `container` inside `doc` and returns the number of instances inserted.
    ///
    /// A [`Value::List`] yields one instance per element, anything else a single instance.
    /// Every instance is built before the first insertion, so an error leaves `doc` as it
    /// was. The insertion position comes from the container's `prepend` and
    /// `replace-container` markers or from `options.prepend` / `options.replace`.
    pub fn render<'a>(
        &self,
        doc: &mut Dom,
        container: impl Into<Target<'a>>,
        data: Option<&Value>,
        options: &RenderOptions,
    ) -> TemplateResult<usize> {
        let container = resolve_element(doc, container.into())?;
        let instances = match data {
            Some(Value::List(items)) => items
                .iter()
                .map(|item| self.create(Some(item), options))
                .collect::<TemplateResult<Vec<_>>>()?,
            other => vec![self.create(other, options)?],
        };

        let count = instances.len();
        let plan = read_insert_plan(doc, container, options.prepend, options.replace);
        log::debug!(
            target: "template.render",
            "inserting {count} instance(s) {} {container:?}",
            plan.position.as_str()
        );
        for instance in instances {
            let fragment = doc.create_fragment();
            for node in instance.into_nodes() {
                let id = doc.import(&node);
                doc.append_child(fragment, id);
            }
            doc.insert_adjacent(container, plan.position, fragment);
        }
        plan.finish(doc, container);
        Ok(count)
    }
}

fn data_record(data: Option<&Value>) -> TemplateResult<Option<&Record>> {
    match data {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Map(record)) => Ok(Some(record)),
        Some(other) => Err(TemplateError::InvalidDataShape {
            found: other.type_name(),
        }),
    }
}
