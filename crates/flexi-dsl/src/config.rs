use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generators::{ClassNameGenerator, DefaultClassNames};

/// Shared, immutable class-name strategy.
pub type SharedGenerator = Arc<dyn ClassNameGenerator + Send + Sync>;

// ── LayoutAttribute ───────────────────────────────────────────────────────

/// A DSL term usable as an element attribute or as a breakpoint responder.
///
/// In JSON a simple term is a bare string, a complex one an object:
/// `"vertical"` or `{ "name": "align", "values": ["start", "end"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutAttribute {
    /// Presence-only: `<box vertical>`.
    Simple(String),
    /// Requires one of `values`: `<box align="center">`.
    Complex { name: String, values: Vec<String> },
}

impl LayoutAttribute {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    pub fn complex<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Complex { name: name.into(), values: values.into_iter().map(Into::into).collect() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Simple(name) | Self::Complex { name, .. } => name,
        }
    }

    /// The allowed values of a complex term; `None` for a simple one.
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            Self::Simple(_) => None,
            Self::Complex { values, .. } => Some(values),
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values().is_some_and(|values| values.iter().any(|v| v == value))
    }
}

// ── Breakpoint ────────────────────────────────────────────────────────────

/// A responsive tier. `prefix` is both the attribute name recognized on
/// elements (`sm="12 visible"`) and the token used in generated class names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lower bound of the tier in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<u32>,
}

impl Breakpoint {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), name: None, begin: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_begin(mut self, begin: u32) -> Self {
        self.begin = Some(begin);
        self
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────

/// Layout terms valid both as attributes and as responders.
pub fn layout_properties() -> Vec<LayoutAttribute> {
    vec![
        LayoutAttribute::simple("fill"),
        LayoutAttribute::simple("fit"),
        LayoutAttribute::simple("horizontal"),
        LayoutAttribute::simple("nowrap"),
        LayoutAttribute::simple("vertical"),
        LayoutAttribute::simple("wrap"),
        LayoutAttribute::complex("align", ["start", "end", "stretch", "center", "baseline"]),
        LayoutAttribute::complex("justify", ["start", "end", "center", "between", "around"]),
    ]
}

/// Tags whose layout attributes are converted. `grid` is listed twice; the
/// merge collapses it.
pub const DEFAULT_ELEMENTS: &[&str] = &[
    "box", "centered", "container", "fill", "grid", "grid", "hbox", "page", "screen", "vbox",
];

/// The built-in half of the configuration merge.
#[derive(Debug, Clone)]
pub struct DslDefaults {
    pub elements: Vec<String>,
    pub responders: Vec<LayoutAttribute>,
    pub attributes: Vec<LayoutAttribute>,
    pub generator: SharedGenerator,
}

impl Default for DslDefaults {
    fn default() -> Self {
        let mut responders =
            vec![LayoutAttribute::simple("hidden"), LayoutAttribute::simple("visible")];
        responders.extend(layout_properties());

        Self {
            elements: DEFAULT_ELEMENTS.iter().map(|s| s.to_string()).collect(),
            responders,
            attributes: layout_properties(),
            generator: Arc::new(DefaultClassNames),
        }
    }
}

// ── ProjectConfig ─────────────────────────────────────────────────────────

/// Project-supplied configuration, usually read from `flexi.json`.
///
/// ```json
/// {
///   "columns": 12,
///   "columnPrefix": "col",
///   "breakpoints": [{ "name": "mobile", "prefix": "xs", "begin": 0 }],
///   "elements": ["panel"],
///   "transformAllElementLayoutAttributes": false
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub elements: Vec<String>,
    pub responders: Vec<LayoutAttribute>,
    pub attributes: Vec<LayoutAttribute>,
    pub breakpoints: Option<Vec<Breakpoint>>,
    pub columns: Option<u32>,
    pub column_prefix: Option<String>,
    #[serde(rename = "transformAllElementLayoutAttributes")]
    pub transform_all: Option<bool>,
    /// Replaces the default class-name strategy when set.
    #[serde(skip)]
    pub generator: Option<SharedGenerator>,
}

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        log::debug!("loaded flexi config from {}", path.display());
        Self::from_json_str(&src)
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = Some(prefix.into());
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoints.get_or_insert_with(Vec::new).push(breakpoint);
        self
    }

    pub fn with_element(mut self, tag: impl Into<String>) -> Self {
        self.elements.push(tag.into());
        self
    }

    pub fn with_attribute(mut self, attribute: LayoutAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_responder(mut self, responder: LayoutAttribute) -> Self {
        self.responders.push(responder);
        self
    }

    pub fn with_transform_all(mut self, transform_all: bool) -> Self {
        self.transform_all = Some(transform_all);
        self
    }

    pub fn with_generator(
        mut self,
        generator: impl ClassNameGenerator + Send + Sync + 'static,
    ) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }
}

// ── DslConfig ─────────────────────────────────────────────────────────────

/// The merged configuration shared read-only by both passes.
#[derive(Debug, Clone)]
pub struct DslConfig {
    elements: Vec<String>,
    attributes: Vec<LayoutAttribute>,
    responders: Vec<LayoutAttribute>,
    breakpoints: Vec<Breakpoint>,
    columns: u32,
    column_prefix: Option<String>,
    transform_all: bool,
    generator: SharedGenerator,
}

impl DslConfig {
    /// Merge the built-in defaults with project overrides.
    ///
    /// List settings are de-duplicated unions with defaults first. Breakpoints,
    /// columns, and the column prefix come from the project only.
    pub fn merge(defaults: DslDefaults, project: ProjectConfig) -> Self {
        let config = Self {
            elements: unique_merge(&defaults.elements, &project.elements),
            attributes: unique_merge(&defaults.attributes, &project.attributes),
            responders: unique_merge(&defaults.responders, &project.responders),
            breakpoints: project.breakpoints.unwrap_or_default(),
            columns: project.columns.unwrap_or(0),
            column_prefix: project.column_prefix,
            transform_all: project.transform_all.unwrap_or(false),
            generator: project.generator.unwrap_or(defaults.generator),
        };

        log::debug!(
            "flexi config: {} elements, {} attributes, {} responders, {} breakpoints, {} columns",
            config.elements.len(),
            config.attributes.len(),
            config.responders.len(),
            config.breakpoints.len(),
            config.columns,
        );
        config
    }

    /// Merge project overrides onto the built-in defaults.
    pub fn from_project(project: ProjectConfig) -> Self {
        Self::merge(DslDefaults::default(), project)
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn attributes(&self) -> &[LayoutAttribute] {
        &self.attributes
    }

    pub fn responders(&self) -> &[LayoutAttribute] {
        &self.responders
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn column_prefix(&self) -> Option<&str> {
        self.column_prefix.as_deref()
    }

    pub fn transform_all(&self) -> bool {
        self.transform_all
    }

    pub fn generator(&self) -> &(dyn ClassNameGenerator + Send + Sync) {
        self.generator.as_ref()
    }

    /// Whether attributes on `tag` are converted to classes.
    pub fn converts(&self, tag: &str) -> bool {
        self.transform_all || self.elements.iter().any(|e| e == tag)
    }

    /// A simple responder exactly named `term`.
    pub fn simple_responder(&self, term: &str) -> Option<&LayoutAttribute> {
        self.responders
            .iter()
            .find(|r| matches!(r, LayoutAttribute::Simple(name) if name == term))
    }

    /// A complex responder named `name`.
    pub fn complex_responder(&self, name: &str) -> Option<&LayoutAttribute> {
        self.responders
            .iter()
            .find(|r| matches!(r, LayoutAttribute::Complex { name: n, .. } if n == name))
    }
}

impl Default for DslConfig {
    fn default() -> Self {
        Self::from_project(ProjectConfig::default())
    }
}

/// Concatenate `first` and `second`, keeping the first occurrence of each value.
fn unique_merge<T: PartialEq + Clone>(first: &[T], second: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(first.len() + second.len());
    for item in first.iter().chain(second) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_collapse_duplicate_elements() {
        let config = DslConfig::default();
        assert_eq!(
            config.elements(),
            ["box", "centered", "container", "fill", "grid", "hbox", "page", "screen", "vbox"]
        );
        assert!(config.breakpoints().is_empty());
        assert_eq!(config.columns(), 0);
        assert!(!config.transform_all());
    }

    #[test]
    fn merge_appends_project_values_after_defaults() {
        let project = ProjectConfig::new()
            .with_element("panel")
            .with_element("box")
            .with_element("panel")
            .with_responder(LayoutAttribute::simple("sticky"))
            .with_responder(LayoutAttribute::simple("hidden"))
            .with_attribute(LayoutAttribute::complex("align", ["start", "end", "stretch", "center", "baseline"]))
            .with_attribute(LayoutAttribute::simple("grow"));
        let config = DslConfig::from_project(project);

        assert_eq!(config.elements().last().map(String::as_str), Some("panel"));
        assert_eq!(config.elements().iter().filter(|e| *e == "panel").count(), 1);
        assert_eq!(config.responders()[0], LayoutAttribute::simple("hidden"));
        assert_eq!(config.responders().last(), Some(&LayoutAttribute::simple("sticky")));
        assert_eq!(config.attributes().len(), layout_properties().len() + 1);
        assert_eq!(config.attributes().last(), Some(&LayoutAttribute::simple("grow")));
    }

    #[test]
    fn responder_lookup_respects_kind() {
        let config = DslConfig::default();
        assert!(config.simple_responder("visible").is_some());
        assert!(config.simple_responder("align").is_none());
        assert!(config.complex_responder("align").is_some_and(|r| r.allows("center")));
        assert!(config.complex_responder("visible").is_none());
    }

    #[test]
    fn project_generator_replaces_default() {
        struct Upper;
        impl ClassNameGenerator for Upper {
            fn attribute_class(&self, attribute: &str, _value: Option<&str>) -> String {
                attribute.to_uppercase()
            }
        }

        let config = DslConfig::from_project(ProjectConfig::new().with_generator(Upper));
        assert_eq!(config.generator().attribute_class("fit", None), "FIT");
        assert_eq!(DslConfig::default().generator().attribute_class("fit", None), "flexi-fit");
    }

    #[test]
    fn parses_project_json() {
        let project = ProjectConfig::from_json_str(
            r#"{
                "columns": 12,
                "columnPrefix": "col",
                "transformAllElementLayoutAttributes": true,
                "breakpoints": [
                    { "name": "mobile", "prefix": "xs", "begin": 0 },
                    { "prefix": "sm" }
                ],
                "responders": ["sticky", { "name": "order", "values": ["first", "last"] }]
            }"#,
        )
        .unwrap();
        let config = DslConfig::from_project(project);

        assert_eq!(config.columns(), 12);
        assert_eq!(config.column_prefix(), Some("col"));
        assert!(config.transform_all());
        assert_eq!(
            config.breakpoints(),
            [Breakpoint::new("xs").with_name("mobile").with_begin(0), Breakpoint::new("sm")]
        );
        assert!(config.complex_responder("order").is_some_and(|r| r.allows("last")));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ProjectConfig::from_json_str(r#"{ "columns": "twelve" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ProjectConfig::load("/nonexistent/flexi.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
