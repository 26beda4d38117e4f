//! Form assembly: configuration in, built form out.

use crate::dom::{self, Element, Node, ParseError};
use crate::field::{FieldBuilder, FieldError, FieldSpec, default_field_record};
use crate::markup::{MarkupRegistry, MarkupTemplate};
use crate::merge::{self, Record, merge};
use crate::template::TemplateEngine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Button label used when the configuration does not provide one.
const DEFAULT_BUTTON_TEXT: &str = "Submit";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	#[error("field {name:?}: {error}")]
	Field {
		name: String,
		#[source]
		error: FieldError,
	},
	#[error("markup registry has no {entry:?} template")]
	MissingEntry { entry: &'static str },
	#[error("{entry:?} markup did not produce an element")]
	EmptyMarkup { entry: &'static str },
	#[error("form markup failed to parse: {0}")]
	Markup(#[from] ParseError),
}

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid form configuration: {0}")]
	Invalid(#[from] serde_json::Error),
}

/// A group of fields with an optional legend.
///
/// The `fields` sequence is mandatory: a fieldset without one is a
/// configuration error, not an empty render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldsetSpec {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub legend: Option<String>,
	pub fields: Vec<FieldSpec>,
}

impl FieldsetSpec {
	pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
		Self {
			legend: None,
			fields: fields.into_iter().collect(),
		}
	}

	pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
		self.legend = Some(legend.into());
		self
	}
}

/// Caller-supplied form description.
///
/// Unset scalars fall back to the defaults (`id="form"`,
/// `method="post"`, empty `action`). `fieldsets` and `button_text` are
/// structural and never surface as form attributes; everything captured
/// by `attrs` does, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub button_text: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fieldsets: Vec<FieldsetSpec>,
	#[serde(flatten)]
	pub attrs: IndexMap<String, serde_json::Value>,
}

impl FormConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Deserialize a configuration from a JSON value.
	///
	/// Structural mistakes (a fieldset missing its `fields` sequence,
	/// wrongly typed entries) surface as [`ConfigError`] here instead
	/// of degrading into an empty render.
	///
	/// # Examples
	///
	/// ```
	/// use formwright::FormConfig;
	/// use serde_json::json;
	///
	/// let config = FormConfig::from_value(json!({
	///     "id": "signup",
	///     "fieldsets": [
	///         { "legend": "About you", "fields": [{ "type": "text", "name": "username" }] }
	///     ]
	/// })).unwrap();
	/// assert_eq!(config.fieldsets.len(), 1);
	///
	/// assert!(FormConfig::from_value(json!({ "fieldsets": [{}] })).is_err());
	/// ```
	pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		Ok(serde_json::from_value(value)?)
	}

	/// Deserialize a configuration from a JSON string.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_method(mut self, method: impl Into<String>) -> Self {
		self.method = Some(method.into());
		self
	}

	pub fn with_action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}

	pub fn with_button_text(mut self, text: impl Into<String>) -> Self {
		self.button_text = Some(text.into());
		self
	}

	pub fn with_fieldset(mut self, fieldset: FieldsetSpec) -> Self {
		self.fieldsets.push(fieldset);
		self
	}

	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs
			.insert(name.into(), serde_json::Value::String(value.into()));
		self
	}

	/// Scalar attributes destined for the form element.
	fn to_record(&self) -> Record {
		let mut record = Record::new();
		let known = [
			("id", &self.id),
			("method", &self.method),
			("action", &self.action),
		];
		for (key, value) in known {
			if let Some(value) = value {
				record.insert(key.to_string(), value.clone());
			}
		}
		for (key, value) in &self.attrs {
			if let Some(value) = merge::record_value(value) {
				record.insert(key.clone(), value);
			}
		}
		record
	}
}

fn default_form_record() -> Record {
	let mut record = Record::new();
	record.insert("id".to_string(), "form".to_string());
	record.insert("method".to_string(), "post".to_string());
	record.insert("action".to_string(), String::new());
	record
}

/// The assembled form: element tree plus its serialized markup.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltForm {
	pub root: Element,
	pub html: String,
}

/// Builds forms from configuration against an immutable markup registry
/// and field defaults.
///
/// A builder owns its configuration outright; `build` reads it, works
/// on fresh copies and returns a new [`BuiltForm`] every call, so two
/// builds never share state.
pub struct FormBuilder {
	registry: MarkupRegistry,
	engine: TemplateEngine,
	field_defaults: Record,
}

impl FormBuilder {
	pub fn new() -> Self {
		Self {
			registry: MarkupRegistry::default(),
			engine: TemplateEngine::new(),
			field_defaults: default_field_record(),
		}
	}

	/// Swap in a custom markup registry.
	pub fn with_registry(mut self, registry: MarkupRegistry) -> Self {
		self.registry = registry;
		self
	}

	/// Swap in custom per-field defaults.
	pub fn with_field_defaults(mut self, defaults: Record) -> Self {
		self.field_defaults = defaults;
		self
	}

	pub fn registry(&self) -> &MarkupRegistry {
		&self.registry
	}

	/// Assemble a form from the configuration.
	///
	/// Fieldsets and fields render in configuration order; a legend, if
	/// present, leads its fieldset, and a submit button closes the
	/// form. Missing optional data degrades silently; a field type with
	/// no resolvable markup is an error.
	///
	/// # Examples
	///
	/// ```
	/// use formwright::{FieldSpec, FieldsetSpec, FormBuilder, FormConfig};
	///
	/// let config = FormConfig::new()
	///     .with_id("signup")
	///     .with_fieldset(FieldsetSpec::new([FieldSpec::new("text", "username")]));
	///
	/// let form = FormBuilder::new().build(&config)?;
	/// assert_eq!(form.root.attr("id"), Some("signup"));
	/// assert!(form.html.ends_with("</form>"));
	/// # Ok::<(), formwright::BuildError>(())
	/// ```
	pub fn build(&self, config: &FormConfig) -> BuildResult<BuiltForm> {
		debug!(fieldsets = config.fieldsets.len(), "building form");

		let mut form = self.instantiate("form")?;
		let form_attrs = merge(&default_form_record(), &config.to_record());
		for (key, value) in &form_attrs {
			form.set_attr(key, value);
		}

		let field_builder =
			FieldBuilder::new(&self.registry, &self.engine, &self.field_defaults);

		for fieldset_spec in &config.fieldsets {
			let mut fieldset = self.instantiate("fieldset")?;
			if let Some(legend_text) = &fieldset_spec.legend {
				let mut legend = self.instantiate("legend")?;
				legend.append_child(Node::Text(legend_text.clone()));
				fieldset.append_child(legend.into());
			}
			for spec in &fieldset_spec.fields {
				let row = field_builder.build(spec).map_err(|error| BuildError::Field {
					name: spec.name.clone().unwrap_or_default(),
					error,
				})?;
				for node in row.nodes {
					fieldset.append_child(node);
				}
			}
			form.append_child(fieldset.into());
		}

		let mut button = Element::new("button");
		button.set_attr("type", "submit");
		let button_text = config
			.button_text
			.clone()
			.unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string());
		button.append_child(Node::Text(button_text));
		form.append_child(button.into());

		let html = form.to_html();
		debug!(bytes = html.len(), "form built");
		Ok(BuiltForm { root: form, html })
	}

	/// Parse a structural registry entry into its element.
	fn instantiate(&self, entry: &'static str) -> BuildResult<Element> {
		let markup = match self.registry.get(entry) {
			Some(MarkupTemplate::Single(template)) => template.clone(),
			Some(MarkupTemplate::Container { open, close, .. }) => format!("{open}{close}"),
			None => return Err(BuildError::MissingEntry { entry }),
		};
		dom::parse_fragment(&markup)?
			.into_iter()
			.find_map(|node| match node {
				Node::Element(element) => Some(element),
				Node::Text(_) => None,
			})
			.ok_or(BuildError::EmptyMarkup { entry })
	}
}

impl Default for FormBuilder {
	fn default() -> Self {
		Self::new()
	}
}
