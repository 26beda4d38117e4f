//! Field expansion: one specification in, one parsed label/control row out.

use crate::dom::{self, Element, Node, ParseError};
use crate::markup::{MarkupRegistry, MarkupTemplate};
use crate::merge::{self, Record, merge};
use crate::template::TemplateEngine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Record keys that drive the builder and never surface as attributes.
pub const RESERVED_KEYS: [&str; 4] = ["field-input", "label", "default", "options"];

/// Placeholder name the row template reserves for the control fragment.
const FIELD_INPUT_KEY: &str = "field-input";

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
	#[error("no markup template for field type {type_name:?} and no generic input entry")]
	NoTemplate { type_name: String },
	#[error("markup registry has no \"field\" row entry")]
	NoRowTemplate,
	#[error("field markup failed to parse: {0}")]
	Markup(#[from] ParseError),
}

/// One form control plus its label, as supplied by the caller.
///
/// Anything beyond the known keys is captured as an extra attribute and
/// materialized onto the rendered control. Option order and extra
/// attribute order are preserved from the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub field_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Option label to submitted value, for option-like control children.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub options: IndexMap<String, String>,
	/// Pre-selected value applied when no explicit `value` overrides it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Arbitrary extra attributes (`class`, `placeholder`, `required`, ...).
	#[serde(flatten)]
	pub attrs: IndexMap<String, serde_json::Value>,
}

impl FieldSpec {
	pub fn new(field_type: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			field_type: Some(field_type.into()),
			name: Some(name.into()),
			..Self::default()
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Append one option (label, submitted value).
	pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.insert(name.into(), value.into());
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs
			.insert(name.into(), serde_json::Value::String(value.into()));
		self
	}

	/// Flatten into the record the merger and template engine consume.
	/// `options` stays typed; no template references it.
	fn to_record(&self) -> Record {
		let mut record = Record::new();
		let known = [
			("type", &self.field_type),
			("name", &self.name),
			("label", &self.label),
			("id", &self.id),
			("value", &self.value),
			("default", &self.default),
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

/// The per-field defaults a builder starts from: a plain text input.
pub fn default_field_record() -> Record {
	let mut record = Record::new();
	record.insert("type".to_string(), "text".to_string());
	record.insert("name".to_string(), "input".to_string());
	record.insert("label".to_string(), String::new());
	record.insert("id".to_string(), String::new());
	record
}

/// A built field row: the parsed nodes (label, control, ...) in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
	pub nodes: Vec<Node>,
}

impl FieldRow {
	/// Serialized markup of the whole row.
	pub fn to_html(&self) -> String {
		self.nodes.iter().map(Node::to_html).collect()
	}

	/// The control element the field's attributes were materialized on.
	pub fn control(&self, tag: &str) -> Option<&Element> {
		self.nodes
			.iter()
			.filter_map(Node::as_element)
			.find(|el| el.tag() == tag)
	}
}

/// Expands one field specification against a registry and defaults.
///
/// Borrowed configuration only; the builder holds no state of its own
/// and every build works on fresh copies.
pub struct FieldBuilder<'a> {
	registry: &'a MarkupRegistry,
	engine: &'a TemplateEngine,
	defaults: &'a Record,
}

impl<'a> FieldBuilder<'a> {
	pub fn new(
		registry: &'a MarkupRegistry,
		engine: &'a TemplateEngine,
		defaults: &'a Record,
	) -> Self {
		Self {
			registry,
			engine,
			defaults,
		}
	}

	/// Build the label/control row for one field.
	///
	/// The effective record is the builder defaults merged with the
	/// spec (spec wins). The type resolves to its registry entry or
	/// the generic input fallback; with neither present this is an
	/// error rather than a silent no-op. Attributes are materialized
	/// onto the control element, reserved keys excluded.
	pub fn build(&self, spec: &FieldSpec) -> Result<FieldRow, FieldError> {
		let mut record = merge(self.defaults, &spec.to_record());
		let type_name = record.get("type").cloned().unwrap_or_default();
		trace!(field = ?record.get("name"), field_type = %type_name, "building field");

		let resolved = self
			.registry
			.resolve(&type_name)
			.ok_or_else(|| FieldError::NoTemplate {
				type_name: type_name.clone(),
			})?;

		let field_input = match resolved.template() {
			MarkupTemplate::Container { open, child, close } => {
				let mut fragment = self.engine.render(open, &record);
				for (name, value) in &spec.options {
					fragment.push_str(&self.render_option(child, &record, name, value));
				}
				fragment.push_str(close);
				fragment
			}
			MarkupTemplate::Single(template) => {
				if !spec.options.is_empty() {
					debug!(
						field = ?record.get("name"),
						field_type = %type_name,
						"options ignored: type renders as a single template"
					);
				}
				// A default becomes the value unless one was given
				if !record.contains_key("value") {
					if let Some(default) = record.get("default").cloned() {
						record.insert("value".to_string(), default);
					}
				}
				self.engine.render(template, &record)
			}
		};

		// The control element is identified by the root tag of the
		// control fragment, looked up again after row expansion.
		let control_tag = dom::parse_fragment(&field_input)?
			.iter()
			.find_map(|node| node.as_element().map(|el| el.tag().to_string()));

		let row_template = match self.registry.get("field") {
			Some(MarkupTemplate::Single(template)) => template,
			Some(MarkupTemplate::Container { open, .. }) => open,
			None => return Err(FieldError::NoRowTemplate),
		};
		let mut row_values = record.clone();
		row_values.insert(FIELD_INPUT_KEY.to_string(), field_input);
		let row_markup = self.engine.render(row_template, &row_values);

		let mut nodes = dom::parse_fragment(&row_markup)?;
		if let Some(tag) = control_tag {
			let control = nodes
				.iter_mut()
				.find_map(|node| match node {
					Node::Element(el) if el.tag() == tag => Some(el),
					_ => None,
				});
			if let Some(control) = control {
				for (key, value) in &record {
					if RESERVED_KEYS.contains(&key.as_str()) {
						continue;
					}
					control.set_attr(key, value);
				}
			}
		}

		Ok(FieldRow { nodes })
	}

	fn render_option(
		&self,
		child_template: &str,
		record: &Record,
		name: &str,
		value: &str,
	) -> String {
		let mut option = Record::new();
		option.insert("name".to_string(), name.to_string());
		option.insert("value".to_string(), value.to_string());
		// A default marks its option selected unless an explicit value
		// overrides the choice
		if !record.contains_key("value") && record.get("default").map(String::as_str) == Some(value)
		{
			option.insert("selected".to_string(), "selected".to_string());
		}
		self.engine.render(child_template, &option)
	}
}
