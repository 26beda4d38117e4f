//! Markup templates and the field-type registry.
//!
//! Every field type maps to a [`MarkupTemplate`]: either one template
//! string, or a container triple for structured controls whose children
//! repeat per option (selects). The registry also carries the structural
//! templates the assembler consumes (`form`, `fieldset`, `legend` and
//! the `field` row that wraps a label around each control).

use indexmap::IndexMap;

/// Registry name of the generic input entry used as the type fallback.
pub const GENERIC_INPUT: &str = "input";

/// Markup for one entry: a single template string (self-closing inputs,
/// structural wrappers) or a container with a repeatable child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupTemplate {
	Single(String),
	Container {
		open: String,
		child: String,
		close: String,
	},
}

impl MarkupTemplate {
	pub fn single(template: impl Into<String>) -> Self {
		MarkupTemplate::Single(template.into())
	}

	pub fn container(
		open: impl Into<String>,
		child: impl Into<String>,
		close: impl Into<String>,
	) -> Self {
		MarkupTemplate::Container {
			open: open.into(),
			child: child.into(),
			close: close.into(),
		}
	}
}

/// Outcome of a type lookup.
///
/// The fallback is tagged explicitly so callers know the original type
/// must pass through as the `type` attribute of the generic template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedMarkup<'a> {
	/// The requested type has its own entry.
	Exact(&'a MarkupTemplate),
	/// No entry for the type; the generic input entry applies.
	Fallback(&'a MarkupTemplate),
}

impl<'a> ResolvedMarkup<'a> {
	pub fn template(&self) -> &'a MarkupTemplate {
		match self {
			ResolvedMarkup::Exact(template) | ResolvedMarkup::Fallback(template) => template,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, ResolvedMarkup::Fallback(_))
	}
}

/// Immutable-after-construction mapping from type name to markup.
///
/// The default set mirrors a plain Bootstrap-ish form: text-style types
/// all route through the generic input entry, selects get the container
/// triple. Entries can be replaced or added per builder instance; the
/// registry is never shared mutable state across builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRegistry {
	entries: IndexMap<String, MarkupTemplate>,
}

impl MarkupRegistry {
	/// A registry with no entries at all. Field building against it
	/// fails with an explicit error unless entries are added.
	pub fn empty() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	/// Add or replace an entry.
	pub fn insert(&mut self, name: impl Into<String>, template: MarkupTemplate) {
		self.entries.insert(name.into(), template);
	}

	pub fn get(&self, name: &str) -> Option<&MarkupTemplate> {
		self.entries.get(name)
	}

	/// Resolve a field type to its markup.
	///
	/// An exact entry wins; otherwise the generic input entry is
	/// returned as [`ResolvedMarkup::Fallback`]. `None` means neither
	/// exists and the type cannot be rendered.
	///
	/// # Examples
	///
	/// ```
	/// use formwright::markup::{MarkupRegistry, ResolvedMarkup};
	///
	/// let registry = MarkupRegistry::default();
	/// assert!(matches!(registry.resolve("select"), Some(ResolvedMarkup::Exact(_))));
	/// assert!(matches!(registry.resolve("email"), Some(ResolvedMarkup::Fallback(_))));
	/// ```
	pub fn resolve(&self, name: &str) -> Option<ResolvedMarkup<'_>> {
		if let Some(template) = self.entries.get(name) {
			return Some(ResolvedMarkup::Exact(template));
		}
		self.entries.get(GENERIC_INPUT).map(ResolvedMarkup::Fallback)
	}
}

impl Default for MarkupRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.insert("form", MarkupTemplate::single(r#"<form class="form"></form>"#));
		registry.insert("fieldset", MarkupTemplate::single("<fieldset></fieldset>"));
		registry.insert("legend", MarkupTemplate::single("<legend></legend>"));
		registry.insert(
			"field",
			MarkupTemplate::single(r#"<label for="{{id}}">{{label}}: </label>{{field-input}}"#),
		);
		registry.insert(
			GENERIC_INPUT,
			MarkupTemplate::single(
				r#"<input class="form-control text-box" type="{{type}}" {{checked}} />"#,
			),
		);
		registry.insert(
			"select",
			MarkupTemplate::container(
				r#"<select class="form-control select-box">"#,
				r#"<option {{selected}} value="{{value}}">{{name}}</option>"#,
				"</select>",
			),
		);
		registry
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_registry_entries() {
		let registry = MarkupRegistry::default();
		for name in ["form", "fieldset", "legend", "field", "input", "select"] {
			assert!(registry.get(name).is_some(), "missing entry {name}");
		}
	}

	#[test]
	fn test_resolve_exact() {
		let registry = MarkupRegistry::default();
		let resolved = registry.resolve("select").unwrap();
		assert!(!resolved.is_fallback());
		assert!(matches!(
			resolved.template(),
			MarkupTemplate::Container { .. }
		));
	}

	#[test]
	fn test_resolve_fallback_for_unknown_type() {
		let registry = MarkupRegistry::default();
		let resolved = registry.resolve("email").unwrap();
		assert!(resolved.is_fallback());
		assert_eq!(resolved.template(), registry.get(GENERIC_INPUT).unwrap());
	}

	#[test]
	fn test_resolve_none_without_generic_entry() {
		let registry = MarkupRegistry::empty();
		assert!(registry.resolve("text").is_none());
	}

	#[test]
	fn test_insert_replaces_entry() {
		let mut registry = MarkupRegistry::default();
		registry.insert("input", MarkupTemplate::single("<input />"));
		assert_eq!(
			registry.get("input"),
			Some(&MarkupTemplate::single("<input />"))
		);
	}
}
