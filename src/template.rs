//! Mustache-style `{{key}}` substitution.
//!
//! This is deliberately not a templating language: flat placeholder
//! substitution only, no conditionals, loops or nesting. Whatever the
//! supplied values do not cover is erased, so rendered markup never
//! leaks raw placeholder syntax.

use crate::merge::Record;
use regex::Regex;

/// Pattern for a well-formed placeholder token.
const PLACEHOLDER_PATTERN: &str = r"\{\{[a-zA-Z0-9_-]+\}\}";

/// Renders `{{key}}` placeholders from a value record.
///
/// The erasure regex is compiled once at construction and the engine is
/// immutable afterwards, so a single instance can serve any number of
/// renders.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
	leftover: Regex,
}

impl TemplateEngine {
	pub fn new() -> Self {
		Self {
			// Constant pattern, compilation cannot fail
			leftover: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern"),
		}
	}

	/// Substitute placeholders in `template` from `values`.
	///
	/// Each key in `values` replaces every occurrence of the literal
	/// token `{{key}}`, applied in the record's insertion order. Any
	/// remaining `{{identifier}}` token (identifier in `[a-zA-Z0-9_-]`)
	/// is then erased, so incomplete data degrades to blank slots
	/// rather than visible placeholder syntax.
	///
	/// A value that itself contains placeholder syntax may be rewritten
	/// by later keys or the erasure pass; that interaction is undefined
	/// and not part of the contract.
	///
	/// # Examples
	///
	/// ```
	/// use formwright::merge::Record;
	/// use formwright::template::TemplateEngine;
	///
	/// let engine = TemplateEngine::new();
	/// let mut values = Record::new();
	/// values.insert("name".to_string(), "email".to_string());
	///
	/// let html = engine.render("<input name=\"{{name}}\" id=\"{{id}}\" />", &values);
	/// assert_eq!(html, "<input name=\"email\" id=\"\" />");
	/// ```
	pub fn render(&self, template: &str, values: &Record) -> String {
		let mut rendered = template.to_string();
		for (key, value) in values {
			let token = format!("{{{{{key}}}}}");
			rendered = rendered.replace(&token, value);
		}
		self.leftover.replace_all(&rendered, "").into_owned()
	}
}

impl Default for TemplateEngine {
	fn default() -> Self {
		Self::new()
	}
}
