//! Declarative HTML form rendering from JSON-like configuration.
//!
//! A form is described by a [`FormConfig`]: fieldsets, field
//! definitions, labels and a handful of input types. Each field is
//! merged against per-type defaults and expanded into an element tree
//! through mustache-style `{{key}}` substitution, driven by a
//! per-builder [`MarkupRegistry`]. The result is a [`BuiltForm`]: an
//! element handle ready for attachment plus its serialized markup.
//!
//! The crate renders only. Submission handling, input validation,
//! persistence and server communication are out of scope, and the
//! template layer is intentionally not a templating language: flat
//! placeholder substitution, nothing else.
//!
//! ```
//! use formwright::{FieldSpec, FieldsetSpec, FormBuilder, FormConfig};
//!
//! let config = FormConfig::new()
//! 	.with_id("signup")
//! 	.with_fieldset(FieldsetSpec::new([
//! 		FieldSpec::new("text", "username").with_label("Username").with_id("username"),
//! 		FieldSpec::new("select", "country")
//! 			.with_label("Country")
//! 			.with_option("United Kingdom", "gb")
//! 			.with_option("France", "fr")
//! 			.with_default("gb"),
//! 	]));
//!
//! let form = FormBuilder::new().build(&config)?;
//! assert!(form.html.starts_with("<form"));
//! assert_eq!(form.root.find("select").unwrap().attr("name"), Some("country"));
//! # Ok::<(), formwright::BuildError>(())
//! ```

pub mod dom;
pub mod field;
pub mod form;
pub mod markup;
pub mod merge;
pub mod template;

pub use dom::{Element, Node, ParseError, escape_html, parse_fragment, unescape_html};
pub use field::{FieldBuilder, FieldError, FieldRow, FieldSpec, RESERVED_KEYS};
pub use form::{
	BuildError, BuildResult, BuiltForm, ConfigError, FieldsetSpec, FormBuilder, FormConfig,
};
pub use markup::{MarkupRegistry, MarkupTemplate, ResolvedMarkup};
pub use merge::{Record, merge};
pub use template::TemplateEngine;
