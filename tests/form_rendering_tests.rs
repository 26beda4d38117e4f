//! End-to-end form rendering tests
//!
//! Drives the public API the way a page would: configuration in,
//! element tree and markup out.

use formwright::{
	Element, FieldSpec, FieldsetSpec, FormBuilder, FormConfig, MarkupRegistry, MarkupTemplate,
	RESERVED_KEYS,
};
use rstest::rstest;
use serde_json::json;

fn fieldset_of(form: &Element) -> &Element {
	form.find("fieldset").expect("form should have a fieldset")
}

#[rstest]
fn test_text_and_select_fieldset() {
	let config = FormConfig::new()
		.with_id("profile")
		.with_method("post")
		.with_action("/profile")
		.with_fieldset(
			FieldsetSpec::new([
				FieldSpec::new("text", "username")
					.with_label("Username")
					.with_id("username")
					.with_attr("placeholder", "Your name"),
				FieldSpec::new("select", "country")
					.with_label("Country")
					.with_id("country")
					.with_option("United Kingdom", "gb")
					.with_option("France", "fr")
					.with_default("fr"),
			])
			.with_legend("About you"),
		);

	let form = FormBuilder::new().build(&config).unwrap();

	assert_eq!(form.root.attr("id"), Some("profile"));
	assert_eq!(form.root.attr("method"), Some("post"));
	assert_eq!(form.root.attr("action"), Some("/profile"));

	let fieldsets: Vec<&Element> = form
		.root
		.child_elements()
		.filter(|el| el.tag() == "fieldset")
		.collect();
	assert_eq!(fieldsets.len(), 1);
	let fieldset = fieldsets[0];

	// legend, label, input, label, select
	let children: Vec<&str> = fieldset.child_elements().map(Element::tag).collect();
	assert_eq!(children, vec!["legend", "label", "input", "label", "select"]);

	let input = fieldset.find("input").unwrap();
	assert_eq!(input.attr("type"), Some("text"));
	assert_eq!(input.attr("name"), Some("username"));
	assert_eq!(input.attr("id"), Some("username"));
	assert_eq!(input.attr("placeholder"), Some("Your name"));

	let select = fieldset.find("select").unwrap();
	let options: Vec<&Element> = select.child_elements().collect();
	assert_eq!(options.len(), 2);
	assert_eq!(options[0].attr("value"), Some("gb"));
	assert!(!options[0].has_attr("selected"));
	assert_eq!(options[1].attr("value"), Some("fr"));
	assert!(options[1].has_attr("selected"));

	// The serialized markup is the same tree
	assert_eq!(form.html, form.root.to_html());
	assert!(form.html.contains("<option selected value=\"fr\">France</option>"));
}

#[rstest]
#[case("email")]
#[case("password")]
#[case("date")]
fn test_unknown_types_render_via_generic_input(#[case] type_name: &str) {
	let config = FormConfig::new().with_fieldset(FieldsetSpec::new([FieldSpec::new(
		type_name, "field",
	)]));

	let form = FormBuilder::new().build(&config).unwrap();
	let input = form.root.find("input").unwrap();
	assert_eq!(input.attr("type"), Some(type_name));
	assert_eq!(input.attr("class"), Some("form-control text-box"));
}

#[rstest]
fn test_reserved_keys_never_rendered_as_attributes() {
	let config = FormConfig::new().with_fieldset(FieldsetSpec::new([
		FieldSpec::new("text", "plain")
			.with_label("Plain")
			.with_default("x"),
		FieldSpec::new("select", "choice")
			.with_label("Choice")
			.with_option("A", "a")
			.with_default("a"),
	]));

	let form = FormBuilder::new().build(&config).unwrap();
	for control in ["input", "select"] {
		let element = form.root.find(control).unwrap();
		for reserved in RESERVED_KEYS {
			assert!(
				!element.has_attr(reserved),
				"{control} carries reserved key {reserved}"
			);
		}
	}
	for reserved in RESERVED_KEYS {
		assert!(!form.html.contains(&format!("{reserved}=\"")));
	}
}

#[rstest]
fn test_build_is_idempotent_and_independent() {
	let builder = FormBuilder::new();
	let config = FormConfig::new()
		.with_id("stable")
		.with_fieldset(FieldsetSpec::new([
			FieldSpec::new("text", "a").with_default("1"),
			FieldSpec::new("select", "b").with_option("X", "x"),
		]));

	let first = builder.build(&config).unwrap();
	let second = builder.build(&config).unwrap();

	assert_eq!(first.html, second.html);
	assert_eq!(first.root, second.root);

	let mut altered = first;
	altered.root.set_attr("id", "drifted");
	assert_eq!(second.root.attr("id"), Some("stable"));
}

#[rstest]
fn test_json_configuration_end_to_end() {
	let config = FormConfig::from_value(json!({
		"id": "signup",
		"action": "/signup",
		"button_text": "Create account",
		"fieldsets": [
			{
				"legend": "Account",
				"fields": [
					{ "type": "text", "name": "username", "label": "Username", "id": "username" },
					{
						"type": "select",
						"name": "plan",
						"label": "Plan",
						"options": { "Free": "free", "Pro": "pro" },
						"default": "free"
					}
				]
			}
		]
	}))
	.unwrap();

	let form = FormBuilder::new().build(&config).unwrap();

	assert_eq!(form.root.attr("id"), Some("signup"));
	assert_eq!(form.root.attr("action"), Some("/signup"));

	let button = form.root.find("button").unwrap();
	assert_eq!(button.text_content(), "Create account");

	let select = form.root.find("select").unwrap();
	let selected: Vec<&str> = select
		.child_elements()
		.filter(|o| o.has_attr("selected"))
		.filter_map(|o| o.attr("value"))
		.collect();
	assert_eq!(selected, vec!["free"]);

	let fieldset = fieldset_of(&form.root);
	assert_eq!(fieldset.child_elements().next().unwrap().tag(), "legend");
}

#[rstest]
fn test_custom_registry_and_field_defaults() {
	let mut registry = MarkupRegistry::default();
	registry.insert(
		"field",
		MarkupTemplate::single(r#"<label for="{{id}}">{{label}}</label>{{field-input}}"#),
	);
	registry.insert(
		"textarea",
		MarkupTemplate::single(r#"<textarea rows="{{rows}}">{{value}}</textarea>"#),
	);

	let mut defaults = formwright::Record::new();
	defaults.insert("type".to_string(), "text".to_string());
	defaults.insert("rows".to_string(), "4".to_string());

	let builder = FormBuilder::new()
		.with_registry(registry)
		.with_field_defaults(defaults);

	let config = FormConfig::new().with_fieldset(FieldsetSpec::new([FieldSpec::new(
		"textarea", "bio",
	)
	.with_label("Bio")
	.with_value("hello")]));

	let form = builder.build(&config).unwrap();
	let textarea = form.root.find("textarea").unwrap();
	assert_eq!(textarea.attr("rows"), Some("4"));
	assert_eq!(textarea.attr("name"), Some("bio"));
	assert_eq!(textarea.text_content(), "hello");
}

#[rstest]
fn test_attribute_values_are_escaped_in_markup() {
	let config = FormConfig::new().with_fieldset(FieldsetSpec::new([FieldSpec::new(
		"text", "quote",
	)
	.with_value(r#"say "hi" & go"#)]));

	let form = FormBuilder::new().build(&config).unwrap();
	assert!(form.html.contains(r#"value="say &quot;hi&quot; &amp; go""#));
	assert_eq!(
		form.root.find("input").unwrap().attr("value"),
		Some(r#"say "hi" & go"#)
	);
}
