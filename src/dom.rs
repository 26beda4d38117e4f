//! Minimal element tree used as the rendering surface.
//!
//! The builders expand markup templates into strings and need exactly two
//! capabilities from their environment: turning such a string into element
//! handles ([`parse_fragment`]), and mutating attributes and children on
//! those handles ([`Element`]). Serialization back to HTML escapes text
//! and attribute values, so caller-supplied data cannot break out of the
//! produced markup.
//!
//! The parser accepts the HTML-like dialect the markup templates are
//! written in: nested elements, quoted or bare attributes (`selected`,
//! `checked`), self-closing syntax and the usual void elements. It is not
//! a general HTML parser and makes no recovery attempt on mismatched
//! tags.

use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("unterminated tag at byte {position}")]
	UnterminatedTag { position: usize },
	#[error("invalid tag name at byte {position}")]
	InvalidTagName { position: usize },
	#[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
	MismatchedClosingTag { expected: String, found: String },
	#[error("closing tag </{tag}> without a matching opening tag")]
	UnexpectedClosingTag { tag: String },
	#[error("markup ended inside <{tag}>")]
	UnclosedElement { tag: String },
}

/// A parsed node: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
}

impl Node {
	/// Serialize this node back to HTML.
	pub fn to_html(&self) -> String {
		match self {
			Node::Element(element) => element.to_html(),
			Node::Text(text) => escape_html(text),
		}
	}

	/// The element inside this node, if it is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(element) => Some(element),
			Node::Text(_) => None,
		}
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

/// One element handle: tag name, ordered attributes and children.
///
/// Attribute values are optional so boolean attributes (`selected`,
/// `checked`) round-trip without a synthesized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	tag: String,
	attrs: IndexMap<String, Option<String>>,
	children: Vec<Node>,
}

/// Elements that never take children and close themselves.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
	"track", "wbr",
];

fn is_void(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

impl Element {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs: IndexMap::new(),
			children: Vec::new(),
		}
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Attribute value, with bare attributes reading as empty.
	pub fn attr(&self, name: &str) -> Option<&str> {
		match self.attrs.get(name) {
			Some(Some(value)) => Some(value.as_str()),
			Some(None) => Some(""),
			None => None,
		}
	}

	pub fn has_attr(&self, name: &str) -> bool {
		self.attrs.contains_key(name)
	}

	/// Set (or overwrite) an attribute value.
	pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.attrs.insert(name.into(), Some(value.into()));
	}

	/// Set a boolean attribute with no value (`selected`, `checked`).
	pub fn set_bare_attr(&mut self, name: impl Into<String>) {
		self.attrs.insert(name.into(), None);
	}

	/// Attribute names in document order.
	pub fn attr_names(&self) -> impl Iterator<Item = &str> {
		self.attrs.keys().map(String::as_str)
	}

	pub fn append_child(&mut self, node: Node) {
		self.children.push(node);
	}

	pub fn children(&self) -> &[Node] {
		&self.children
	}

	/// Child elements in order, skipping text nodes.
	pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(Node::as_element)
	}

	/// Depth-first search for the first descendant with the given tag.
	pub fn find(&self, tag: &str) -> Option<&Element> {
		for child in self.child_elements() {
			if child.tag == tag {
				return Some(child);
			}
			if let Some(found) = child.find(tag) {
				return Some(found);
			}
		}
		None
	}

	/// Concatenated text of this element and its descendants.
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		for child in &self.children {
			match child {
				Node::Text(t) => text.push_str(t),
				Node::Element(el) => text.push_str(&el.text_content()),
			}
		}
		text
	}

	/// Serialize to HTML with escaped text and attribute values.
	pub fn to_html(&self) -> String {
		let mut html = String::new();
		self.write_html(&mut html);
		html
	}

	fn write_html(&self, out: &mut String) {
		out.push('<');
		out.push_str(&self.tag);
		for (name, value) in &self.attrs {
			out.push(' ');
			out.push_str(name);
			if let Some(value) = value {
				out.push_str("=\"");
				out.push_str(&escape_html(value));
				out.push('"');
			}
		}
		if self.children.is_empty() && is_void(&self.tag) {
			out.push_str(" />");
		} else {
			out.push('>');
			for child in &self.children {
				match child {
					Node::Element(element) => element.write_html(out),
					Node::Text(text) => out.push_str(&escape_html(text)),
				}
			}
			out.push_str("</");
			out.push_str(&self.tag);
			out.push('>');
		}
	}
}

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use formwright::dom::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// assert_eq!(escape_html("A & B"), "A &amp; B");
/// ```
pub fn escape_html(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Decode the entities produced by [`escape_html`].
pub fn unescape_html(s: &str) -> String {
	s.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&#x27;", "'")
		.replace("&#39;", "'")
		.replace("&amp;", "&")
}

/// Parse an HTML-like string into a sequence of nodes.
///
/// Text content and attribute values are entity-decoded on the way in;
/// serialization escapes them again, so a parse/serialize round trip is
/// neutral.
///
/// # Examples
///
/// ```
/// use formwright::dom::{Node, parse_fragment};
///
/// let nodes = parse_fragment("<label for=\"x\">X: </label><input type=\"text\" />").unwrap();
/// assert_eq!(nodes.len(), 2);
/// let label = nodes[0].as_element().unwrap();
/// assert_eq!(label.tag(), "label");
/// assert_eq!(label.attr("for"), Some("x"));
/// ```
pub fn parse_fragment(input: &str) -> Result<Vec<Node>, ParseError> {
	let mut parser = FragmentParser { input, pos: 0 };
	parser.parse_nodes(None)
}

struct FragmentParser<'a> {
	input: &'a str,
	pos: usize,
}

impl FragmentParser<'_> {
	fn rest(&self) -> &str {
		&self.input[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn bump(&mut self) {
		if let Some(c) = self.peek() {
			self.pos += c.len_utf8();
		}
	}

	fn eat(&mut self, expected: char) -> bool {
		if self.peek() == Some(expected) {
			self.bump();
			true
		} else {
			false
		}
	}

	fn skip_whitespace(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.bump();
		}
	}

	fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
		let start = self.pos;
		while self.peek().is_some_and(&keep) {
			self.bump();
		}
		self.input[start..self.pos].to_string()
	}

	fn take_tag_name(&mut self) -> String {
		self.take_while(|c| c.is_ascii_alphanumeric() || c == '-')
	}

	fn parse_nodes(&mut self, enclosing: Option<&str>) -> Result<Vec<Node>, ParseError> {
		let mut nodes = Vec::new();
		loop {
			match self.rest().find('<') {
				None => {
					let text = self.rest();
					if !text.is_empty() {
						nodes.push(Node::Text(unescape_html(text)));
						self.pos = self.input.len();
					}
					return match enclosing {
						Some(tag) => Err(ParseError::UnclosedElement {
							tag: tag.to_string(),
						}),
						None => Ok(nodes),
					};
				}
				Some(offset) => {
					if offset > 0 {
						let text = &self.rest()[..offset];
						nodes.push(Node::Text(unescape_html(text)));
						self.pos += offset;
					}
					if self.rest().starts_with("</") {
						let found = self.parse_closing_tag()?;
						return match enclosing {
							Some(open) if open == found => Ok(nodes),
							Some(open) => Err(ParseError::MismatchedClosingTag {
								expected: open.to_string(),
								found,
							}),
							None => Err(ParseError::UnexpectedClosingTag { tag: found }),
						};
					}
					nodes.push(Node::Element(self.parse_element()?));
				}
			}
		}
	}

	fn parse_closing_tag(&mut self) -> Result<String, ParseError> {
		let start = self.pos;
		self.bump(); // '<'
		self.bump(); // '/'
		let tag = self.take_tag_name();
		if tag.is_empty() {
			return Err(ParseError::InvalidTagName { position: start });
		}
		self.skip_whitespace();
		if !self.eat('>') {
			return Err(ParseError::UnterminatedTag { position: start });
		}
		Ok(tag)
	}

	fn parse_element(&mut self) -> Result<Element, ParseError> {
		let start = self.pos;
		self.bump(); // '<'
		let tag = self.take_tag_name();
		if tag.is_empty() {
			return Err(ParseError::InvalidTagName { position: start });
		}
		let mut element = Element::new(tag.clone());
		let self_closed = self.parse_attributes(&mut element, start)?;
		if !self_closed && !is_void(&tag) {
			element.children = self.parse_nodes(Some(&tag))?;
		}
		Ok(element)
	}

	/// Parse attributes up to the end of the opening tag. Returns whether
	/// the tag closed itself with `/>`.
	fn parse_attributes(
		&mut self,
		element: &mut Element,
		tag_start: usize,
	) -> Result<bool, ParseError> {
		loop {
			self.skip_whitespace();
			match self.peek() {
				None => {
					return Err(ParseError::UnterminatedTag {
						position: tag_start,
					});
				}
				Some('>') => {
					self.bump();
					return Ok(false);
				}
				Some('/') => {
					self.bump();
					self.skip_whitespace();
					if self.eat('>') {
						return Ok(true);
					}
					return Err(ParseError::UnterminatedTag {
						position: tag_start,
					});
				}
				Some(_) => {
					let name = self.take_while(|c| {
						!c.is_whitespace() && c != '=' && c != '>' && c != '/'
					});
					if name.is_empty() {
						return Err(ParseError::UnterminatedTag {
							position: tag_start,
						});
					}
					self.skip_whitespace();
					if self.eat('=') {
						self.skip_whitespace();
						let value = self.parse_attribute_value(tag_start)?;
						element.set_attr(name, unescape_html(&value));
					} else {
						element.set_bare_attr(name);
					}
				}
			}
		}
	}

	fn parse_attribute_value(&mut self, tag_start: usize) -> Result<String, ParseError> {
		for quote in ['"', '\''] {
			if self.eat(quote) {
				let value = self.take_while(|c| c != quote);
				if !self.eat(quote) {
					return Err(ParseError::UnterminatedTag {
						position: tag_start,
					});
				}
				return Ok(value);
			}
		}
		// Unquoted value, runs to whitespace or tag end
		Ok(self.take_while(|c| !c.is_whitespace() && c != '>' && c != '/'))
	}
}
