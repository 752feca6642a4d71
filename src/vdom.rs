//! An owned virtual DOM.
//!
//! Components build a fresh tree on every update; [`DomDiffer`](`crate::diff::DomDiffer`) patches the live DOM
//! by comparing it against the previously mounted tree.
//!
//! Event handlers don't see `web_sys` types. They receive [`EventData`] extracted from the event and answer with a [`Reaction`],
//! which keeps component trees inspectable outside of a browser.

use crate::diff::Listener;
use std::{borrow::Cow, fmt, rc::Rc};

pub type Handler<M> = Rc<dyn Fn(&EventData) -> Reaction<M>>;

/// What an event handler wants done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction<M> {
	Ignore,
	Dispatch(M),
	/// Prevent the default action and blur the element the listener is attached to.
	Blur,
}

/// The parts of a DOM event handlers may look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventData {
	/// `textContent` of the element the listener is attached to.
	pub text: Option<String>,
	/// `value` of an `<input>` or `<select>` the listener is attached to.
	pub value: Option<String>,
	/// `KeyboardEvent.key`.
	pub key: Option<String>,
	/// `KeyboardEvent.isComposing`: an IME composition is in progress.
	pub composing: bool,
}

pub struct EventBinding<M> {
	pub name: &'static str,
	pub handler: Handler<M>,
}

impl<M> fmt::Debug for EventBinding<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventBinding").field("name", &self.name).finish_non_exhaustive()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: Cow<'static, str>,
	pub value: String,
}

pub struct Element<M> {
	/// Compared case-insensitively against `tagName`.
	pub name: Cow<'static, str>,
	pub attributes: Vec<Attribute>,
	pub content: Vec<Node<M>>,
	pub event_bindings: Vec<EventBinding<M>>,
	/// Live event listeners, only present on mounted trees.
	pub(crate) listeners: Vec<Listener<M>>,
}

impl<M> fmt::Debug for Element<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("name", &self.name)
			.field("attributes", &self.attributes)
			.field("content", &self.content)
			.field("event_bindings", &self.event_bindings)
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

impl<M> Element<M> {
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			attributes: Vec::new(),
			content: Vec::new(),
			event_bindings: Vec::new(),
			listeners: Vec::new(),
		}
	}

	#[must_use]
	pub fn attribute(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
		self.attributes.push(Attribute {
			name: name.into(),
			value: value.into(),
		});
		self
	}

	#[must_use]
	pub fn class(self, class: impl Into<String>) -> Self {
		self.attribute("class", class)
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Node<M>>) -> Self {
		self.content.push(child.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = Node<M>>) -> Self {
		self.content.extend(children);
		self
	}

	#[must_use]
	pub fn text(self, text: impl Into<String>) -> Self {
		self.child(Node::Text(text.into()))
	}

	#[must_use]
	pub fn on(mut self, name: &'static str, handler: impl Fn(&EventData) -> Reaction<M> + 'static) -> Self {
		self.event_bindings.push(EventBinding { name, handler: Rc::new(handler) });
		self
	}

	#[must_use]
	pub fn get_attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|attribute| attribute.name == name).map(|attribute| attribute.value.as_str())
	}

	#[must_use]
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attribute("class").map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
	}

	/// Runs the handler bound to `event` as if the DOM had fired it.
	pub fn fire(&self, event: &str, data: &EventData) -> Option<Reaction<M>> {
		self.event_bindings.iter().find(|binding| binding.name == event).map(|binding| (binding.handler)(data))
	}

	#[must_use]
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		for node in &self.content {
			node.collect_text(&mut text);
		}
		text
	}
}

pub struct Fragment<M> {
	/// Unique among siblings.
	pub dom_key: u64,
	pub content: Node<M>,
}

impl<M> fmt::Debug for Fragment<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Fragment").field("dom_key", &self.dom_key).field("content", &self.content).finish()
	}
}

pub enum Node<M> {
	Comment(String),
	Text(String),
	Element(Box<Element<M>>),
	/// Renders its items in place, without a wrapper element.
	Multi(Vec<Node<M>>),
	/// Like [`Node::Multi`], but items are matched by [`Fragment::dom_key`] so reordering moves DOM nodes.
	Keyed(Vec<Fragment<M>>),
}

impl<M> fmt::Debug for Node<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Node::Comment(comment) => f.debug_tuple("Comment").field(comment).finish(),
			Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Node::Element(element) => fmt::Debug::fmt(element, f),
			Node::Multi(nodes) => f.debug_tuple("Multi").field(nodes).finish(),
			Node::Keyed(fragments) => f.debug_tuple("Keyed").field(fragments).finish(),
		}
	}
}

impl<M> From<Element<M>> for Node<M> {
	fn from(element: Element<M>) -> Self {
		Node::Element(Box::new(element))
	}
}

impl<M> From<String> for Node<M> {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

impl<M> From<&str> for Node<M> {
	fn from(text: &str) -> Self {
		Node::Text(text.to_owned())
	}
}

impl<M> Node<M> {
	/// How many DOM nodes this renders to at its own level.
	#[must_use]
	pub fn dom_len(&self) -> usize {
		match self {
			Node::Comment(_) | Node::Text(_) | Node::Element(_) => 1,
			Node::Multi(nodes) => nodes.iter().map(Node::dom_len).sum(),
			Node::Keyed(fragments) => fragments.iter().map(|fragment| fragment.content.dom_len()).sum(),
		}
	}

	#[must_use]
	pub fn as_element(&self) -> Option<&Element<M>> {
		match self {
			Node::Element(element) => Some(&**element),
			_ => None,
		}
	}

	#[must_use]
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		self.collect_text(&mut text);
		text
	}

	fn collect_text(&self, text: &mut String) {
		match self {
			Node::Comment(_) => (),
			Node::Text(t) => text.push_str(t),
			Node::Element(element) => {
				for node in &element.content {
					node.collect_text(text)
				}
			}
			Node::Multi(nodes) => {
				for node in nodes {
					node.collect_text(text)
				}
			}
			Node::Keyed(fragments) => {
				for fragment in fragments {
					fragment.content.collect_text(text)
				}
			}
		}
	}

	/// All elements in document order, including this node if it is one.
	#[must_use]
	pub fn elements(&self) -> Vec<&Element<M>> {
		let mut elements = Vec::new();
		self.collect_elements(&mut elements);
		elements
	}

	fn collect_elements<'a>(&'a self, elements: &mut Vec<&'a Element<M>>) {
		match self {
			Node::Comment(_) | Node::Text(_) => (),
			Node::Element(element) => {
				elements.push(&**element);
				for node in &element.content {
					node.collect_elements(elements)
				}
			}
			Node::Multi(nodes) => {
				for node in nodes {
					node.collect_elements(elements)
				}
			}
			Node::Keyed(fragments) => {
				for fragment in fragments {
					fragment.content.collect_elements(elements)
				}
			}
		}
	}

	/// The first element (in document order) with the given attribute value.
	#[must_use]
	pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<&Element<M>> {
		self.elements().into_iter().find(|element| element.get_attribute(name) == Some(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Node<u8> {
		Element::new("ul")
			.class("list")
			.child(Node::Keyed(vec![
				Fragment {
					dom_key: 1,
					content: Element::new("li").attribute("data-id", "1").text("one").into(),
				},
				Fragment {
					dom_key: 2,
					content: Element::new("li").attribute("data-id", "2").text("two").on("click", |_| Reaction::Dispatch(2)).into(),
				},
			]))
			.child(Node::Comment("end".to_owned()))
			.into()
	}

	#[test]
	fn dom_len_flattens_multi_and_keyed() {
		let node: Node<u8> = Node::Multi(vec![Node::Text("a".to_owned()), Node::Keyed(vec![]), Node::Multi(vec![Node::Comment(String::new()), Element::new("b").into()])]);
		assert_eq!(node.dom_len(), 3);
		assert_eq!(sample().dom_len(), 1);
	}

	#[test]
	fn text_content_skips_comments() {
		assert_eq!(sample().text_content(), "onetwo");
	}

	#[test]
	fn elements_in_document_order() {
		let sample = sample();
		let names: Vec<_> = sample.elements().iter().map(|element| element.name.to_string()).collect();
		assert_eq!(names, ["ul", "li", "li"]);
	}

	#[test]
	fn find_and_fire() {
		let sample = sample();
		let second = sample.find_by_attribute("data-id", "2").unwrap();
		assert_eq!(second.text_content(), "two");
		assert_eq!(second.fire("click", &EventData::default()), Some(Reaction::Dispatch(2)));
		assert_eq!(second.fire("blur", &EventData::default()), None);
		assert!(sample.as_element().unwrap().has_class("list"));
		assert!(!sample.as_element().unwrap().has_class("lis"));
	}
}
