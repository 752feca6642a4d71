//! Reads existing DOM content back into a virtual tree, so that static markup can be adopted by a [`DomDiffer`](`crate::diff::DomDiffer`).

use crate::vdom::{Attribute, Element, Node};
use std::borrow::Cow;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Attr, Comment, NamedNodeMap, NodeList, Text};

#[must_use]
pub fn load_child_nodes<M>(child_nodes: &NodeList) -> Vec<Node<M>> {
	(0..child_nodes.length()).filter_map(|i| child_nodes.item(i)).map(|child| load_node(&child)).collect()
}

#[must_use]
pub fn load_node<M>(child: &web_sys::Node) -> Node<M> {
	if let Some(element) = child.dyn_ref::<web_sys::Element>() {
		load_element(element).into()
	} else if let Some(text) = child.dyn_ref::<Text>() {
		Node::Text(text.data())
	} else if let Some(comment) = child.dyn_ref::<Comment>() {
		Node::Comment(comment.data())
	} else {
		// Mismatches on the first update, which replaces it.
		warn!("Unrecognised child node {:?}; Loading it as empty comment.", child);
		Node::Comment(String::new())
	}
}

/// Loads `element` without event bindings. Tag names are kept as the DOM reports them.
#[must_use]
pub fn load_element<M>(element: &web_sys::Element) -> Element<M> {
	let node: &web_sys::Node = element.as_ref();
	let mut loaded = Element::new(element.tag_name());
	loaded.attributes = load_attributes(&element.attributes());
	loaded.content = load_child_nodes(&node.child_nodes());
	loaded
}

#[must_use]
pub fn load_attributes(attributes: &NamedNodeMap) -> Vec<Attribute> {
	(0..attributes.length()).filter_map(|i| attributes.item(i)).map(|attribute| load_attribute(&attribute)).collect()
}

#[must_use]
pub fn load_attribute(attribute: &Attr) -> Attribute {
	Attribute {
		name: Cow::Owned(attribute.local_name()),
		value: attribute.value(),
	}
}
