use super::{Component, Message};
use crate::vdom::{Element, Node, Reaction};

#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonBar;

impl Component for ButtonBar {
	fn render(&self) -> Node<Message> {
		Element::new("div").class("button-bar").child(SaveButton.render()).child(LoadButton.render()).into()
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SaveButton;

impl Component for SaveButton {
	fn render(&self) -> Node<Message> {
		button("save", "Save", Message::Save)
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadButton;

impl Component for LoadButton {
	fn render(&self) -> Node<Message> {
		button("load", "Load", Message::Load)
	}
}

fn button(class: &'static str, label: &'static str, message: Message) -> Node<Message> {
	Element::new("button")
		.attribute("type", "button")
		.class(class)
		.text(label)
		.on("click", move |_| Reaction::Dispatch(message.clone()))
		.into()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vdom::EventData;

	#[test]
	fn buttons_dispatch() {
		let bar = ButtonBar.render();
		let bar = bar.as_element().unwrap();
		assert!(bar.has_class("button-bar"));

		let buttons: Vec<_> = bar.content.iter().filter_map(Node::as_element).collect();
		assert_eq!(buttons.len(), 2);
		assert_eq!(buttons[0].text_content(), "Save");
		assert_eq!(buttons[0].fire("click", &EventData::default()), Some(Reaction::Dispatch(Message::Save)));
		assert_eq!(buttons[1].text_content(), "Load");
		assert_eq!(buttons[1].fire("click", &EventData::default()), Some(Reaction::Dispatch(Message::Load)));
	}
}
