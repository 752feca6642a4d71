use super::{Component, Message, RowRef};
use crate::{
	agent::{Agent, Property},
	creatures::Bestiary,
	vdom::{Element, Node, Reaction},
};

/// One `<tr>` of the table.
#[derive(Debug, Clone, Copy)]
pub struct AgentRow<'a> {
	pub row: RowRef,
	pub agent: &'a Agent,
	pub bestiary: &'a Bestiary,
}

impl Component for AgentRow<'_> {
	fn render(&self) -> Node<Message> {
		let row = self.row;
		let mut tr = Element::new("tr").class(if self.agent.is_killed() { "agent killed" } else { "agent" });
		if let RowRef::Tracked(id) = row {
			tr = tr.attribute("data-id", id.to_string());
		} else {
			tr = tr.attribute("data-draft", "");
		}

		let selector = CreatureSelector {
			row,
			current: &self.agent.name,
			bestiary: self.bestiary,
		};
		tr.child(Element::new("td").class("creature").child(selector.render()))
			.children(Property::ALL.iter().map(|&property| {
				PropertyCell {
					row,
					property,
					value: self.agent.property(property),
				}
				.render()
			}))
			.on("mouseenter", move |_| Reaction::Dispatch(Message::Hover(row)))
			.into()
	}
}

/// A `<select>` over every known creature, with a blank entry first.
#[derive(Debug, Clone, Copy)]
pub struct CreatureSelector<'a> {
	pub row: RowRef,
	/// Selected if the bestiary knows it.
	pub current: &'a str,
	pub bestiary: &'a Bestiary,
}

impl Component for CreatureSelector<'_> {
	fn render(&self) -> Node<Message> {
		let row = self.row;
		let known = self.bestiary.find(self.current).is_some();
		Element::new("select")
			.attribute("name", "creature")
			.child(CreatureOption { name: "", selected: !known }.render())
			.children(self.bestiary.names().map(|name| {
				CreatureOption {
					name,
					selected: known && name == self.current,
				}
				.render()
			}))
			.on("change", move |data| match &data.value {
				Some(name) if !name.is_empty() => Reaction::Dispatch(Message::SelectCreature { row, name: name.clone() }),
				_ => Reaction::Ignore,
			})
			.into()
	}
}

#[derive(Debug, Clone, Copy)]
pub struct CreatureOption<'a> {
	pub name: &'a str,
	pub selected: bool,
}

impl Component for CreatureOption<'_> {
	fn render(&self) -> Node<Message> {
		let mut option = Element::new("option").attribute("value", self.name);
		if self.selected {
			option = option.attribute("selected", "");
		}
		option.text(self.name).into()
	}
}

/// An editable cell.
///
/// Leaving the cell commits its text if it changed. Enter leaves the cell.
#[derive(Debug, Clone)]
pub struct PropertyCell {
	pub row: RowRef,
	pub property: Property,
	pub value: String,
}

impl Component for PropertyCell {
	fn render(&self) -> Node<Message> {
		let (row, property) = (self.row, self.property);
		let current = self.value.clone();
		Element::new("td")
			.class(if property.is_numeric() { "property numeric" } else { "property" })
			.attribute("contenteditable", "true")
			.attribute("data-property", property.label())
			.text(self.value.as_str())
			.on("blur", move |data| match &data.text {
				Some(text) if text.trim() != current => Reaction::Dispatch(Message::Edit {
					row,
					property,
					value: text.clone(),
				}),
				_ => Reaction::Ignore,
			})
			.on("keydown", |data| match data.key.as_deref() {
				Some("Enter") if !data.composing => Reaction::Blur,
				_ => Reaction::Ignore,
			})
			.into()
	}
}
