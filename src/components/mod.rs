//! The view: plain structs borrowing the state they show.
//!
//! Components don't call back into their parents. Event handlers answer with a [`Message`],
//! which the [runtime](`crate::runtime`) hands to [`App::update`](`crate::app::App::update`).

use crate::{
	agent::{AgentId, Property},
	vdom::Node,
};

mod agent_row;
mod button_bar;
mod info_box;
mod initiative_table;

pub use agent_row::{AgentRow, CreatureOption, CreatureSelector, PropertyCell};
pub use button_bar::{ButtonBar, LoadButton, SaveButton};
pub use info_box::{AbilityScoresBox, ImageView, InfoBox, SavingThrowsBox};
pub use initiative_table::{Headers, InitiativeTable, TrackerRows};

pub trait Component {
	fn render(&self) -> Node<Message>;
}

/// Which row of the table a message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowRef {
	Tracked(AgentId),
	/// The blank row at the bottom, which joins the tracker once edited.
	Draft,
}

impl RowRef {
	/// Unique among one generation of rows.
	///
	/// `generation` changes whenever the tracker is replaced, so that rows of different trackers never share DOM nodes.
	#[must_use]
	pub fn dom_key(self, generation: u32) -> u64 {
		let row = match self {
			RowRef::Tracked(AgentId(id)) => u64::from(id),
			RowRef::Draft => 0,
		};
		(u64::from(generation) << 32) | row
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	/// A table cell lost focus with new text.
	Edit { row: RowRef, property: Property, value: String },
	SelectCreature { row: RowRef, name: String },
	Hover(RowRef),
	Save,
	Load,
}

impl Message {
	/// The variant name, for logs that mustn't contain table content.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			Message::Edit { .. } => "Edit",
			Message::SelectCreature { .. } => "SelectCreature",
			Message::Hover(_) => "Hover",
			Message::Save => "Save",
			Message::Load => "Load",
		}
	}
}

/// Renders nothing.
pub(crate) fn empty() -> Node<Message> {
	Node::Multi(Vec::new())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dom_keys_are_distinct_across_generations() {
		let keys = [
			RowRef::Draft.dom_key(0),
			RowRef::Tracked(AgentId(1)).dom_key(0),
			RowRef::Draft.dom_key(1),
			RowRef::Tracked(AgentId(1)).dom_key(1),
		];
		for (i, a) in keys.iter().enumerate() {
			assert!(keys[i + 1..].iter().all(|b| a != b));
		}
	}

	#[test]
	fn kinds() {
		assert_eq!(Message::Hover(RowRef::Draft).kind(), "Hover");
		assert_eq!(
			Message::Edit {
				row: RowRef::Draft,
				property: Property::Name,
				value: "secret".to_owned()
			}
			.kind(),
			"Edit"
		);
	}
}
