use super::{AgentRow, Component, Message, RowRef};
use crate::{
	agent::{Agent, Property},
	creatures::Bestiary,
	tracker::Tracker,
	vdom::{Element, Fragment, Node},
};

#[derive(Debug, Clone, Copy)]
pub struct InitiativeTable<'a> {
	pub tracker: &'a Tracker,
	pub draft: &'a Agent,
	pub bestiary: &'a Bestiary,
	pub generation: u32,
}

impl Component for InitiativeTable<'_> {
	fn render(&self) -> Node<Message> {
		let rows = TrackerRows {
			tracker: self.tracker,
			draft: self.draft,
			bestiary: self.bestiary,
			generation: self.generation,
		};
		Element::new("table")
			.class("initiative")
			.child(Element::new("thead").child(Headers.render()))
			.child(Element::new("tbody").child(rows.render()))
			.into()
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Headers;

impl Component for Headers {
	fn render(&self) -> Node<Message> {
		Element::new("tr")
			.child(Element::new("th").text("Creature"))
			.children(Property::ALL.iter().map(|property| Element::new("th").text(property.label()).into()))
			.into()
	}
}

/// Tracked agents in initiative order, then the draft row. Keyed by row.
#[derive(Debug, Clone, Copy)]
pub struct TrackerRows<'a> {
	pub tracker: &'a Tracker,
	pub draft: &'a Agent,
	pub bestiary: &'a Bestiary,
	pub generation: u32,
}

impl Component for TrackerRows<'_> {
	fn render(&self) -> Node<Message> {
		let tracked = self.tracker.index().into_iter().filter_map(|agent| agent.id.map(|id| (RowRef::Tracked(id), agent)));
		Node::Keyed(
			tracked
				.chain(Some((RowRef::Draft, self.draft)))
				.map(|(row, agent)| Fragment {
					dom_key: row.dom_key(self.generation),
					content: AgentRow {
						row,
						agent,
						bestiary: self.bestiary,
					}
					.render(),
				})
				.collect(),
		)
	}
}
