//! The in-memory collection of combatants for one encounter.

use crate::{
	agent::{Agent, AgentId},
	persistence::{Record, RecordError},
};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Tracker {
	agents: Vec<Agent>,
	serial: u32,
}

impl Default for Tracker {
	fn default() -> Self {
		Self::new()
	}
}

impl Tracker {
	#[must_use]
	pub fn new() -> Self {
		Self { agents: Vec::new(), serial: 1 }
	}

	/// The id the next added agent receives.
	#[must_use]
	pub fn serial(&self) -> u32 {
		self.serial
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.agents.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.agents.is_empty()
	}

	/// All agents, highest initiative first. Ties keep insertion order.
	#[must_use]
	pub fn index(&self) -> Vec<&Agent> {
		let mut index: Vec<&Agent> = self.agents.iter().collect();
		index.sort_by(|a, b| b.initiative.cmp(&a.initiative));
		index
	}

	#[must_use]
	pub fn get(&self, id: AgentId) -> Option<&Agent> {
		self.agents.iter().find(|agent| agent.id == Some(id))
	}

	pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
		self.agents.iter_mut().find(|agent| agent.id == Some(id))
	}

	/// Adds `agent` unless it is already tracked here, and returns its id.
	///
	/// An agent that is already tracked is left as it is: change it through [`get_mut`](`Tracker::get_mut`).
	pub fn upsert(&mut self, agent: Agent) -> AgentId {
		match agent.id {
			Some(id) if self.get(id).is_some() => {
				trace!(%id, "Agent already tracked.");
				id
			}
			_ => self.add(agent),
		}
	}

	fn add(&mut self, mut agent: Agent) -> AgentId {
		let id = AgentId(self.serial);
		self.serial += 1;
		agent.id = Some(id);
		self.agents.push(agent);
		id
	}

	/// Adds one agent per record, each with a fresh id.
	///
	/// All records are parsed before anything is added, so a malformed record leaves the tracker unchanged.
	pub fn load<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) -> Result<(), RecordError> {
		let agents = records.into_iter().map(Record::to_agent).collect::<Result<Vec<_>, _>>()?;
		debug!("Loading {} agent(s).", agents.len());
		for agent in agents {
			self.add(agent);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::persistence::Numeric;

	fn record(name: &str, initiative: &str, ac: &str, hp: &str) -> Record {
		Record {
			name: name.to_owned(),
			initiative: Numeric::Text(initiative.to_owned()),
			ac: Numeric::Text(ac.to_owned()),
			hp: Numeric::Text(hp.to_owned()),
			status: String::new(),
		}
	}

	#[test]
	fn load_goblin_and_ogre() {
		let mut tracker = Tracker::new();
		assert_eq!(tracker.serial(), 1);
		tracker.load(&[record("Goblin", "15", "15", "7"), record("Ogre", "8", "11", "59")]).unwrap();

		let index = tracker.index();
		assert_eq!(index.len(), 2);
		assert_eq!((index[0].name.as_str(), index[0].id), ("Goblin", Some(AgentId(1))));
		assert_eq!((index[1].name.as_str(), index[1].id), ("Ogre", Some(AgentId(2))));
		assert_eq!((index[1].initiative, index[1].ac, index[1].hp), (8, 11, 59));
	}

	#[test]
	fn index_sorts_descending() {
		let mut tracker = Tracker::new();
		let records: Vec<_> = [3, 17, -2, 17, 9, 0, 12].iter().enumerate().map(|(i, initiative)| record(&format!("A{}", i), &initiative.to_string(), "10", "1")).collect();
		tracker.load(&records).unwrap();

		let index = tracker.index();
		assert_eq!(index.len(), records.len());
		assert!(index.windows(2).all(|pair| pair[0].initiative >= pair[1].initiative));
		// Stable on ties.
		assert_eq!(index[0].name, "A1");
		assert_eq!(index[1].name, "A3");
	}

	#[test]
	fn ids_are_sequential_and_distinct() {
		let mut tracker = Tracker::new();
		let start = tracker.serial();
		let ids: Vec<_> = (0..5).map(|i| tracker.upsert(Agent::new(format!("A{}", i), i, 10, 1))).collect();
		tracker.load(&[record("B", "1", "1", "1")]).unwrap();
		let all: Vec<_> = tracker.index().iter().filter_map(|agent| agent.id).collect();

		assert_eq!(ids, (0..5).map(|n| AgentId(start + n)).collect::<Vec<_>>());
		assert_eq!(tracker.get(AgentId(start + 5)).map(|agent| agent.name.as_str()), Some("B"));
		let mut deduped = all.clone();
		deduped.sort_unstable();
		deduped.dedup();
		assert_eq!(deduped.len(), all.len());
	}

	#[test]
	fn upsert_ignores_tracked_agents() {
		let mut tracker = Tracker::new();
		let id = tracker.upsert(Agent::new("Goblin", 12, 15, 7));
		let mut copy = tracker.get(id).unwrap().clone();
		copy.hp = 1;

		assert_eq!(tracker.upsert(copy), id);
		assert_eq!(tracker.len(), 1);
		assert_eq!(tracker.get(id).unwrap().hp, 7);
	}

	#[test]
	fn upsert_adds_agents_with_foreign_ids() {
		let mut tracker = Tracker::new();
		let mut agent = Agent::new("Stray", 1, 1, 1);
		agent.id = Some(AgentId(99));
		assert_eq!(tracker.upsert(agent), AgentId(1));
	}

	#[test]
	fn get_mut_edits_in_place() {
		let mut tracker = Tracker::new();
		let id = tracker.upsert(Agent::new("Goblin", 12, 15, 7));
		tracker.get_mut(id).unwrap().initiative = 30;
		assert_eq!(tracker.index()[0].initiative, 30);
	}

	#[test]
	fn load_is_all_or_nothing() {
		let mut tracker = Tracker::new();
		let error = tracker.load(&[record("Goblin", "15", "15", "7"), record("Ogre", "fast", "11", "59")]);
		assert!(error.is_err());
		assert!(tracker.is_empty());
		assert_eq!(tracker.serial(), 1);
	}
}
