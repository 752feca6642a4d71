//! Saving and loading the table through a string key-value store.
//!
//! The stored value is a JSON array of [`Record`]s without any version tag.
//! Two tabs saving to the same key overwrite each other.

use crate::{
	agent::{parse_leading_int, Agent},
	tracker::Tracker,
};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};
use wasm_bindgen::JsValue;

/// A numeric column as stored.
///
/// Older saves hold the cell text instead of a number, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
	Number(i64),
	Text(String),
}

impl Numeric {
	fn parse(&self, field: &'static str) -> Result<i32, RecordError> {
		match self {
			Numeric::Number(number) => i32::try_from(*number).map_err(|_| RecordError {
				field,
				value: number.to_string(),
			}),
			Numeric::Text(text) => parse_leading_int(text).ok_or_else(|| RecordError { field, value: text.clone() }),
		}
	}
}

impl From<i32> for Numeric {
	fn from(value: i32) -> Self {
		Numeric::Number(value.into())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed `{field}` in saved record: {value:?}")]
pub struct RecordError {
	pub field: &'static str,
	pub value: String,
}

/// The persisted shape of an [`Agent`]. Ids are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
	#[serde(default)]
	pub name: String,
	pub initiative: Numeric,
	pub ac: Numeric,
	pub hp: Numeric,
	#[serde(default)]
	pub status: String,
}

impl Record {
	pub fn to_agent(&self) -> Result<Agent, RecordError> {
		let mut agent = Agent::new(self.name.clone(), self.initiative.parse("initiative")?, self.ac.parse("ac")?, self.hp.parse("hp")?);
		agent.status = self.status.clone();
		Ok(agent)
	}
}

impl From<&Agent> for Record {
	fn from(agent: &Agent) -> Self {
		Self {
			name: agent.name.clone(),
			initiative: agent.initiative.into(),
			ac: agent.ac.into(),
			hp: agent.hp.into(),
			status: agent.status.clone(),
		}
	}
}

#[derive(Debug, Error)]
pub enum PersistenceError {
	#[error("nothing saved under {0:?}")]
	Missing(String),
	#[error("saved table is not valid JSON")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Record(#[from] RecordError),
	#[error("storage unavailable: {0}")]
	Storage(String),
}

/// A string key-value store such as the browser's local storage.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// An in-process store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
		Ok(self.0.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
		self.0.insert(key.to_owned(), value.to_owned());
		Ok(())
	}
}

/// `window.localStorage`.
pub struct LocalStorage(web_sys::Storage);

impl fmt::Debug for LocalStorage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("LocalStorage").finish()
	}
}

impl LocalStorage {
	pub fn from_window(window: &web_sys::Window) -> Result<Self, PersistenceError> {
		match window.local_storage() {
			Ok(Some(storage)) => Ok(Self(storage)),
			Ok(None) => Err(PersistenceError::Storage("`window.localStorage` is not available".to_owned())),
			Err(error) => Err(storage_error(&error)),
		}
	}
}

impl KeyValueStore for LocalStorage {
	fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
		self.0.get_item(key).map_err(|error| storage_error(&error))
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
		self.0.set_item(key, value).map_err(|error| storage_error(&error))
	}
}

fn storage_error(error: &JsValue) -> PersistenceError {
	PersistenceError::Storage(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
}

/// Stores `tracker`'s agents in initiative order under `key`.
#[instrument(skip(store, tracker), fields(agents = tracker.len()))]
pub fn save(store: &mut dyn KeyValueStore, key: &str, tracker: &Tracker) -> Result<(), PersistenceError> {
	let records: Vec<Record> = tracker.index().into_iter().map(Record::from).collect();
	let json = serde_json::to_string(&records)?;
	store.set(key, &json)?;
	info!("Saved {} agent(s).", records.len());
	Ok(())
}

/// Rebuilds a fresh [`Tracker`] from what [`save`] stored under `key`.
#[instrument(skip(store))]
pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Tracker, PersistenceError> {
	let json = store.get(key)?.ok_or_else(|| PersistenceError::Missing(key.to_owned()))?;
	let records: Vec<Record> = serde_json::from_str(&json).map_err(|error| {
		warn!("Saved table under {:?} doesn't parse.", key);
		error
	})?;
	let mut tracker = Tracker::new();
	tracker.load(&records)?;
	info!("Loaded {} agent(s).", tracker.len());
	Ok(tracker)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Tracker {
		let mut tracker = Tracker::new();
		tracker.upsert(Agent::new("Ogre", 8, 11, 59));
		let mut goblin = Agent::new("Goblin", 15, 15, -2);
		goblin.status = "bloodied, prone".to_owned();
		tracker.upsert(goblin);
		tracker
	}

	fn values(tracker: &Tracker) -> Vec<(String, i32, i32, i32, String)> {
		tracker.index().into_iter().map(|agent| (agent.name.clone(), agent.initiative, agent.ac, agent.hp, agent.status.clone())).collect()
	}

	#[test]
	fn round_trip() {
		let mut store = MemoryStore::new();
		let tracker = sample();
		save(&mut store, "agents", &tracker).unwrap();
		let loaded = load(&store, "agents").unwrap();
		assert_eq!(values(&loaded), values(&tracker));
	}

	#[test]
	fn saves_in_initiative_order_as_numbers() {
		let mut store = MemoryStore::new();
		save(&mut store, "agents", &sample()).unwrap();
		let json = store.get("agents").unwrap().unwrap();
		assert_eq!(
			json,
			r#"[{"name":"Goblin","initiative":15,"ac":15,"hp":-2,"status":"bloodied, prone"},{"name":"Ogre","initiative":8,"ac":11,"hp":59,"status":""}]"#
		);
	}

	#[test]
	fn loads_string_fields() {
		let mut store = MemoryStore::new();
		store
			.set(
				"agents",
				r#"[{"name":"Goblin","initiative":"15","ac":"15","hp":"7","status":""},{"name":"Ogre","initiative":"8","ac":"11","hp":"59","status":""}]"#,
			)
			.unwrap();
		let tracker = load(&store, "agents").unwrap();
		let index = tracker.index();
		assert_eq!(index[0].name, "Goblin");
		assert_eq!(index[1].hp, 59);
	}

	#[test]
	fn missing_key() {
		let store = MemoryStore::new();
		assert!(matches!(load(&store, "agents"), Err(PersistenceError::Missing(key)) if key == "agents"));
	}

	#[test]
	fn malformed_json() {
		let mut store = MemoryStore::new();
		store.set("agents", "[{").unwrap();
		assert!(matches!(load(&store, "agents"), Err(PersistenceError::Json(_))));
	}

	#[test]
	fn malformed_number() {
		let mut store = MemoryStore::new();
		store.set("agents", r#"[{"name":"Goblin","initiative":"soon","ac":15,"hp":7}]"#).unwrap();
		match load(&store, "agents") {
			Err(PersistenceError::Record(RecordError { field, value })) => assert_eq!((field, value.as_str()), ("initiative", "soon")),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn keys_are_separate() {
		let mut store = MemoryStore::new();
		save(&mut store, "one", &sample()).unwrap();
		assert!(load(&store, "two").is_err());
		assert_eq!(load(&store, "one").unwrap().len(), 2);
	}
}
