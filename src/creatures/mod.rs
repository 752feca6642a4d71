//! Creature stat blocks and the bundled bestiary.
//!
//! Lookups ([`Bestiary::find`]) never change the table.
//! Creating a record for an unknown name is a separate, explicit write ([`Bestiary::register_default`]).

use serde::Deserialize;
use tracing::{debug, info};

const BUNDLED: &str = include_str!("bestiary.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Feature {
	pub name: String,
	#[serde(default)]
	pub desc: String,
}

/// A read-only monster statistics record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatBlock {
	pub name: String,
	pub size: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub subtype: String,
	pub alignment: String,
	pub armor_class: i32,
	pub hit_points: i32,
	#[serde(default)]
	pub hit_dice: String,
	#[serde(default)]
	pub speed: String,
	pub strength: i32,
	pub dexterity: i32,
	pub constitution: i32,
	pub intelligence: i32,
	pub wisdom: i32,
	pub charisma: i32,
	#[serde(default)]
	pub strength_save: Option<i32>,
	#[serde(default)]
	pub dexterity_save: Option<i32>,
	#[serde(default)]
	pub constitution_save: Option<i32>,
	#[serde(default)]
	pub intelligence_save: Option<i32>,
	#[serde(default)]
	pub wisdom_save: Option<i32>,
	#[serde(default)]
	pub charisma_save: Option<i32>,
	#[serde(default)]
	pub senses: String,
	#[serde(default)]
	pub languages: String,
	#[serde(default)]
	pub challenge_rating: String,
	#[serde(default)]
	pub special_abilities: Vec<Feature>,
	#[serde(default)]
	pub actions: Vec<Feature>,
	#[serde(default)]
	pub legendary_actions: Vec<Feature>,
	#[serde(default)]
	pub image: Option<String>,
}

impl StatBlock {
	/// The template used for names the bestiary doesn't know.
	#[must_use]
	pub fn medium_humanoid(name: &str) -> Self {
		Self {
			name: name.to_owned(),
			size: "Medium".to_owned(),
			kind: "humanoid".to_owned(),
			subtype: "any race".to_owned(),
			alignment: "any alignment".to_owned(),
			armor_class: 10,
			hit_points: 4,
			hit_dice: "1d8".to_owned(),
			speed: "30 ft.".to_owned(),
			strength: 10,
			dexterity: 10,
			constitution: 10,
			intelligence: 10,
			wisdom: 10,
			charisma: 10,
			strength_save: None,
			dexterity_save: None,
			constitution_save: None,
			intelligence_save: None,
			wisdom_save: None,
			charisma_save: None,
			senses: "passive Perception 10".to_owned(),
			languages: "any one language (usually Common)".to_owned(),
			challenge_rating: "0".to_owned(),
			special_abilities: Vec::new(),
			actions: Vec::new(),
			legendary_actions: Vec::new(),
			image: None,
		}
	}

	/// `"Medium humanoid (goblinoid), neutral evil"`
	#[must_use]
	pub fn description(&self) -> String {
		let mut description = format!("{} {}", self.size, self.kind);
		if !self.subtype.is_empty() {
			description.push_str(" (");
			description.push_str(&self.subtype);
			description.push(')');
		}
		description.push_str(", ");
		description.push_str(&self.alignment);
		description
	}
}

#[derive(Debug, Clone, Default)]
pub struct Bestiary {
	records: Vec<StatBlock>,
}

impl Bestiary {
	#[must_use]
	pub fn new(records: Vec<StatBlock>) -> Self {
		Self { records }
	}

	/// Parses the table compiled into the crate.
	pub fn bundled() -> Result<Self, serde_json::Error> {
		let records: Vec<StatBlock> = serde_json::from_str(BUNDLED)?;
		info!("Loaded {} bundled stat block(s).", records.len());
		Ok(Self::new(records))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.records.iter().map(|record| record.name.as_str())
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.records.iter().position(|record| record.name == name)
	}

	/// The first record named `name`.
	#[must_use]
	pub fn find(&self, name: &str) -> Option<&StatBlock> {
		self.position(name).map(|i| &self.records[i])
	}

	/// Appends a [`StatBlock::medium_humanoid`] record named `name`.
	///
	/// This does not check for an existing record; see [`Bestiary::find_or_register`].
	pub fn register_default(&mut self, name: &str) -> &StatBlock {
		debug!("Registering default stat block.");
		self.records.push(StatBlock::medium_humanoid(name));
		&self.records[self.records.len() - 1]
	}

	/// [`find`](`Bestiary::find`), falling back to [`register_default`](`Bestiary::register_default`).
	///
	/// Repeated calls with the same unknown name grow the table only once.
	pub fn find_or_register(&mut self, name: &str) -> &StatBlock {
		match self.position(name) {
			Some(i) => &self.records[i],
			None => self.register_default(name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_table_parses() {
		let bestiary = Bestiary::bundled().unwrap();
		assert!(bestiary.len() >= 20);
		assert!(!bestiary.is_empty());
	}

	#[test]
	fn bundled_goblin() {
		let bestiary = Bestiary::bundled().unwrap();
		let goblin = bestiary.find("Goblin").unwrap();
		assert_eq!(goblin.armor_class, 15);
		assert_eq!(goblin.hit_points, 7);
		assert_eq!(goblin.dexterity, 14);
		assert_eq!(goblin.description(), "Small humanoid (goblinoid), neutral evil");
	}

	#[test]
	fn bundled_names_are_unique() {
		let bestiary = Bestiary::bundled().unwrap();
		let mut names: Vec<_> = bestiary.names().collect();
		let count = names.len();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), count);
	}

	#[test]
	fn find_does_not_create() {
		let bestiary = Bestiary::bundled().unwrap();
		let before = bestiary.len();
		assert!(bestiary.find("Bob the Bugbear").is_none());
		assert_eq!(bestiary.len(), before);
	}

	#[test]
	fn find_or_register_is_idempotent() {
		let mut bestiary = Bestiary::bundled().unwrap();
		let before = bestiary.len();

		let first = bestiary.find_or_register("Sir Reginald").clone();
		let second = bestiary.find_or_register("Sir Reginald").clone();

		assert_eq!(first, second);
		assert_eq!(first.size, "Medium");
		assert_eq!(first.kind, "humanoid");
		assert_eq!(bestiary.len(), before + 1);
		assert_eq!(bestiary.find("Sir Reginald"), Some(&first));
	}

	#[test]
	fn find_or_register_returns_existing() {
		let mut bestiary = Bestiary::bundled().unwrap();
		let before = bestiary.len();
		assert_eq!(bestiary.find_or_register("Ogre").hit_points, 59);
		assert_eq!(bestiary.len(), before);
	}

	#[test]
	fn register_default_always_appends() {
		let mut bestiary = Bestiary::default();
		bestiary.register_default("Guard");
		bestiary.register_default("Guard");
		assert_eq!(bestiary.len(), 2);
	}

	#[test]
	fn description_without_subtype() {
		let mut block = StatBlock::medium_humanoid("Thing");
		block.subtype.clear();
		assert_eq!(block.description(), "Medium humanoid, any alignment");
	}
}
