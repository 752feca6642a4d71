use crate::{
	config::Config,
	creatures::StatBlock,
	dice::{self, DiceError},
};
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// Assigned by a [`Tracker`](`crate::tracker::Tracker`) on insertion. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// One editable column of the initiative table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
	Name,
	Initiative,
	ArmorClass,
	HitPoints,
	Status,
}

impl Property {
	pub const ALL: [Property; 5] = [Property::Name, Property::Initiative, Property::ArmorClass, Property::HitPoints, Property::Status];

	#[must_use]
	pub fn label(self) -> &'static str {
		match self {
			Property::Name => "Name",
			Property::Initiative => "Init",
			Property::ArmorClass => "AC",
			Property::HitPoints => "HP",
			Property::Status => "Status",
		}
	}

	#[must_use]
	pub fn is_numeric(self) -> bool {
		matches!(self, Property::Initiative | Property::ArmorClass | Property::HitPoints)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
	#[error("{property:?} expects a number, found {text:?}")]
	InvalidNumber { property: Property, text: String },
}

/// One combatant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
	pub id: Option<AgentId>,
	pub name: String,
	pub initiative: i32,
	pub ac: i32,
	pub hp: i32,
	pub status: String,
}

impl Agent {
	#[must_use]
	pub fn new(name: impl Into<String>, initiative: i32, ac: i32, hp: i32) -> Self {
		Self {
			id: None,
			name: name.into(),
			initiative,
			ac,
			hp,
			status: String::new(),
		}
	}

	/// A blank row with a freshly rolled initiative and the configured defaults.
	pub fn new_rolled(config: &Config, rng: &mut impl Rng) -> Result<Self, DiceError> {
		let initiative = dice::roll(&config.initiative_dice, rng)?;
		Ok(Self::new(String::new(), saturate(initiative), config.default_armor_class, config.default_hit_points))
	}

	#[must_use]
	pub fn is_killed(&self) -> bool {
		self.hp < 0
	}

	/// The current value of `property`, as a table cell shows it.
	#[must_use]
	pub fn property(&self, property: Property) -> String {
		match property {
			Property::Name => self.name.clone(),
			Property::Initiative => self.initiative.to_string(),
			Property::ArmorClass => self.ac.to_string(),
			Property::HitPoints => self.hp.to_string(),
			Property::Status => self.status.clone(),
		}
	}

	/// Commits an edited cell.
	///
	/// On error, the agent is left unchanged.
	pub fn set_property(&mut self, property: Property, text: &str) -> Result<(), AgentError> {
		let text = text.trim();
		match property {
			Property::Name => self.name = text.to_owned(),
			Property::Status => self.status = text.to_owned(),
			Property::Initiative | Property::ArmorClass | Property::HitPoints => {
				let value = parse_leading_int(text).ok_or_else(|| AgentError::InvalidNumber { property, text: text.to_owned() })?;
				match property {
					Property::Initiative => self.initiative = value,
					Property::ArmorClass => self.ac = value,
					_ => self.hp = value,
				}
			}
		}
		Ok(())
	}

	/// Fills this row from a creature's stat block.
	///
	/// `initiative` keeps its rolled part: only the difference between the new creature's
	/// dexterity modifier and that of `previous` (the creature this row showed before) is added.
	pub fn apply_stat_block(&mut self, block: &StatBlock, previous: Option<&StatBlock>) {
		let old_bonus = previous.map_or(0, |previous| dice::modifier(previous.dexterity));
		self.name = block.name.clone();
		self.initiative = self.initiative.saturating_add(dice::modifier(block.dexterity) - old_bonus);
		self.ac = block.armor_class;
		self.hp = block.hit_points;
	}
}

fn saturate(value: i64) -> i32 {
	i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Like JavaScript's `parseInt(text, 10)`: an optional sign and the digits that follow, ignoring any rest.
pub(crate) fn parse_leading_int(text: &str) -> Option<i32> {
	let text = text.trim_start();
	let (negative, digits) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};
	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
	if end == 0 {
		return None;
	}
	let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
	Some(saturate(if negative { -magnitude } else { magnitude }))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	fn killed_only_below_zero() {
		let mut agent = Agent::new("Goblin", 12, 15, 1);
		assert!(!agent.is_killed());
		agent.hp = 0;
		assert!(!agent.is_killed());
		agent.hp = -1;
		assert!(agent.is_killed());
	}

	#[test]
	fn rolled_defaults() {
		let config = Config::default();
		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..100 {
			let agent = Agent::new_rolled(&config, &mut rng).unwrap();
			assert!((1..=20).contains(&agent.initiative));
			assert_eq!((agent.ac, agent.hp), (10, 0));
			assert_eq!(agent.id, None);
			assert!(agent.name.is_empty() && agent.status.is_empty());
		}
	}

	#[test]
	fn rolled_with_bad_dice() {
		let config = Config {
			initiative_dice: "twenty".to_owned(),
			..Config::default()
		};
		let mut rng = StdRng::seed_from_u64(1);
		assert!(Agent::new_rolled(&config, &mut rng).is_err());
	}

	#[test]
	fn set_property_parses_numbers_like_parse_int() {
		let mut agent = Agent::new("Orc", 10, 13, 15);
		agent.set_property(Property::HitPoints, " 7\n").unwrap();
		agent.set_property(Property::ArmorClass, "16 (shield)").unwrap();
		agent.set_property(Property::Initiative, "-3").unwrap();
		assert_eq!((agent.initiative, agent.ac, agent.hp), (-3, 16, 7));
	}

	#[test]
	fn set_property_rejects_non_numbers() {
		let mut agent = Agent::new("Orc", 10, 13, 15);
		let error = agent.set_property(Property::HitPoints, "lots").unwrap_err();
		assert_eq!(
			error,
			AgentError::InvalidNumber {
				property: Property::HitPoints,
				text: "lots".to_owned()
			}
		);
		assert_eq!(agent.hp, 15);
		assert!(agent.set_property(Property::Initiative, "").is_err());
		assert!(agent.set_property(Property::Initiative, "-").is_err());
	}

	#[test]
	fn set_property_trims_text() {
		let mut agent = Agent::new("", 10, 10, 0);
		agent.set_property(Property::Name, "  Grok \n").unwrap();
		agent.set_property(Property::Status, "prone").unwrap();
		assert_eq!(agent.name, "Grok");
		assert_eq!(agent.property(Property::Status), "prone");
		assert_eq!(agent.property(Property::Initiative), "10");
	}

	#[test]
	fn apply_stat_block_adds_dexterity_delta() {
		let mut goblin = StatBlock::medium_humanoid("Goblin");
		goblin.dexterity = 14;
		goblin.armor_class = 15;
		goblin.hit_points = 7;
		let mut ogre = StatBlock::medium_humanoid("Ogre");
		ogre.dexterity = 8;
		ogre.armor_class = 11;
		ogre.hit_points = 59;

		let mut agent = Agent::new("", 10, 10, 0);
		agent.apply_stat_block(&goblin, None);
		assert_eq!((agent.name.as_str(), agent.initiative, agent.ac, agent.hp), ("Goblin", 12, 15, 7));

		agent.apply_stat_block(&ogre, Some(&goblin));
		assert_eq!((agent.name.as_str(), agent.initiative, agent.ac, agent.hp), ("Ogre", 9, 11, 59));
	}

	#[test]
	fn leading_int() {
		assert_eq!(parse_leading_int("42"), Some(42));
		assert_eq!(parse_leading_int("+5"), Some(5));
		assert_eq!(parse_leading_int("12abc"), Some(12));
		assert_eq!(parse_leading_int("abc12"), None);
		assert_eq!(parse_leading_int("99999999999"), Some(i32::MAX));
		assert_eq!(parse_leading_int("-99999999999"), Some(i32::MIN));
	}
}
