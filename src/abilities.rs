use crate::creatures::StatBlock;

/// The six ability scores, in the order stat blocks list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
	Strength,
	Dexterity,
	Constitution,
	Intelligence,
	Wisdom,
	Charisma,
}

impl Ability {
	pub const ALL: [Ability; 6] = [
		Ability::Strength,
		Ability::Dexterity,
		Ability::Constitution,
		Ability::Intelligence,
		Ability::Wisdom,
		Ability::Charisma,
	];

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Ability::Strength => "Strength",
			Ability::Dexterity => "Dexterity",
			Ability::Constitution => "Constitution",
			Ability::Intelligence => "Intelligence",
			Ability::Wisdom => "Wisdom",
			Ability::Charisma => "Charisma",
		}
	}

	#[must_use]
	pub fn abbreviation(self) -> &'static str {
		match self {
			Ability::Strength => "STR",
			Ability::Dexterity => "DEX",
			Ability::Constitution => "CON",
			Ability::Intelligence => "INT",
			Ability::Wisdom => "WIS",
			Ability::Charisma => "CHA",
		}
	}

	/// The raw score `block` lists for this ability.
	#[must_use]
	pub fn score(self, block: &StatBlock) -> i32 {
		match self {
			Ability::Strength => block.strength,
			Ability::Dexterity => block.dexterity,
			Ability::Constitution => block.constitution,
			Ability::Intelligence => block.intelligence,
			Ability::Wisdom => block.wisdom,
			Ability::Charisma => block.charisma,
		}
	}

	/// The saving throw bonus `block` lists for this ability, if it is proficient.
	#[must_use]
	pub fn saving_throw(self, block: &StatBlock) -> Option<i32> {
		match self {
			Ability::Strength => block.strength_save,
			Ability::Dexterity => block.dexterity_save,
			Ability::Constitution => block.constitution_save,
			Ability::Intelligence => block.intelligence_save,
			Ability::Wisdom => block.wisdom_save,
			Ability::Charisma => block.charisma_save,
		}
	}
}
