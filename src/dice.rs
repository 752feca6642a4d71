//! Dice notation (`NdM`), rolling and ability modifiers.

use rand::Rng;
use regex_lite::Regex;
use std::{fmt, sync::OnceLock};
use thiserror::Error;

static DICE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn dice_pattern() -> &'static Regex {
	DICE_PATTERN.get_or_init(|| Regex::new(r"^(\d+)d(\d+)").expect("valid dice pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
	#[error("not in `NdM` dice notation: {0:?}")]
	Malformed(String),
	#[error("dice count out of range in {0:?}")]
	InvalidCount(String),
	#[error("die size out of range in {0:?}")]
	InvalidSides(String),
}

/// A parsed `NdM` expression: roll `N` dice with `M` sides each.
///
/// Anything after the leading `NdM` is ignored, so `"1d20+2"` parses as `1d20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
	count: u32,
	sides: u32,
}

impl DiceExpr {
	pub fn parse(notation: &str) -> Result<Self, DiceError> {
		let captures = dice_pattern().captures(notation).ok_or_else(|| DiceError::Malformed(notation.to_owned()))?;

		let count: u32 = captures[1].parse().map_err(|_| DiceError::InvalidCount(notation.to_owned()))?;
		let sides: u32 = captures[2].parse().map_err(|_| DiceError::InvalidSides(notation.to_owned()))?;
		if count == 0 {
			return Err(DiceError::InvalidCount(notation.to_owned()));
		}
		if sides == 0 {
			return Err(DiceError::InvalidSides(notation.to_owned()));
		}
		Ok(Self { count, sides })
	}

	#[must_use]
	pub fn count(self) -> u32 {
		self.count
	}

	#[must_use]
	pub fn sides(self) -> u32 {
		self.sides
	}

	/// Sums [`count`](`DiceExpr::count`) independent uniform rolls in `1..=sides`.
	pub fn roll(self, rng: &mut impl Rng) -> i64 {
		(0..self.count).map(|_| i64::from(rng.gen_range(1..=self.sides))).sum()
	}
}

impl fmt::Display for DiceExpr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)
	}
}

/// Parses `notation` and rolls it once.
pub fn roll(notation: &str, rng: &mut impl Rng) -> Result<i64, DiceError> {
	Ok(DiceExpr::parse(notation)?.roll(rng))
}

/// `floor((score - 10) / 2)`.
#[must_use]
pub fn modifier(score: i32) -> i32 {
	(score - 10).div_euclid(2)
}
