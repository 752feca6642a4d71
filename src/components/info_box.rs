use super::{empty, Component, Message};
use crate::{
	abilities::Ability,
	creatures::{Feature, StatBlock},
	dice::modifier,
	vdom::{Element, Node},
};

/// The stat block of the last hovered row, if the bestiary knows its name.
#[derive(Debug, Clone, Copy)]
pub struct InfoBox<'a> {
	pub block: Option<&'a StatBlock>,
}

impl Component for InfoBox<'_> {
	fn render(&self) -> Node<Message> {
		let aside = Element::new("aside").class("info-box");
		let block = match self.block {
			Some(block) => block,
			None => return aside.child(Element::new("p").class("hint").text("Hover a row to show its stat block.")).into(),
		};

		aside
			.child(Element::new("h2").text(block.name.as_str()))
			.child(Element::new("p").class("description").text(block.description()))
			.child(ImageView { block }.render())
			.child(line("Armor Class", block.armor_class.to_string()))
			.child(line(
				"Hit Points",
				if block.hit_dice.is_empty() {
					block.hit_points.to_string()
				} else {
					format!("{} ({})", block.hit_points, block.hit_dice)
				},
			))
			.child(optional_line("Speed", &block.speed))
			.child(AbilityScoresBox { block }.render())
			.child(SavingThrowsBox { block }.render())
			.child(optional_line("Senses", &block.senses))
			.child(optional_line("Languages", &block.languages))
			.child(optional_line("Challenge", &block.challenge_rating))
			.child(features("special-abilities", None, &block.special_abilities))
			.child(features("actions", Some("Actions"), &block.actions))
			.child(features("legendary-actions", Some("Legendary Actions"), &block.legendary_actions))
			.into()
	}
}

fn line(label: &str, value: String) -> Node<Message> {
	Element::new("p").child(Element::new("strong").text(label)).text(format!(" {}", value)).into()
}

fn optional_line(label: &str, value: &str) -> Node<Message> {
	if value.is_empty() {
		empty()
	} else {
		line(label, value.to_owned())
	}
}

fn features(class: &'static str, heading: Option<&'static str>, features: &[Feature]) -> Node<Message> {
	if features.is_empty() {
		return empty();
	}
	let mut section = Element::new("section").class(class);
	if let Some(heading) = heading {
		section = section.child(Element::new("h3").text(heading));
	}
	section
		.children(features.iter().map(|feature| {
			Element::new("p")
				.child(Element::new("em").text(format!("{}.", feature.name)))
				.text(format!(" {}", feature.desc))
				.into()
		}))
		.into()
}

/// Scores with their modifiers, e.g. `14 (+2)`.
#[derive(Debug, Clone, Copy)]
pub struct AbilityScoresBox<'a> {
	pub block: &'a StatBlock,
}

impl Component for AbilityScoresBox<'_> {
	fn render(&self) -> Node<Message> {
		Element::new("table")
			.class("ability-scores")
			.child(Element::new("tr").children(Ability::ALL.iter().map(|ability| Element::new("th").text(ability.abbreviation()).into())))
			.child(Element::new("tr").children(Ability::ALL.iter().map(|ability| {
				let score = ability.score(self.block);
				Element::new("td").text(format!("{} ({:+})", score, modifier(score))).into()
			})))
			.into()
	}
}

/// Only proficient saves are listed. Renders nothing if there are none.
#[derive(Debug, Clone, Copy)]
pub struct SavingThrowsBox<'a> {
	pub block: &'a StatBlock,
}

impl Component for SavingThrowsBox<'_> {
	fn render(&self) -> Node<Message> {
		let saves: Vec<String> = Ability::ALL
			.iter()
			.filter_map(|ability| ability.saving_throw(self.block).map(|bonus| format!("{} {:+}", ability.abbreviation(), bonus)))
			.collect();
		if saves.is_empty() {
			return empty();
		}
		Element::new("p")
			.class("saving-throws")
			.child(Element::new("strong").text("Saving Throws"))
			.text(format!(" {}", saves.join(", ")))
			.into()
	}
}

#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
	pub block: &'a StatBlock,
}

impl Component for ImageView<'_> {
	fn render(&self) -> Node<Message> {
		match &self.block.image {
			Some(src) => Element::new("img").attribute("src", src.as_str()).attribute("alt", self.block.name.as_str()).into(),
			None => empty(),
		}
	}
}
