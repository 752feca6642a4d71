//! Application state and its update rules.

use crate::{
	agent::{Agent, AgentError, AgentId},
	components::{ButtonBar, Component, InfoBox, InitiativeTable, Message, RowRef},
	config::Config,
	creatures::{Bestiary, StatBlock},
	dice::DiceError,
	persistence::{self, KeyValueStore, PersistenceError},
	tracker::Tracker,
	vdom::Node,
};
use rand::rngs::StdRng;
use std::{fmt, mem};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Everything the app needs from the outside, built once at startup.
pub struct Context {
	pub config: Config,
	pub bestiary: Bestiary,
	pub store: Box<dyn KeyValueStore>,
	pub rng: StdRng,
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("config", &self.config)
			.field("bestiary", &self.bestiary.len())
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Dice(#[from] DiceError),
	#[error(transparent)]
	Agent(#[from] AgentError),
	#[error(transparent)]
	Persistence(#[from] PersistenceError),
	#[error("bundled bestiary is malformed")]
	Bestiary(#[from] serde_json::Error),
	#[error("no agent with id {0}")]
	UnknownAgent(AgentId),
	#[error("can't mount: {0}")]
	Mount(String),
}

impl AppError {
	/// The variant name, for logs that mustn't contain table content.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			AppError::Dice(_) => "Dice",
			AppError::Agent(_) => "Agent",
			AppError::Persistence(_) => "Persistence",
			AppError::Bestiary(_) => "Bestiary",
			AppError::UnknownAgent(_) => "UnknownAgent",
			AppError::Mount(_) => "Mount",
		}
	}
}

#[derive(Debug)]
pub struct App {
	context: Context,
	tracker: Tracker,
	/// Always shown below the tracked rows.
	draft: Agent,
	/// Name of the last hovered row.
	hovered: Option<String>,
	/// Incremented whenever `tracker` is replaced.
	generation: u32,
}

impl App {
	pub fn new(mut context: Context) -> Result<Self, AppError> {
		let draft = Agent::new_rolled(&context.config, &mut context.rng)?;
		Ok(Self {
			context,
			tracker: Tracker::new(),
			draft,
			hovered: None,
			generation: 0,
		})
	}

	#[must_use]
	pub fn context(&self) -> &Context {
		&self.context
	}

	#[must_use]
	pub fn tracker(&self) -> &Tracker {
		&self.tracker
	}

	#[must_use]
	pub fn draft(&self) -> &Agent {
		&self.draft
	}

	/// The stat block the info box shows.
	#[must_use]
	pub fn hovered(&self) -> Option<&StatBlock> {
		self.hovered.as_deref().and_then(|name| self.context.bestiary.find(name))
	}

	fn agent(&self, row: RowRef) -> Result<&Agent, AppError> {
		match row {
			RowRef::Draft => Ok(&self.draft),
			RowRef::Tracked(id) => self.tracker.get(id).ok_or(AppError::UnknownAgent(id)),
		}
	}

	fn agent_mut(&mut self, row: RowRef) -> Result<&mut Agent, AppError> {
		match row {
			RowRef::Draft => Ok(&mut self.draft),
			RowRef::Tracked(id) => self.tracker.get_mut(id).ok_or(AppError::UnknownAgent(id)),
		}
	}

	/// Moves an edited draft into the tracker and rolls a new one.
	fn promote(&mut self, row: RowRef) -> Result<(), AppError> {
		if row == RowRef::Draft {
			let fresh = Agent::new_rolled(&self.context.config, &mut self.context.rng)?;
			let id = self.tracker.upsert(mem::replace(&mut self.draft, fresh));
			debug!(%id, "Draft row joined the tracker.");
		}
		Ok(())
	}

	/// Applies `message`. On error, the table is left as it was before the message.
	#[instrument(skip(self, message), fields(message = message.kind()))]
	pub fn update(&mut self, message: Message) -> Result<(), AppError> {
		#[cfg(feature = "dangerous-logging")]
		debug!(?message, "Updating.");

		match message {
			Message::Edit { row, property, value } => {
				self.agent_mut(row)?.set_property(property, &value)?;
				self.promote(row)?;
			}

			Message::SelectCreature { row, name } => {
				let name = name.trim();
				if name.is_empty() {
					debug!("Ignoring blank creature selection.");
					return Ok(());
				}
				let previous = self.context.bestiary.find(&self.agent(row)?.name).cloned();
				let block = self.context.bestiary.find_or_register(name).clone();
				self.agent_mut(row)?.apply_stat_block(&block, previous.as_ref());
				self.promote(row)?;
			}

			Message::Hover(row) => self.hovered = Some(self.agent(row)?.name.clone()),

			Message::Save => persistence::save(self.context.store.as_mut(), &self.context.config.storage_key, &self.tracker)?,

			Message::Load => {
				let tracker = persistence::load(self.context.store.as_ref(), &self.context.config.storage_key)?;
				let draft = Agent::new_rolled(&self.context.config, &mut self.context.rng)?;
				self.tracker = tracker;
				self.draft = draft;
				self.hovered = None;
				self.generation = self.generation.wrapping_add(1);
				info!("Replaced the table with {} loaded agent(s).", self.tracker.len());
			}
		}
		Ok(())
	}

	/// Toolbar, table and info box.
	#[must_use]
	pub fn render(&self) -> Vec<Node<Message>> {
		let table = InitiativeTable {
			tracker: &self.tracker,
			draft: &self.draft,
			bestiary: &self.context.bestiary,
			generation: self.generation,
		};
		vec![ButtonBar.render(), table.render(), InfoBox { block: self.hovered() }.render()]
	}
}
