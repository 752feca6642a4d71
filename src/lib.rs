#![doc(html_root_url = "https://docs.rs/initiative-tracker/0.0.3")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod abilities;
pub mod agent;
pub mod app;
pub mod components;
pub mod config;
pub mod creatures;
pub mod dice;
pub mod diff;
pub mod load;
pub mod persistence;
pub mod runtime;
pub mod tracker;
pub mod vdom;

pub use app::{App, AppError, Context};
pub use components::{Component, Message, RowRef};
pub use config::Config;
pub use runtime::{mount, run};
