/// Startup settings. Built once and moved into the [`Context`](`crate::app::Context`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// `id` of the element the app renders into.
	pub mount_id: String,
	/// Local storage key holding the saved table.
	pub storage_key: String,
	/// Dice rolled for the initiative of each new blank row.
	pub initiative_dice: String,
	pub default_armor_class: i32,
	pub default_hit_points: i32,
	/// Recursion limit for the DOM differ.
	pub depth_limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			mount_id: "main".to_owned(),
			storage_key: "agents".to_owned(),
			initiative_dice: "1d20".to_owned(),
			default_armor_class: 10,
			default_hit_points: 0,
			depth_limit: 64,
		}
	}
}

impl Config {
	/// Applies overrides from the mount element's `data-*` attributes.
	///
	/// Only `data-storage-key` is recognised.
	#[must_use]
	pub fn with_dataset(mut self, storage_key: Option<String>) -> Self {
		if let Some(storage_key) = storage_key.filter(|key| !key.is_empty()) {
			self.storage_key = storage_key;
		}
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::default();
		assert_eq!(config.mount_id, "main");
		assert_eq!(config.storage_key, "agents");
		assert_eq!(config.initiative_dice, "1d20");
		assert_eq!(config.default_armor_class, 10);
	}

	#[test]
	fn dataset_overrides() {
		assert_eq!(Config::default().with_dataset(Some("encounter-2".to_owned())).storage_key, "encounter-2");
		assert_eq!(Config::default().with_dataset(Some(String::new())).storage_key, "agents");
		assert_eq!(Config::default().with_dataset(None).storage_key, "agents");
	}
}
