//! Default file locations.

use std::path::PathBuf;

/// Where the storage and tab snapshot files live.
///
/// Defaults follow XDG (`~/.local/share/tabkeep/`); explicit paths win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
	pub store: PathBuf,
	pub tabs: PathBuf,
}

impl DataPaths {
	pub fn new(store: Option<PathBuf>, tabs: Option<PathBuf>) -> Self {
		let data_dir = data_home().join("tabkeep");
		Self {
			store: store.unwrap_or_else(|| data_dir.join("storage.json")),
			tabs: tabs.unwrap_or_else(|| data_dir.join("tabs.json")),
		}
	}
}

fn data_home() -> PathBuf {
	std::env::var_os("XDG_DATA_HOME")
		.map(PathBuf::from)
		.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
		.unwrap_or_else(|| PathBuf::from("."))
}
