//! Tab snapshot file standing in for the browser.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tabkeep::{LiveTab, TabSnapshot, WindowId};

use crate::error::{CliError, Result};
use crate::file_store::save_json;

/// On-disk form of a [`TabSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
	#[serde(default)]
	pub tabs: Vec<LiveTab>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub focused_window_id: Option<WindowId>,
}

impl SnapshotFile {
	/// Reads the snapshot at `path`; a missing file is an empty browser.
	pub fn load(path: &Path) -> Result<Self> {
		match fs::read_to_string(path) {
			Ok(content) => serde_json::from_str(&content).map_err(|source| CliError::InvalidInput {
				kind: "tab snapshot",
				source,
			}),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
			Err(source) => Err(CliError::File {
				path: path.to_path_buf(),
				source,
			}),
		}
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		save_json(path, self).map_err(|source| CliError::File {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn into_snapshot(self) -> TabSnapshot {
		TabSnapshot::from_parts(self.tabs, self.focused_window_id)
	}

	pub fn from_snapshot(snapshot: &TabSnapshot) -> Self {
		Self {
			tabs: snapshot.tabs(),
			focused_window_id: snapshot.focused_window(),
		}
	}
}
