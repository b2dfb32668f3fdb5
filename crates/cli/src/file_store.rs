//! JSON file storage backend.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tabkeep::{Error, StorageBackend};
use tracing::warn;

/// `storage.local`-shaped key-value map persisted as one JSON object.
#[derive(Debug, Clone)]
pub struct FileStorage {
	path: PathBuf,
}

impl FileStorage {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn load(&self) -> tabkeep::Result<Map<String, Value>> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
			Err(err) => return Err(storage_error(&self.path, err)),
		};

		match serde_json::from_str(&content) {
			Ok(Value::Object(map)) => Ok(map),
			Ok(_) | Err(_) => {
				warn!(target = "tabkeep.cli", path = %self.path.display(), "storage file is not a JSON object, starting fresh");
				Ok(Map::new())
			}
		}
	}

	fn save(&self, map: &Map<String, Value>) -> tabkeep::Result<()> {
		save_json(&self.path, map).map_err(|err| storage_error(&self.path, err))
	}
}

#[async_trait(?Send)]
impl StorageBackend for FileStorage {
	async fn get(&self, key: &str) -> tabkeep::Result<Option<Value>> {
		Ok(self.load()?.remove(key))
	}

	async fn set(&self, key: &str, value: Value) -> tabkeep::Result<()> {
		let mut map = self.load()?;
		map.insert(key.to_string(), value);
		self.save(&map)
	}
}

pub(crate) fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, serde_json::to_string_pretty(data)?)
}

fn storage_error(path: &Path, err: std::io::Error) -> Error {
	Error::Storage(format!("{}: {err}", path.display()))
}
