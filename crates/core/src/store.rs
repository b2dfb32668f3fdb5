//! Persisted saved-tab list.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tabkeep_protocol::SavedEntry;
use tracing::{debug, trace, warn};

use crate::error::Result;

/// Key the saved list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "savedTabs";

/// Durable key-value storage holding JSON values, shaped like `storage.local`.
#[async_trait(?Send)]
pub trait StorageBackend {
	/// Value stored under `key`, or `None` if absent.
	async fn get(&self, key: &str) -> Result<Option<Value>>;

	async fn set(&self, key: &str, value: Value) -> Result<()>;
}

#[async_trait(?Send)]
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		(**self).get(key).await
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		(**self).set(key, value).await
	}
}

/// Reader/writer for the saved list under a single key.
///
/// Reads never fail: absent, non-array or undecodable values read as an empty
/// list. Writes are skipped when the list equals what is already stored, so a
/// storage-change listener that writes back cannot loop.
#[derive(Debug)]
pub struct SavedStore<B> {
	backend: B,
	key: String,
}

impl<B: StorageBackend> SavedStore<B> {
	pub fn new(backend: B) -> Self {
		Self::with_key(backend, DEFAULT_STORAGE_KEY)
	}

	pub fn with_key(backend: B, key: impl Into<String>) -> Self {
		Self {
			backend,
			key: key.into(),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Returns the stored list, or an empty one.
	pub async fn read(&self) -> Vec<SavedEntry> {
		match self.backend.get(&self.key).await {
			Ok(Some(value)) => decode(&self.key, value),
			Ok(None) => Vec::new(),
			Err(err) => {
				warn!(target = "tabkeep.store", key = %self.key, error = %err, "read failed, using empty list");
				Vec::new()
			}
		}
	}

	/// Persists `list` unless it equals the stored list.
	///
	/// Returns whether a write reached the backend.
	pub async fn write(&self, list: &[SavedEntry]) -> Result<bool> {
		let current = self.read().await;
		if current.as_slice() == list {
			trace!(target = "tabkeep.store", key = %self.key, "unchanged, write skipped");
			return Ok(false);
		}

		self.backend.set(&self.key, serde_json::to_value(list)?).await?;
		debug!(target = "tabkeep.store", key = %self.key, entries = list.len(), "saved list written");
		Ok(true)
	}
}

fn decode(key: &str, value: Value) -> Vec<SavedEntry> {
	if !value.is_array() {
		debug!(target = "tabkeep.store", key, "stored value is not an array, treating as empty");
		return Vec::new();
	}

	serde_json::from_value(value).unwrap_or_else(|err| {
		warn!(target = "tabkeep.store", key, error = %err, "malformed saved list, treating as empty");
		Vec::new()
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::error::Error;
	use crate::memory::MemoryStorage;

	fn entry(tab_id: i32, index: u32) -> SavedEntry {
		SavedEntry {
			tab_id,
			window_id: 1,
			url: format!("https://example.com/{tab_id}"),
			title: format!("Tab {tab_id}"),
			fav_icon_url: None,
			index,
			saved_at: 1_000,
			auto_repointed: false,
		}
	}

	struct BrokenStorage;

	#[async_trait(?Send)]
	impl StorageBackend for BrokenStorage {
		async fn get(&self, _key: &str) -> Result<Option<Value>> {
			Err(Error::Storage("quota exceeded".into()))
		}

		async fn set(&self, _key: &str, _value: Value) -> Result<()> {
			Err(Error::Storage("quota exceeded".into()))
		}
	}

	#[tokio::test]
	async fn read_absent_key_is_empty() {
		let store = SavedStore::new(MemoryStorage::new());
		assert!(store.read().await.is_empty());
	}

	#[tokio::test]
	async fn read_non_array_is_empty() {
		let store = SavedStore::new(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, json!({"tabId": 1})));
		assert!(store.read().await.is_empty());
	}

	#[tokio::test]
	async fn read_malformed_array_is_empty() {
		let store = SavedStore::new(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, json!([{"tabId": "one"}])));
		assert!(store.read().await.is_empty());
	}

	#[tokio::test]
	async fn read_backend_failure_is_empty() {
		let store = SavedStore::new(BrokenStorage);
		assert!(store.read().await.is_empty());
	}

	#[tokio::test]
	async fn write_identical_list_is_suppressed() {
		let store = SavedStore::new(MemoryStorage::new());
		let list = vec![entry(1, 0), entry(2, 1)];

		assert!(store.write(&list).await.unwrap());
		assert!(!store.write(&list.clone()).await.unwrap());
		assert_eq!(store.backend().writes(), 1);
	}

	#[tokio::test]
	async fn write_is_order_sensitive() {
		let store = SavedStore::new(MemoryStorage::new());
		let list = vec![entry(1, 0), entry(2, 1)];
		store.write(&list).await.unwrap();

		let reversed: Vec<_> = list.iter().rev().cloned().collect();
		assert!(store.write(&reversed).await.unwrap());
		assert_eq!(store.read().await, reversed);
		assert_eq!(store.backend().writes(), 2);
	}

	#[tokio::test]
	async fn empty_write_over_absent_key_is_suppressed() {
		let store = SavedStore::new(MemoryStorage::new());
		assert!(!store.write(&[]).await.unwrap());
		assert_eq!(store.backend().writes(), 0);
	}

	#[tokio::test]
	async fn write_heals_malformed_value() {
		let store = SavedStore::new(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, json!("garbage")));
		assert!(store.write(&[entry(3, 2)]).await.unwrap());
		assert_eq!(store.read().await, vec![entry(3, 2)]);
	}

	#[tokio::test]
	async fn custom_key_is_respected() {
		let store = SavedStore::with_key(MemoryStorage::new(), "pinned");
		store.write(&[entry(1, 0)]).await.unwrap();

		assert_eq!(store.key(), "pinned");
		assert!(store.backend().item("pinned").is_some());
		assert!(store.backend().item(DEFAULT_STORAGE_KEY).is_none());
	}

	#[tokio::test]
	async fn write_surfaces_backend_failure() {
		let store = SavedStore::new(BrokenStorage);
		assert!(matches!(store.write(&[entry(1, 0)]).await, Err(Error::Storage(_))));
	}
}
