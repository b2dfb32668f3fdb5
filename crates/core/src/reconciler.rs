//! Keeps saved entries in step with tab lifecycle events.
//!
//! Every operation is a read-modify-write cycle against the [`SavedStore`],
//! run under one async mutex so interleaved events cannot act on a stale
//! list. Closure reconciliation holds the lock across its live-tab queries.

use std::time::{SystemTime, UNIX_EPOCH};

use tabkeep_protocol::{LiveTab, SavedEntry, TabEvent, TabId, WindowId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::{SavedStore, StorageBackend};
use crate::tabs::TabSource;

/// Source of `savedAt` timestamps, in Unix epoch milliseconds.
pub type Clock = fn() -> u64;

/// Wall clock. Not available on `wasm32-unknown-unknown`; use
/// [`Reconciler::with_clock`] there.
pub fn system_clock() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or_default()
}

/// Partial update merged into a saved entry. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
	pub title: Option<String>,
	pub url: Option<String>,
	/// `Some(None)` clears the favicon.
	pub fav_icon_url: Option<Option<String>>,
	pub index: Option<u32>,
	pub auto_repointed: Option<bool>,
}

impl EntryPatch {
	/// Display fields of `tab`. Missing title/url keep the stored value; the
	/// favicon is always taken over since pages routinely drop it.
	pub fn display_of(tab: &LiveTab) -> Self {
		Self {
			title: tab.title.clone(),
			url: tab.url.clone(),
			fav_icon_url: Some(tab.fav_icon_url.clone()),
			..Self::default()
		}
	}

	pub fn index(index: u32) -> Self {
		Self {
			index: Some(index),
			..Self::default()
		}
	}

	pub fn clear_repointed() -> Self {
		Self {
			auto_repointed: Some(false),
			..Self::default()
		}
	}

	pub fn apply_to(&self, entry: &mut SavedEntry) {
		if let Some(title) = &self.title {
			entry.title.clone_from(title);
		}
		if let Some(url) = &self.url {
			entry.url.clone_from(url);
		}
		if let Some(fav_icon_url) = &self.fav_icon_url {
			entry.fav_icon_url.clone_from(fav_icon_url);
		}
		if let Some(index) = self.index {
			entry.index = index;
		}
		if let Some(auto_repointed) = self.auto_repointed {
			entry.auto_repointed = auto_repointed;
		}
	}
}

/// Chooses the tab that takes over a closed tab's slot.
///
/// `live` must be sorted by index. Prefers the tab now sitting at
/// `old_index`; otherwise clamps to the last position. `None` for an empty
/// window.
pub fn pick_successor(old_index: u32, live: &[LiveTab]) -> Option<&LiveTab> {
	live.iter().find(|t| t.index == old_index).or_else(|| {
		let clamped = (old_index as usize).min(live.len().saturating_sub(1));
		live.get(clamped)
	})
}

fn repoint(entry: &mut SavedEntry, successor: &LiveTab) {
	entry.tab_id = successor.id;
	entry.window_id = successor.window_id;
	entry.url = successor.url.clone().unwrap_or_default();
	entry.title = successor.title.clone().unwrap_or_default();
	entry.fav_icon_url.clone_from(&successor.fav_icon_url);
	entry.index = successor.index;
	entry.auto_repointed = true;
}

/// Owner of the saved list. All mutations go through here.
pub struct Reconciler<B, T> {
	store: SavedStore<B>,
	tabs: T,
	clock: Clock,
	cycle: Mutex<()>,
}

impl<B: StorageBackend, T: TabSource> Reconciler<B, T> {
	pub fn new(store: SavedStore<B>, tabs: T) -> Self {
		Self {
			store,
			tabs,
			clock: system_clock,
			cycle: Mutex::new(()),
		}
	}

	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;
		self
	}

	pub fn store(&self) -> &SavedStore<B> {
		&self.store
	}

	pub fn tabs(&self) -> &T {
		&self.tabs
	}

	/// Snapshot of the stored list, read inside the cycle lock.
	pub async fn saved(&self) -> Vec<SavedEntry> {
		let _cycle = self.cycle.lock().await;
		self.store.read().await
	}

	/// Merges `patch` into the first entry referencing `match_tab_id`.
	///
	/// Returns whether the store was written.
	pub async fn update_fields(&self, match_tab_id: TabId, patch: &EntryPatch) -> Result<bool> {
		let _cycle = self.cycle.lock().await;
		let mut list = self.store.read().await;
		let Some(entry) = list.iter_mut().find(|e| e.tab_id == match_tab_id) else {
			return Ok(false);
		};
		patch.apply_to(entry);
		self.store.write(&list).await
	}

	/// Drops every entry referencing `tab_id`.
	pub async fn remove_by_tab_id(&self, tab_id: TabId) -> Result<bool> {
		let _cycle = self.cycle.lock().await;
		let mut list = self.store.read().await;
		let before = list.len();
		list.retain(|e| e.tab_id != tab_id);
		if list.len() == before {
			return Ok(false);
		}
		debug!(target = "tabkeep.reconcile", tab_id, removed = before - list.len(), "entries removed");
		self.store.write(&list).await
	}

	/// Prepends an entry for `tab` unless that exact tab is already saved.
	pub async fn add_current_tab(&self, tab: &LiveTab) -> Result<bool> {
		let _cycle = self.cycle.lock().await;
		let mut list = self.store.read().await;
		if list.iter().any(|e| e.references(tab)) {
			debug!(target = "tabkeep.reconcile", tab_id = tab.id, "tab already saved");
			return Ok(false);
		}
		list.insert(0, SavedEntry::from_live(tab, (self.clock)()));
		info!(target = "tabkeep.reconcile", tab_id = tab.id, window_id = tab.window_id, "tab saved");
		self.store.write(&list).await
	}

	/// Re-points or drops the entries of a closed tab.
	///
	/// When the whole window is closing the entries are dropped without
	/// looking for successors. Otherwise each entry moves to the tab that took
	/// its slot (see [`pick_successor`]), or is dropped if the window is empty.
	pub async fn reconcile_closure(&self, closed_tab_id: TabId, window_hint: Option<WindowId>, is_window_closing: bool) -> Result<bool> {
		let _cycle = self.cycle.lock().await;
		let mut list = self.store.read().await;

		let affected: Vec<usize> = list
			.iter()
			.enumerate()
			.filter(|(_, e)| e.tab_id == closed_tab_id)
			.map(|(pos, _)| pos)
			.collect();
		let Some(&first) = affected.first() else {
			return Ok(false);
		};

		if is_window_closing {
			list.retain(|e| e.tab_id != closed_tab_id);
			info!(target = "tabkeep.reconcile", tab_id = closed_tab_id, removed = affected.len(), "window closing, entries dropped");
			return self.store.write(&list).await;
		}

		let window_id = window_hint.unwrap_or(list[first].window_id);
		let mut live = match self.tabs.window_tabs(window_id).await {
			Ok(tabs) => tabs,
			Err(err) => {
				warn!(target = "tabkeep.reconcile", window_id, error = %err, "window query failed, no successors");
				Vec::new()
			}
		};
		live.retain(|t| t.id != closed_tab_id);
		live.sort_by_key(|t| t.index);

		let mut orphaned = Vec::new();
		for &pos in &affected {
			let Some(successor) = pick_successor(list[pos].index, &live) else {
				orphaned.push(pos);
				continue;
			};

			let current = match self.tabs.tab(successor.id).await {
				Ok(tab) => tab,
				Err(err) => {
					debug!(target = "tabkeep.reconcile", tab_id = successor.id, error = %err, "successor refetch failed, using snapshot");
					successor.clone()
				}
			};
			info!(
				target = "tabkeep.reconcile",
				from = closed_tab_id,
				to = current.id,
				index = current.index,
				"entry re-pointed"
			);
			repoint(&mut list[pos], &current);
		}

		// `affected` is ascending, so removing back to front keeps positions valid.
		for pos in orphaned.into_iter().rev() {
			let entry = list.remove(pos);
			info!(target = "tabkeep.reconcile", tab_id = entry.tab_id, "no successor, entry dropped");
		}

		self.store.write(&list).await
	}

	/// Routes a tab lifecycle event.
	pub async fn apply(&self, event: &TabEvent) -> Result<bool> {
		match event {
			TabEvent::Updated { tab_id, change, tab } => {
				if !change.touches_display() {
					return Ok(false);
				}
				self.update_fields(*tab_id, &EntryPatch::display_of(tab)).await
			}
			TabEvent::Moved { tab_id, to_index } => self.update_fields(*tab_id, &EntryPatch::index(*to_index)).await,
			TabEvent::Removed {
				tab_id,
				window_id,
				is_window_closing,
			} => self.reconcile_closure(*tab_id, *window_id, *is_window_closing).await,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn live(id: TabId, index: u32) -> LiveTab {
		LiveTab {
			id,
			window_id: 1,
			index,
			url: Some(format!("https://example.com/{id}")),
			title: Some(format!("Tab {id}")),
			fav_icon_url: None,
			active: false,
		}
	}

	fn saved() -> SavedEntry {
		SavedEntry {
			tab_id: 1,
			window_id: 1,
			url: "https://a.test".into(),
			title: "A".into(),
			fav_icon_url: Some("https://a.test/icon.png".into()),
			index: 4,
			saved_at: 42,
			auto_repointed: true,
		}
	}

	#[test]
	fn successor_prefers_exact_index() {
		let tabs = vec![live(10, 0), live(11, 1), live(99, 2), live(12, 3)];
		assert_eq!(pick_successor(2, &tabs).map(|t| t.id), Some(99));
	}

	#[test]
	fn successor_clamps_to_tail() {
		let tabs = vec![live(10, 0), live(11, 1)];
		assert_eq!(pick_successor(5, &tabs).map(|t| t.id), Some(11));
	}

	#[test]
	fn successor_falls_back_by_position_when_indices_have_gaps() {
		let tabs = vec![live(10, 0), live(11, 3), live(12, 7)];
		assert_eq!(pick_successor(1, &tabs).map(|t| t.id), Some(11));
	}

	#[test]
	fn successor_absent_for_empty_window() {
		assert!(pick_successor(0, &[]).is_none());
	}

	#[test]
	fn patch_touches_only_present_fields() {
		let mut entry = saved();
		EntryPatch {
			title: Some("X".into()),
			..EntryPatch::default()
		}
		.apply_to(&mut entry);

		let expected = SavedEntry {
			title: "X".into(),
			..saved()
		};
		assert_eq!(entry, expected);
	}

	#[test]
	fn display_patch_keeps_missing_title_but_clears_favicon() {
		let mut entry = saved();
		let mut tab = live(1, 4);
		tab.title = None;
		EntryPatch::display_of(&tab).apply_to(&mut entry);

		assert_eq!(entry.title, "A");
		assert_eq!(entry.url, "https://example.com/1");
		assert_eq!(entry.fav_icon_url, None);
		assert_eq!(entry.index, 4);
	}

	#[test]
	fn repoint_keeps_saved_at_and_raises_flag() {
		let mut entry = SavedEntry {
			auto_repointed: false,
			..saved()
		};
		repoint(&mut entry, &live(7, 2));

		assert_eq!(entry.tab_id, 7);
		assert_eq!(entry.index, 2);
		assert_eq!(entry.title, "Tab 7");
		assert_eq!(entry.saved_at, 42);
		assert!(entry.auto_repointed);
	}
}
