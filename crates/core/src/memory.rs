//! In-memory storage and tab backends.
//!
//! [`MemoryStorage`] counts the writes that reach it, which is how callers
//! observe change notifications. [`TabSnapshot`] models a fixed browser state
//! and backs the CLI as well as the tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tabkeep_protocol::{LiveTab, TabId, WindowId};

use crate::error::{Error, Result};
use crate::store::StorageBackend;
use crate::tabs::TabSource;

/// Key-value storage kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	items: Mutex<HashMap<String, Value>>,
	writes: AtomicUsize,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Storage pre-seeded with one item. Seeding does not count as a write.
	pub fn with_item(key: impl Into<String>, value: Value) -> Self {
		let storage = Self::new();
		storage.items.lock().insert(key.into(), value);
		storage
	}

	pub fn item(&self, key: &str) -> Option<Value> {
		self.items.lock().get(key).cloned()
	}

	/// Number of `set` calls received, i.e. change notifications emitted.
	pub fn writes(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorage {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		Ok(self.item(key))
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		self.items.lock().insert(key.to_string(), value);
		self.writes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

#[derive(Debug, Default)]
struct SnapshotState {
	tabs: Vec<LiveTab>,
	focused_window: Option<WindowId>,
	unreachable: HashSet<TabId>,
}

/// Fixed set of live tabs standing in for the browser.
#[derive(Debug, Default)]
pub struct TabSnapshot {
	state: Mutex<SnapshotState>,
	window_queries: AtomicUsize,
}

impl TabSnapshot {
	pub fn new(tabs: Vec<LiveTab>) -> Self {
		Self::from_parts(tabs, None)
	}

	pub fn from_parts(tabs: Vec<LiveTab>, focused_window: Option<WindowId>) -> Self {
		Self {
			state: Mutex::new(SnapshotState {
				tabs,
				focused_window,
				unreachable: HashSet::new(),
			}),
			window_queries: AtomicUsize::new(0),
		}
	}

	pub fn tabs(&self) -> Vec<LiveTab> {
		self.state.lock().tabs.clone()
	}

	pub fn focused_window(&self) -> Option<WindowId> {
		self.state.lock().focused_window
	}

	pub fn replace_tabs(&self, tabs: Vec<LiveTab>) {
		self.state.lock().tabs = tabs;
	}

	/// Closes a tab the way the browser does: later tabs in the same window
	/// shift one slot left.
	pub fn close_tab(&self, tab_id: TabId) -> Option<LiveTab> {
		let mut state = self.state.lock();
		let pos = state.tabs.iter().position(|t| t.id == tab_id)?;
		let closed = state.tabs.remove(pos);
		for tab in state.tabs.iter_mut() {
			if tab.window_id == closed.window_id && tab.index > closed.index {
				tab.index -= 1;
			}
		}
		Some(closed)
	}

	/// Makes single-tab fetches of `tab_id` fail while it still shows up in
	/// window queries.
	pub fn make_unreachable(&self, tab_id: TabId) {
		self.state.lock().unreachable.insert(tab_id);
	}

	/// Number of `window_tabs` calls served.
	pub fn window_queries(&self) -> usize {
		self.window_queries.load(Ordering::SeqCst)
	}
}

#[async_trait(?Send)]
impl TabSource for TabSnapshot {
	async fn active_tab(&self) -> Result<Option<LiveTab>> {
		let state = self.state.lock();
		let active = state
			.tabs
			.iter()
			.filter(|t| t.active)
			.find(|t| state.focused_window.is_none_or(|w| t.window_id == w));
		Ok(active.cloned())
	}

	async fn window_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>> {
		self.window_queries.fetch_add(1, Ordering::SeqCst);
		let state = self.state.lock();
		Ok(state.tabs.iter().filter(|t| t.window_id == window_id).cloned().collect())
	}

	async fn tab(&self, tab_id: TabId) -> Result<LiveTab> {
		let state = self.state.lock();
		if state.unreachable.contains(&tab_id) {
			return Err(Error::TabNotFound(tab_id));
		}
		state.tabs.iter().find(|t| t.id == tab_id).cloned().ok_or(Error::TabNotFound(tab_id))
	}

	async fn focus_window(&self, window_id: WindowId) -> Result<()> {
		let mut state = self.state.lock();
		if !state.tabs.iter().any(|t| t.window_id == window_id) {
			return Err(Error::WindowNotFound(window_id));
		}
		state.focused_window = Some(window_id);
		Ok(())
	}

	async fn activate_tab(&self, tab_id: TabId) -> Result<()> {
		let mut state = self.state.lock();
		let window_id = state
			.tabs
			.iter()
			.find(|t| t.id == tab_id)
			.map(|t| t.window_id)
			.ok_or(Error::TabNotFound(tab_id))?;
		for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
			tab.active = tab.id == tab_id;
		}
		Ok(())
	}
}
