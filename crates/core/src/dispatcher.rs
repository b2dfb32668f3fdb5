//! Routes popup commands to reconciler operations.
//!
//! Failures never reach the caller: every command answers with an
//! acknowledgment or a list, and errors are only logged.

use futures_util::future::join_all;
use tabkeep_protocol::{Command, LiveTab, Response, SavedEntry, TabId, WindowId};
use tracing::{debug, warn};

use crate::error::Result;
use crate::reconciler::{EntryPatch, Reconciler};
use crate::store::StorageBackend;
use crate::tabs::TabSource;

/// Stateless router over a borrowed [`Reconciler`].
pub struct Dispatcher<'a, B, T> {
	reconciler: &'a Reconciler<B, T>,
}

impl<'a, B: StorageBackend, T: TabSource> Dispatcher<'a, B, T> {
	pub fn new(reconciler: &'a Reconciler<B, T>) -> Self {
		Self { reconciler }
	}

	pub async fn dispatch(&self, command: Command) -> Response {
		let name = command.name();
		debug!(target = "tabkeep.dispatch", command = name, "dispatching");

		match command {
			Command::AddCurrentTab => {
				self.add_current_tab().await;
				Response::ok()
			}
			Command::GetSaved => Response::Saved {
				saved: self.reconciler.saved().await,
			},
			Command::GetSavedHydrated => Response::Saved {
				saved: self.hydrated().await,
			},
			Command::FocusTab { tab_id, window_id } => {
				self.focus(tab_id, window_id).await;
				Response::ok()
			}
			Command::RemoveSaved { tab_id } => {
				logged(name, self.reconciler.remove_by_tab_id(tab_id).await);
				Response::ok()
			}
			Command::ClearRepointedFlag { tab_id } => {
				logged(name, self.reconciler.update_fields(tab_id, &EntryPatch::clear_repointed()).await);
				Response::ok()
			}
		}
	}

	async fn add_current_tab(&self) {
		let tab = match self.reconciler.tabs().active_tab().await {
			Ok(Some(tab)) => tab,
			Ok(None) => {
				debug!(target = "tabkeep.dispatch", "no active tab to save");
				return;
			}
			Err(err) => {
				warn!(target = "tabkeep.dispatch", error = %err, "active tab query failed");
				return;
			}
		};
		logged("ADD_CURRENT_TAB", self.reconciler.add_current_tab(&tab).await);
	}

	/// Stored list overlaid with live tab data. Never written back.
	async fn hydrated(&self) -> Vec<SavedEntry> {
		let list = self.reconciler.saved().await;
		let tabs = self.reconciler.tabs();
		join_all(list.into_iter().map(|entry| async move {
			match tabs.tab(entry.tab_id).await {
				Ok(live) => overlay(entry, &live),
				Err(_) => entry,
			}
		}))
		.await
	}

	async fn focus(&self, tab_id: TabId, window_id: WindowId) {
		let tabs = self.reconciler.tabs();
		let result = async {
			tabs.focus_window(window_id).await?;
			tabs.activate_tab(tab_id).await
		}
		.await;
		if let Err(err) = result {
			debug!(target = "tabkeep.dispatch", tab_id, window_id, error = %err, "focus failed");
		}
	}
}

fn overlay(entry: SavedEntry, live: &LiveTab) -> SavedEntry {
	SavedEntry {
		title: live.title.clone().unwrap_or(entry.title),
		url: live.url.clone().unwrap_or(entry.url),
		fav_icon_url: live.fav_icon_url.clone().or(entry.fav_icon_url),
		index: live.index,
		..entry
	}
}

fn logged(command: &str, result: Result<bool>) {
	if let Err(err) = result {
		warn!(target = "tabkeep.dispatch", command, error = %err, "command failed");
	}
}
