use serde::{Deserialize, Serialize};

use crate::entry::{SavedEntry, TabId, WindowId};

/// Message sent from the popup to the background script.
///
/// Tagged by `type` with the constant-case names the popup already uses
/// (`{"type": "FOCUS_TAB", "tabId": 4, "windowId": 1}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Command {
	/// Save the active tab of the current window.
	AddCurrentTab,
	/// Return the stored list as-is.
	GetSaved,
	/// Return the stored list overlaid with live tab data, without persisting it.
	GetSavedHydrated,
	/// Bring a tab and its window to the front.
	FocusTab { tab_id: TabId, window_id: WindowId },
	/// Drop every entry referencing `tab_id`.
	RemoveSaved { tab_id: TabId },
	/// Clear the auto-repointed marker of the entry referencing `tab_id`.
	ClearRepointedFlag { tab_id: TabId },
}

impl Command {
	/// Stable name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Self::AddCurrentTab => "ADD_CURRENT_TAB",
			Self::GetSaved => "GET_SAVED",
			Self::GetSavedHydrated => "GET_SAVED_HYDRATED",
			Self::FocusTab { .. } => "FOCUS_TAB",
			Self::RemoveSaved { .. } => "REMOVE_SAVED",
			Self::ClearRepointedFlag { .. } => "CLEAR_REPOINTED_FLAG",
		}
	}
}

/// Reply to a [`Command`]. Either an acknowledgment or a list payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
	Saved { saved: Vec<SavedEntry> },
	Ack { ok: bool },
}

impl Response {
	pub fn ok() -> Self {
		Self::Ack { ok: true }
	}

	/// Returns the list payload, if any.
	pub fn saved(&self) -> Option<&[SavedEntry]> {
		match self {
			Self::Saved { saved } => Some(saved),
			Self::Ack { .. } => None,
		}
	}
}
