use serde::{Deserialize, Serialize};

use crate::entry::{LiveTab, TabId, WindowId};

/// Subset of the browser's `changeInfo` payload for tab updates.
///
/// Only the display fields matter here; everything else (`status`,
/// `audible`, ...) is ignored when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChange {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fav_icon_url: Option<String>,
}

impl TabChange {
	/// Returns true if the change touches title, url or favicon.
	pub fn touches_display(&self) -> bool {
		self.title.is_some() || self.url.is_some() || self.fav_icon_url.is_some()
	}
}

/// Tab lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TabEvent {
	/// A tab's attributes changed; `tab` carries its state after the change.
	Updated {
		tab_id: TabId,
		#[serde(default)]
		change: TabChange,
		tab: LiveTab,
	},
	/// A tab moved within its window.
	Moved { tab_id: TabId, to_index: u32 },
	/// A tab closed, possibly as part of its whole window closing.
	Removed {
		tab_id: TabId,
		#[serde(default)]
		window_id: Option<WindowId>,
		#[serde(default)]
		is_window_closing: bool,
	},
}
