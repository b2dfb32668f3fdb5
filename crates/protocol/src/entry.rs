use serde::{Deserialize, Serialize};

/// Browser-assigned tab identifier.
pub type TabId = i32;

/// Browser-assigned window identifier.
pub type WindowId = i32;

/// A user-pinned reference to a tab, as stored under the saved-tabs key.
///
/// `tab_id` follows the tab across closures: when the referenced tab goes away
/// the entry may be re-pointed to a successor, in which case `auto_repointed`
/// is raised until the user focuses the entry again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
	pub tab_id: TabId,
	pub window_id: WindowId,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub fav_icon_url: Option<String>,
	/// Position within the window at last observation.
	#[serde(default)]
	pub index: u32,
	/// Creation time in Unix epoch milliseconds. Never rewritten.
	#[serde(default)]
	pub saved_at: u64,
	#[serde(default)]
	pub auto_repointed: bool,
}

impl SavedEntry {
	/// Builds a fresh entry from the live attributes of `tab`.
	pub fn from_live(tab: &LiveTab, saved_at: u64) -> Self {
		Self {
			tab_id: tab.id,
			window_id: tab.window_id,
			url: tab.url.clone().unwrap_or_default(),
			title: tab.title.clone().unwrap_or_default(),
			fav_icon_url: tab.fav_icon_url.clone(),
			index: tab.index,
			saved_at,
			auto_repointed: false,
		}
	}

	/// True if this entry references exactly `tab` in its window.
	pub fn references(&self, tab: &LiveTab) -> bool {
		self.tab_id == tab.id && self.window_id == tab.window_id
	}
}

/// Tab as reported by the browser's `tabs` API.
///
/// Display fields are optional: the browser omits them for tabs the extension
/// lacks host permission for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTab {
	pub id: TabId,
	pub window_id: WindowId,
	#[serde(default)]
	pub index: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fav_icon_url: Option<String>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub active: bool,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn saved_entry_uses_camel_case_keys() {
		let entry = SavedEntry {
			tab_id: 7,
			window_id: 1,
			url: "https://example.com".into(),
			title: "Example".into(),
			fav_icon_url: None,
			index: 3,
			saved_at: 1_700_000_000_000,
			auto_repointed: false,
		};

		let value = serde_json::to_value(&entry).unwrap();
		assert_eq!(
			value,
			json!({
				"tabId": 7,
				"windowId": 1,
				"url": "https://example.com",
				"title": "Example",
				"favIconUrl": null,
				"index": 3,
				"savedAt": 1_700_000_000_000u64,
				"autoRepointed": false
			})
		);
	}

	#[test]
	fn saved_entry_tolerates_missing_display_fields() {
		let entry: SavedEntry = serde_json::from_value(json!({
			"tabId": 4,
			"windowId": 2,
			"savedAt": 10
		}))
		.unwrap();

		assert_eq!(entry.url, "");
		assert_eq!(entry.title, "");
		assert_eq!(entry.fav_icon_url, None);
		assert_eq!(entry.index, 0);
		assert!(!entry.auto_repointed);
	}

	#[test]
	fn from_live_copies_attributes() {
		let tab = LiveTab {
			id: 12,
			window_id: 3,
			index: 5,
			url: Some("https://rust-lang.org".into()),
			title: None,
			fav_icon_url: Some("https://rust-lang.org/favicon.ico".into()),
			active: true,
		};

		let entry = SavedEntry::from_live(&tab, 99);
		assert_eq!(entry.tab_id, 12);
		assert_eq!(entry.window_id, 3);
		assert_eq!(entry.index, 5);
		assert_eq!(entry.title, "");
		assert_eq!(entry.saved_at, 99);
		assert!(!entry.auto_repointed);
		assert!(entry.references(&tab));
	}

	#[test]
	fn live_tab_parses_browser_shape() {
		let tab: LiveTab = serde_json::from_value(json!({
			"id": 5,
			"windowId": 1,
			"index": 0,
			"title": "New Tab",
			"active": true,
			"pinned": false,
			"status": "complete"
		}))
		.unwrap();

		assert_eq!(tab.id, 5);
		assert_eq!(tab.url, None);
		assert_eq!(tab.title.as_deref(), Some("New Tab"));
		assert!(tab.active);
	}
}
