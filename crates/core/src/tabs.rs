//! Browser tab API seam.

use std::sync::Arc;

use async_trait::async_trait;
use tabkeep_protocol::{LiveTab, TabId, WindowId};

use crate::error::Result;

/// Access to the browser's live tabs and windows.
///
/// Futures are not required to be `Send`: the background script runs on a
/// single-threaded event loop and its browser handles are `!Send`.
#[async_trait(?Send)]
pub trait TabSource {
	/// Active tab of the focused window, if any.
	async fn active_tab(&self) -> Result<Option<LiveTab>>;

	/// All tabs currently in `window_id`, in no particular order.
	async fn window_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>>;

	/// Current state of one tab. Fails with [`Error::TabNotFound`] once it is gone.
	///
	/// [`Error::TabNotFound`]: crate::Error::TabNotFound
	async fn tab(&self, tab_id: TabId) -> Result<LiveTab>;

	async fn focus_window(&self, window_id: WindowId) -> Result<()>;

	async fn activate_tab(&self, tab_id: TabId) -> Result<()>;
}

#[async_trait(?Send)]
impl<T: TabSource + ?Sized> TabSource for Arc<T> {
	async fn active_tab(&self) -> Result<Option<LiveTab>> {
		(**self).active_tab().await
	}

	async fn window_tabs(&self, window_id: WindowId) -> Result<Vec<LiveTab>> {
		(**self).window_tabs(window_id).await
	}

	async fn tab(&self, tab_id: TabId) -> Result<LiveTab> {
		(**self).tab(tab_id).await
	}

	async fn focus_window(&self, window_id: WindowId) -> Result<()> {
		(**self).focus_window(window_id).await
	}

	async fn activate_tab(&self, tab_id: TabId) -> Result<()> {
		(**self).activate_tab(tab_id).await
	}
}
