use thiserror::Error;

use tabkeep_protocol::{TabId, WindowId};

/// Result type alias for saved-tab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by storage backends and tab sources.
///
/// None of these reach a popup caller: the dispatcher logs them and answers
/// with an acknowledgment or the last known data.
#[derive(Debug, Error)]
pub enum Error {
	/// The storage backend failed to read or write.
	#[error("storage error: {0}")]
	Storage(String),

	/// The tab no longer exists.
	#[error("tab {0} not found")]
	TabNotFound(TabId),

	/// The window no longer exists.
	#[error("window {0} not found")]
	WindowNotFound(WindowId),

	/// The browser rejected a tab or window call.
	#[error("tab query failed: {0}")]
	TabQuery(String),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
