//! Saved-tab list that stays consistent with the browser's live tabs.
//!
//! The list is persisted through a [`StorageBackend`] and mutated only by the
//! [`Reconciler`], which serializes every read-modify-write cycle. Tab
//! lifecycle notifications go through [`Reconciler::apply`]; popup messages go
//! through the [`Dispatcher`].
//!
//! # Main Types
//!
//! - [`SavedStore`] - Change-suppressing reader/writer for the saved list
//! - [`Reconciler`] - Applies tab events and re-points entries on closure
//! - [`Dispatcher`] - Routes popup [`Command`]s to reconciler operations
//! - [`TabSource`] - Browser tab API seam
//! - [`MemoryStorage`] / [`TabSnapshot`] - In-memory backends

pub mod dispatcher;
pub mod error;
pub mod memory;
pub mod reconciler;
pub mod store;
pub mod tabs;

pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use memory::{MemoryStorage, TabSnapshot};
pub use reconciler::{Clock, EntryPatch, Reconciler, pick_successor, system_clock};
pub use store::{DEFAULT_STORAGE_KEY, SavedStore, StorageBackend};
pub use tabkeep_protocol::{Command, LiveTab, Response, SavedEntry, TabChange, TabEvent, TabId, WindowId};
pub use tabs::TabSource;
