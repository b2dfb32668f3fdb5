//! Wire types shared by the saved-tabs core, the background script and the CLI.
//!
//! # Main Types
//!
//! - [`SavedEntry`] - One persisted reference to a tab
//! - [`LiveTab`] - The browser's current view of a tab
//! - [`TabEvent`] - Tab lifecycle notifications consumed by the reconciler
//! - [`Command`] / [`Response`] - Popup message protocol

mod command;
mod entry;
mod event;

pub use command::{Command, Response};
pub use entry::{LiveTab, SavedEntry, TabId, WindowId};
pub use event::{TabChange, TabEvent};
