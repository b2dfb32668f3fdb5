//! Command-line driver for the saved-tab list.
//!
//! Persists the list in a JSON file shaped like `storage.local` and models the
//! browser with a tab snapshot file, so popup messages and tab events can be
//! replayed outside the browser.

pub mod cli;
pub mod commands;
pub mod error;
pub mod file_store;
pub mod logging;
pub mod paths;
pub mod snapshot;
pub mod styles;
