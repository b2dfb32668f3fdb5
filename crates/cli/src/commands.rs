//! Subcommand execution.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use tabkeep::{Command, Dispatcher, Reconciler, SavedStore, TabEvent, TabSnapshot};
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::file_store::FileStorage;
use crate::paths::DataPaths;
use crate::snapshot::SnapshotFile;

pub async fn run(cli: Cli) -> Result<()> {
	let paths = DataPaths::new(cli.store, cli.tabs);
	debug!(target = "tabkeep.cli", store = %paths.store.display(), tabs = %paths.tabs.display(), "resolved paths");

	let snapshot = Arc::new(SnapshotFile::load(&paths.tabs)?.into_snapshot());
	let store = SavedStore::with_key(FileStorage::new(&paths.store), cli.key);
	let reconciler = Reconciler::new(store, snapshot.clone());

	let output = match cli.command {
		Commands::Send { message } => {
			let command: Command = parse("message", &message)?;
			let focuses = matches!(command, Command::FocusTab { .. });
			let response = Dispatcher::new(&reconciler).dispatch(command).await;
			if focuses {
				save_snapshot(&snapshot, &paths)?;
			}
			serde_json::to_value(response)?
		}
		Commands::Event { event } => {
			let event: TabEvent = parse("event", &event)?;
			let written = reconciler.apply(&event).await?;
			json!({ "written": written })
		}
		Commands::List { hydrated } => {
			let command = if hydrated { Command::GetSavedHydrated } else { Command::GetSaved };
			serde_json::to_value(Dispatcher::new(&reconciler).dispatch(command).await)?
		}
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}

fn parse<T: DeserializeOwned>(kind: &'static str, input: &str) -> Result<T> {
	serde_json::from_str(input).map_err(|source| CliError::InvalidInput { kind, source })
}

fn save_snapshot(snapshot: &TabSnapshot, paths: &DataPaths) -> Result<()> {
	SnapshotFile::from_snapshot(snapshot).save(&paths.tabs)
}
