use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tabkeep::DEFAULT_STORAGE_KEY;

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "tabkeep")]
#[command(about = "Saved tabs that follow their tab across moves and closures")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Storage file holding the saved list [default: $XDG_DATA_HOME/tabkeep/storage.json]
	#[arg(long, global = true, env = "TABKEEP_STORE", value_name = "FILE")]
	pub store: Option<PathBuf>,

	/// Tab snapshot file standing in for the browser [default: $XDG_DATA_HOME/tabkeep/tabs.json]
	#[arg(long, global = true, env = "TABKEEP_TABS", value_name = "FILE")]
	pub tabs: Option<PathBuf>,

	/// Storage key of the saved list
	#[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY, value_name = "KEY")]
	pub key: String,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Send one popup message, e.g. '{"type":"REMOVE_SAVED","tabId":4}'
	Send {
		#[arg(value_name = "JSON")]
		message: String,
	},

	/// Apply one tab event, e.g. '{"event":"moved","tabId":4,"toIndex":2}'
	Event {
		#[arg(value_name = "JSON")]
		event: String,
	},

	/// Print the saved list
	List {
		/// Overlay live tab data from the snapshot
		#[arg(long)]
		hydrated: bool,
	},
}
