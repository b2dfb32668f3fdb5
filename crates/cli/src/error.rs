use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid {kind}: {source}")]
	InvalidInput {
		kind: &'static str,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to access {path}: {source}")]
	File {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Tabkeep(#[from] tabkeep::Error),
}
