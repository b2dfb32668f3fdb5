//! Stderr logging for the CLI.
//!
//! Core events carry `target = "tabkeep.store"` / `"tabkeep.reconcile"` /
//! `"tabkeep.dispatch"` fields and come from the `tabkeep` crate; directives
//! below select by crate so `RUST_LOG` can still narrow further.

use tracing_subscriber::EnvFilter;

/// Default directives per `-v` count.
///
/// - 0: only store/reconcile warnings (failed reads, dropped events)
/// - 1 (`-v`): saves, re-pointing and dropped entries
/// - 2+ (`-vv`): skipped writes, dispatch and path resolution
pub fn default_filter(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "error,tabkeep=warn",
		1 => "warn,tabkeep=info,tabkeep_cli=info",
		_ => "warn,tabkeep=trace,tabkeep_cli=debug",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn quiet_run_keeps_core_warnings() {
		assert!(default_filter(0).contains("tabkeep=warn"));
	}

	#[test]
	fn verbose_levels_widen_core_output() {
		assert!(default_filter(1).contains("tabkeep=info"));
		assert!(default_filter(2).contains("tabkeep=trace"));
		assert_eq!(default_filter(5), default_filter(2));
	}

	#[test]
	fn every_level_parses() {
		for verbosity in 0..3 {
			assert!(default_filter(verbosity).parse::<EnvFilter>().is_ok());
		}
	}
}
