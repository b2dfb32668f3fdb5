//! Help output colors.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Cargo-like help: green section headers, cyan flags and placeholders,
/// red for rejected values.
pub fn cli_styles() -> Styles {
	let accent = AnsiColor::Cyan.on_default();
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(accent)
		.placeholder(accent)
		.invalid(AnsiColor::Red.on_default().bold())
		.error(AnsiColor::Red.on_default().bold())
}
