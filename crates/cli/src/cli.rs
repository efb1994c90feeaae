//! Command-line schema for the tagtint binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tagtint_language::Dialect;

#[derive(Parser, Debug)]
#[command(name = "tagtint")]
#[command(about = "Find and paint embedded-language tagged templates in JS/TS sources")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to $XDG_CONFIG_HOME/tagtint/config.kdl)
	#[arg(long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Raise log verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List tagged template spans
	Scan {
		#[command(flatten)]
		source: SourceArgs,

		/// Emit one JSON object per span
		#[arg(long)]
		json: bool,

		/// Files to scan
		#[arg(required = true)]
		files: Vec<PathBuf>,
	},
	/// Print a file with tagged template bodies styled
	Paint {
		#[command(flatten)]
		source: SourceArgs,

		file: PathBuf,
	},
	/// Paint a file and repaint it whenever it or the config changes
	Watch {
		#[command(flatten)]
		source: SourceArgs,

		file: PathBuf,
	},
	/// List recognized tags and their style keys
	Tags,
}

/// How source files are interpreted.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SourceArgs {
	/// Language id overriding the file extension (javascript, jsx, ts, typescriptreact, ...)
	#[arg(long, value_name = "ID")]
	pub language: Option<Dialect>,
}
