use std::path::PathBuf;

use clap::{Parser, Subcommand};
use implidx_fragments::{MergePolicy, PendingPolicy};

#[derive(Parser, Debug)]
#[command(name = "implidx")]
#[command(about = "Inspect trait-implementor data files in generated documentation")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Config file to use instead of the default location
	#[arg(long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List the implementors of one trait
	List {
		/// Trait path, e.g. `num_traits::cast::FromPrimitive`
		#[arg(value_name = "TRAIT")]
		trait_path: String,

		#[command(flatten)]
		docs: DocsArgs,

		/// Only show this producer crate
		#[arg(long, short = 'p')]
		producer: Option<String>,

		/// Register fragments before the index sink is installed
		#[arg(long)]
		defer: bool,

		/// Pending buffer policy (`latest-wins` or `queue`)
		#[arg(long)]
		pending: Option<PendingPolicy>,

		/// Merge policy for repeated producers (`replace`, `union` or `keep-first`)
		#[arg(long)]
		merge: Option<MergePolicy>,

		/// Print snippets as rendered HTML instead of plain text
		#[arg(long)]
		raw: bool,
	},
	/// Summarize every trait data file
	Scan {
		#[command(flatten)]
		docs: DocsArgs,

		/// Emit JSON instead of a table
		#[arg(long)]
		json: bool,
	},
	/// Parse every trait data file and report failures
	Check {
		#[command(flatten)]
		docs: DocsArgs,
	},
}

/// Location of the documentation output.
#[derive(clap::Args, Debug, Clone)]
pub struct DocsArgs {
	/// Documentation root containing `implementors/`
	#[arg(long, short = 'd', value_name = "DIR")]
	pub docs: Option<PathBuf>,
}
