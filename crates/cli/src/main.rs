//! `implidx` binary.
//!
//! Reads the per-trait implementor data files that rustdoc writes under
//! `<docs>/implementors/` and reports on them.

mod cli;
mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use implidx_docs::{DocTree, TraitPath};
use tracing::{debug, info};

use crate::cli::{Cli, Command, DocsArgs};
use crate::commands::ListOptions;
use crate::config::Config;

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = Config::load(cli.config.as_deref())?;
	debug!(?config, "effective config");

	let stdout = std::io::stdout();
	let mut out = stdout.lock();

	match cli.command {
		Command::List {
			trait_path,
			docs,
			producer,
			defer,
			pending,
			merge,
			raw,
		} => {
			let tree = open_tree(&config, docs)?;
			let trait_path: TraitPath = trait_path.parse()?;
			let opts = ListOptions {
				producer,
				defer: defer || config.defer,
				pending: pending.unwrap_or(config.pending),
				merge: merge.unwrap_or(config.merge),
				raw,
			};
			commands::list(&tree, &trait_path, &opts, &mut out)?;
		}
		Command::Scan { docs, json } => {
			let tree = open_tree(&config, docs)?;
			commands::scan(&tree, json, &mut out)?;
		}
		Command::Check { docs } => {
			let tree = open_tree(&config, docs)?;
			let failures = commands::check(&tree, &mut out)?;
			out.flush()?;
			if failures > 0 {
				info!(failures, "data files failed to parse");
				return Ok(ExitCode::FAILURE);
			}
		}
	}

	out.flush()?;
	Ok(ExitCode::SUCCESS)
}

fn open_tree(config: &Config, args: DocsArgs) -> Result<DocTree> {
	let root = config.docs_root(args.docs);
	DocTree::open(&root).with_context(|| format!("cannot use {} as documentation root", root.display()))
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("implidx=debug,implidx_fragments=debug,implidx_docs=debug,info")
			} else {
				EnvFilter::new("info")
			}
		})
	};

	// IMPLIDX_LOG_DIR sends logs to a per-process file instead of stderr
	if let Some(log_dir) = std::env::var("IMPLIDX_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("implidx.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
