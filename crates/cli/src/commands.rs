use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use implidx_docs::{DocTree, TraitPath, load_file, plain_text};
use implidx_fragments::{FragmentRegistry, ImplementorIndex, MergePolicy, PendingPolicy, Registration};
use serde::Serialize;
use tracing::{info, warn};

/// Settings for [`list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
	pub producer: Option<String>,
	pub defer: bool,
	pub pending: PendingPolicy,
	pub merge: MergePolicy,
	pub raw: bool,
}

/// Loads one trait's data file, runs it through a registry into an index, and prints the listing.
pub fn list(tree: &DocTree, trait_path: &TraitPath, opts: &ListOptions, out: &mut impl Write) -> Result<()> {
	let file = tree.load(trait_path)?;

	let registry = FragmentRegistry::with_policy("list", opts.pending);
	let index = Arc::new(ImplementorIndex::with_policy("list", opts.merge));

	if !opts.defer {
		registry.install_sink(index.clone())?;
	}

	// one data file is one unit, as the generator's glue parks the whole object at once
	let displaced = match registry.register_batch(file.into_fragments()) {
		Registration::Queued { displaced } => displaced.len(),
		Registration::Delivered => 0,
	};

	if opts.defer {
		let drained = registry.install_sink(index.clone())?;
		info!(trait_path = %trait_path, drained, displaced, "deferred fragments delivered");
	}

	let snapshot = index.snapshot();
	writeln!(out, "{trait_path}")?;

	let mut shown = 0usize;
	for (producer, listing) in snapshot.iter() {
		if opts.producer.as_deref().is_some_and(|p| p != producer) {
			continue;
		}
		shown += 1;
		writeln!(out, "  {producer} ({})", listing.len())?;
		for snippet in listing {
			if opts.raw {
				writeln!(out, "    {snippet}")?;
			} else {
				writeln!(out, "    {}", plain_text(snippet))?;
			}
		}
	}

	if let Some(producer) = &opts.producer
		&& shown == 0
	{
		bail!("no implementors of {trait_path} from crate '{producer}'");
	}
	if displaced > 0 {
		warn!(displaced, "some fragments were displaced before delivery; try --pending queue");
	}
	Ok(())
}

#[derive(Debug, Serialize)]
pub struct TraitSummary {
	#[serde(rename = "trait")]
	pub trait_path: String,
	pub implementors: usize,
	pub producers: Vec<ProducerSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProducerSummary {
	pub name: String,
	pub implementors: usize,
}

/// Summarizes every parseable data file. Unparseable files are logged and skipped.
pub fn summarize(tree: &DocTree) -> Result<Vec<TraitSummary>> {
	let mut summaries = Vec::new();
	for trait_file in tree.trait_files()? {
		let file = match load_file(&trait_file.path) {
			Ok(file) => file,
			Err(e) => {
				warn!(error = %e, "skipping unreadable data file");
				continue;
			}
		};
		summaries.push(TraitSummary {
			trait_path: trait_file.trait_path.to_string(),
			implementors: file.total_implementors(),
			producers: file
				.fragments()
				.iter()
				.map(|f| ProducerSummary {
					name: f.producer().to_owned(),
					implementors: f.len(),
				})
				.collect(),
		});
	}
	Ok(summaries)
}

pub fn scan(tree: &DocTree, json: bool, out: &mut impl Write) -> Result<()> {
	let summaries = summarize(tree)?;

	if json {
		serde_json::to_writer_pretty(&mut *out, &summaries).context("failed to write JSON")?;
		writeln!(out)?;
		return Ok(());
	}

	for summary in &summaries {
		let producers: Vec<&str> = summary.producers.iter().map(|p| p.name.as_str()).collect();
		writeln!(
			out,
			"{:<48} {:>5}  {}",
			summary.trait_path,
			summary.implementors,
			producers.join(", ")
		)?;
	}
	writeln!(out, "{} traits", summaries.len())?;
	Ok(())
}

/// Parses every data file. Returns the number of failures.
pub fn check(tree: &DocTree, out: &mut impl Write) -> Result<usize> {
	let mut failures = 0usize;
	for trait_file in tree.trait_files()? {
		match load_file(&trait_file.path) {
			Ok(_) => writeln!(out, "ok    {}", trait_file.trait_path)?,
			Err(e) => {
				failures += 1;
				writeln!(out, "FAIL  {}: {e}", trait_file.trait_path)?;
			}
		}
	}
	Ok(failures)
}

#[cfg(test)]
mod tests;
