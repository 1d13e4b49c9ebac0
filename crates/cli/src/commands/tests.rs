use std::fs;

use implidx_docs::datafile::{DataFile, render};
use implidx_docs::{DocTree, TraitPath};
use implidx_fragments::{ImplementorFragment, MergePolicy, PendingPolicy};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::{ListOptions, check, list, scan, summarize};

const SNIPPET: &str = r#"impl <a class="trait" href="t.html">Encode</a> for <a class="struct" href="s.html">Vec</a>&lt;u8&gt;"#;

/// Builds a documentation tree with the given trait files.
fn doc_tree(files: &[(&str, DataFile)]) -> (TempDir, DocTree) {
	let dir = tempfile::tempdir().unwrap();
	fs::create_dir(dir.path().join("implementors")).unwrap();
	let tree = DocTree::open(dir.path()).unwrap();
	for (trait_path, file) in files {
		let target = tree.path_of(&TraitPath::parse(trait_path).unwrap());
		fs::create_dir_all(target.parent().unwrap()).unwrap();
		fs::write(target, render(file)).unwrap();
	}
	(dir, tree)
}

fn encode_file() -> DataFile {
	DataFile::new(vec![
		ImplementorFragment::new("alpha", [SNIPPET]),
		ImplementorFragment::new("beta", ["impl Encode for B"]),
		ImplementorFragment::new("alpha", ["impl Encode for A2"]),
	])
}

fn run_list(tree: &DocTree, trait_path: &str, opts: &ListOptions) -> anyhow::Result<String> {
	let mut out = Vec::new();
	list(tree, &TraitPath::parse(trait_path).unwrap(), opts, &mut out)?;
	Ok(String::from_utf8(out).unwrap())
}

#[test]
fn list_prints_plain_text_in_producer_order() {
	let (_dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);

	let output = run_list(&tree, "codec::Encode", &ListOptions::default()).unwrap();

	assert_eq!(
		output,
		"codec::Encode\n  alpha (1)\n    impl Encode for A2\n  beta (1)\n    impl Encode for B\n"
	);
}

#[test]
fn list_union_merges_repeated_producer() {
	let (_dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);
	let opts = ListOptions {
		merge: MergePolicy::Union,
		producer: Some("alpha".into()),
		..ListOptions::default()
	};

	let output = run_list(&tree, "codec::Encode", &opts).unwrap();

	assert_eq!(
		output,
		"codec::Encode\n  alpha (2)\n    impl Encode for Vec<u8>\n    impl Encode for A2\n"
	);
}

#[test]
fn deferred_listing_matches_immediate_listing() {
	let (_dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);

	let immediate = run_list(&tree, "codec::Encode", &ListOptions::default()).unwrap();
	for pending in [PendingPolicy::LatestWins, PendingPolicy::Queue] {
		let opts = ListOptions {
			defer: true,
			pending,
			..ListOptions::default()
		};
		assert_eq!(run_list(&tree, "codec::Encode", &opts).unwrap(), immediate, "pending = {pending}");
	}
}

#[test]
fn deferred_queue_delivers_everything() {
	let (_dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);
	let opts = ListOptions {
		defer: true,
		pending: PendingPolicy::Queue,
		raw: true,
		..ListOptions::default()
	};

	let output = run_list(&tree, "codec::Encode", &opts).unwrap();

	assert!(output.contains("  beta (1)\n"));
	assert!(output.contains("    impl Encode for A2\n"));
	assert!(!output.contains(SNIPPET), "replace policy drops alpha's first listing");
}

#[test]
fn list_unknown_producer_fails() {
	let (_dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);
	let opts = ListOptions {
		producer: Some("gamma".into()),
		..ListOptions::default()
	};
	let err = run_list(&tree, "codec::Encode", &opts).unwrap_err();
	assert!(err.to_string().contains("gamma"));
}

#[test]
fn scan_summarizes_each_trait() {
	let (_dir, tree) = doc_tree(&[
		("codec::Encode", encode_file()),
		("codec::Decode", DataFile::new(vec![ImplementorFragment::empty("alpha")])),
	]);

	let summaries = summarize(&tree).unwrap();
	let names: Vec<&str> = summaries.iter().map(|s| s.trait_path.as_str()).collect();
	assert_eq!(names, ["codec::Decode", "codec::Encode"]);
	assert_eq!(summaries[1].implementors, 3);

	let mut out = Vec::new();
	scan(&tree, true, &mut out).unwrap();
	let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
	assert_eq!(json[0]["trait"], "codec::Decode");
	assert_eq!(json[1]["producers"][1]["name"], "beta");
}

#[test]
fn check_counts_broken_files() {
	let (dir, tree) = doc_tree(&[("codec::Encode", encode_file())]);
	let broken = dir.path().join("implementors/codec/trait.Broken.js");
	fs::write(&broken, "var implementors = {\"a\": [").unwrap();

	let mut out = Vec::new();
	let failures = check(&tree, &mut out).unwrap();
	let output = String::from_utf8(out).unwrap();

	assert_eq!(failures, 1);
	assert!(output.contains("FAIL  codec::Broken"));
	assert!(output.contains("ok    codec::Encode"));
}
