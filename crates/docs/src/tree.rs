use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::datafile::{self, DataFile};
use crate::error::{DocsError, Result};
use crate::trait_path::TraitPath;

/// Name of the directory holding per-trait data files.
pub const IMPLEMENTORS_DIR: &str = "implementors";

/// One discovered data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitFile {
	pub trait_path: TraitPath,
	pub path: PathBuf,
}

/// Documentation output directory containing an `implementors/` tree.
#[derive(Debug, Clone)]
pub struct DocTree {
	root: PathBuf,
	implementors: PathBuf,
}

impl DocTree {
	/// Opens a documentation root. Fails if it has no `implementors` directory.
	pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
		let root = root.into();
		let implementors = root.join(IMPLEMENTORS_DIR);
		if !implementors.is_dir() {
			return Err(DocsError::MissingImplementorsDir(root));
		}
		Ok(Self { root, implementors })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn implementors_dir(&self) -> &Path {
		&self.implementors
	}

	/// All `trait.*.js` files, sorted by trait path.
	pub fn trait_files(&self) -> Result<Vec<TraitFile>> {
		let mut files = Vec::new();
		for entry in WalkDir::new(&self.implementors).follow_links(true) {
			let entry = entry?;
			if !entry.file_type().is_file() {
				continue;
			}
			let Ok(relative) = entry.path().strip_prefix(&self.implementors) else {
				continue;
			};
			match TraitPath::from_data_file(relative) {
				Some(trait_path) => files.push(TraitFile {
					trait_path,
					path: entry.path().to_path_buf(),
				}),
				None => trace!(path = %entry.path().display(), "skipping non-trait file"),
			}
		}
		files.sort_by(|a, b| a.trait_path.cmp(&b.trait_path));
		debug!(root = %self.root.display(), count = files.len(), "discovered trait data files");
		Ok(files)
	}

	/// Path of the data file for `trait_path`, whether or not it exists.
	pub fn path_of(&self, trait_path: &TraitPath) -> PathBuf {
		self.implementors.join(trait_path.data_file())
	}

	/// Reads and parses the data file for `trait_path`.
	pub fn load(&self, trait_path: &TraitPath) -> Result<DataFile> {
		let path = self.path_of(trait_path);
		if !path.is_file() {
			return Err(DocsError::UnknownTrait(trait_path.to_string()));
		}
		load_file(&path)
	}
}

/// Reads and parses one data file.
pub fn load_file(path: &Path) -> Result<DataFile> {
	let src = fs::read_to_string(path).map_err(|source| DocsError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let file = datafile::parse(&src).map_err(|source| DocsError::Parse {
		path: path.to_path_buf(),
		source,
	})?;
	trace!(path = %path.display(), fragments = file.fragments().len(), "loaded data file");
	Ok(file)
}
