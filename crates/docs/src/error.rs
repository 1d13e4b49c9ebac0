use std::path::PathBuf;

use thiserror::Error;

use crate::datafile::ParseError;

/// Errors raised while reading a documentation tree.
#[derive(Debug, Error)]
pub enum DocsError {
	#[error("no implementors directory under {0}")]
	MissingImplementorsDir(PathBuf),
	#[error("invalid trait path '{0}' (expected e.g. 'core::fmt::Display')")]
	InvalidTraitPath(String),
	#[error("no data file for trait {0}")]
	UnknownTrait(String),
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to walk documentation tree: {0}")]
	Walk(#[from] walkdir::Error),
	#[error("failed to parse {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: ParseError,
	},
}

/// Result type for documentation tree operations.
pub type Result<T> = std::result::Result<T, DocsError>;
