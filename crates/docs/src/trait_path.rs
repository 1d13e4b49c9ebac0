use std::path::{Component, Path, PathBuf};

use crate::error::DocsError;

const FILE_PREFIX: &str = "trait.";
const FILE_SUFFIX: &str = ".js";

/// Fully qualified trait path such as `num_traits::cast::FromPrimitive`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitPath {
	/// Crate followed by modules; never empty.
	modules: Vec<Box<str>>,
	name: Box<str>,
}

impl TraitPath {
	/// Parses `crate::module::Trait`. At least a crate and a trait name are required.
	pub fn parse(path: &str) -> Result<Self, DocsError> {
		let segments: Vec<Box<str>> = path.split("::").map(Into::into).collect();
		Self::from_segments(segments).ok_or_else(|| DocsError::InvalidTraitPath(path.to_owned()))
	}

	/// Recovers the trait path from a data file path relative to the `implementors` directory.
	///
	/// Returns `None` for anything that is not a `trait.<Name>.js` file.
	pub fn from_data_file(relative: &Path) -> Option<Self> {
		let mut segments = Vec::new();
		let mut components = relative.components().peekable();
		while let Some(component) = components.next() {
			let Component::Normal(part) = component else {
				return None;
			};
			let part = part.to_str()?;
			if components.peek().is_none() {
				let name = part.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
				segments.push(Box::from(name));
			} else {
				segments.push(Box::from(part));
			}
		}
		Self::from_segments(segments)
	}

	fn from_segments(mut segments: Vec<Box<str>>) -> Option<Self> {
		if segments.len() < 2 || !segments.iter().all(|s| is_ident(s)) {
			return None;
		}
		let name = segments.pop()?;
		Some(Self { modules: segments, name })
	}

	/// Data file location relative to the `implementors` directory.
	pub fn data_file(&self) -> PathBuf {
		let mut path: PathBuf = self.modules.iter().map(|s| &**s).collect();
		path.push(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", self.name));
		path
	}

	/// Trait name without its module path.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Crate that defines the trait.
	pub fn crate_name(&self) -> &str {
		&self.modules[0]
	}
}

impl std::fmt::Display for TraitPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for module in &self.modules {
			write!(f, "{module}::")?;
		}
		f.write_str(&self.name)
	}
}

impl std::str::FromStr for TraitPath {
	type Err = DocsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

fn is_ident(s: &str) -> bool {
	let mut chars = s.chars();
	matches!(chars.next(), Some(c) if c == '_' || c.is_alphabetic()) && chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::TraitPath;

	#[test]
	fn maps_to_and_from_data_file() {
		let path = TraitPath::parse("num_traits::cast::FromPrimitive").unwrap();
		assert_eq!(path.data_file(), Path::new("num_traits/cast/trait.FromPrimitive.js"));
		assert_eq!(path.name(), "FromPrimitive");
		assert_eq!(path.crate_name(), "num_traits");

		let back = TraitPath::from_data_file(&path.data_file()).unwrap();
		assert_eq!(back, path);
		assert_eq!(back.to_string(), "num_traits::cast::FromPrimitive");
	}

	#[test]
	fn rejects_malformed_paths() {
		for bad in ["", "Display", "core::", "core::fmt::", "core::fmt::Dis play", "::core::fmt"] {
			assert!(TraitPath::parse(bad).is_err(), "{bad:?} should be rejected");
		}
	}

	#[test]
	fn ignores_non_trait_files() {
		assert!(TraitPath::from_data_file(Path::new("core/fmt/README.txt")).is_none());
		assert!(TraitPath::from_data_file(Path::new("core/fmt/struct.Foo.js")).is_none());
		assert!(TraitPath::from_data_file(Path::new("trait.Orphan.js")).is_none());
		assert!(TraitPath::from_data_file(Path::new("../core/trait.Escape.js")).is_none());
	}
}
