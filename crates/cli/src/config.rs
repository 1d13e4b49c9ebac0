//! User configuration.
//!
//! Read from `$IMPLIDX_CONFIG` if set, otherwise `<config dir>/implidx/config.toml`.
//! A missing file yields the defaults; command-line flags override anything set here.
//!
//! ```toml
//! docs_root = "target/doc"
//! pending = "queue"        # or "latest-wins"
//! merge = "union"          # or "replace", "keep-first"
//! defer = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use implidx_fragments::{MergePolicy, PendingPolicy};
use serde::Deserialize;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "IMPLIDX_CONFIG";

const DEFAULT_DOCS_ROOT: &str = "target/doc";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Documentation root used when `--docs` is not given.
	pub docs_root: Option<PathBuf>,
	pub pending: PendingPolicy,
	pub merge: MergePolicy,
	/// Register fragments before installing the index sink.
	pub defer: bool,
}

impl Config {
	/// Loads the config from `explicit`, the environment override, or the default location.
	pub fn load(explicit: Option<&Path>) -> Result<Self> {
		let path = match explicit {
			Some(path) => Some(path.to_path_buf()),
			None => std::env::var_os(CONFIG_ENV).map(PathBuf::from).or_else(default_path),
		};

		match path {
			Some(path) if path.exists() => Self::from_file(&path),
			Some(path) if explicit.is_some() => anyhow::bail!("config file {} does not exist", path.display()),
			_ => Ok(Self::default()),
		}
	}

	pub fn from_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
		let config = Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))?;
		tracing::debug!(path = %path.display(), ?config, "config loaded");
		Ok(config)
	}

	pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(content)
	}

	/// Documentation root: the flag if given, else the configured root, else `target/doc`.
	pub fn docs_root(&self, flag: Option<PathBuf>) -> PathBuf {
		flag.or_else(|| self.docs_root.clone())
			.unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_ROOT))
	}
}

fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("implidx").join("config.toml"))
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use implidx_fragments::{MergePolicy, PendingPolicy};
	use pretty_assertions::assert_eq;

	use super::Config;

	#[test]
	fn empty_config_is_default() {
		assert_eq!(Config::parse("").unwrap(), Config::default());
		assert_eq!(Config::default().pending, PendingPolicy::LatestWins);
		assert_eq!(Config::default().merge, MergePolicy::Replace);
	}

	#[test]
	fn parses_all_keys() {
		let config = Config::parse(
			r#"
docs_root = "out/doc"
pending = "queue"
merge = "keep-first"
defer = true
"#,
		)
		.unwrap();
		assert_eq!(
			config,
			Config {
				docs_root: Some(PathBuf::from("out/doc")),
				pending: PendingPolicy::Queue,
				merge: MergePolicy::KeepFirst,
				defer: true,
			}
		);
	}

	#[test]
	fn rejects_unknown_keys_and_values() {
		assert!(Config::parse("pendng = \"queue\"").is_err());
		assert!(Config::parse("merge = \"append\"").is_err());
	}

	#[test]
	fn flag_overrides_configured_docs_root() {
		let config = Config {
			docs_root: Some(PathBuf::from("configured")),
			..Config::default()
		};
		assert_eq!(config.docs_root(Some(PathBuf::from("flag"))), PathBuf::from("flag"));
		assert_eq!(config.docs_root(None), PathBuf::from("configured"));
		assert_eq!(Config::default().docs_root(None), PathBuf::from("target/doc"));
	}

	#[test]
	fn explicit_missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());

		let path = dir.path().join("config.toml");
		std::fs::write(&path, "defer = true\n").unwrap();
		assert!(Config::load(Some(&path)).unwrap().defer);
	}
}
