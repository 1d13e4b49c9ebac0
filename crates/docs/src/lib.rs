//! Implementor data files in a documentation output tree.
//!
//! - [`datafile`]: parse and render one `trait.<Name>.js` file
//! - [`TraitPath`]: `crate::module::Trait` and its file location
//! - [`DocTree`]: discover and load the data files under `implementors/`
//! - [`plain_text`]: readable text from a pre-rendered snippet

pub mod datafile;
mod error;
mod text;
mod trait_path;
mod tree;

pub use datafile::{DataFile, ParseError, ParseErrorKind};
pub use error::{DocsError, Result};
pub use text::plain_text;
pub use trait_path::TraitPath;
pub use tree::{DocTree, IMPLEMENTORS_DIR, TraitFile, load_file};
