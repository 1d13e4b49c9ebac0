//! Deferred registration of trait-implementor fragments.
//!
//! Documentation output is assembled per trait from many small fragments, one per producing
//! crate. Fragments can become available before the consumer that indexes them is ready, so
//! this crate provides the mailbox between the two:
//!
//! - [`ImplementorFragment`]: producer name plus ordered, opaque implementor snippets
//! - [`RegistrationSink`]: consumer callback that accepts delivered fragments
//! - [`FragmentRegistry`]: delivers immediately when a sink exists, parks otherwise
//! - [`PendingPolicy`]: single-slot (`LatestWins`) or queued parking
//! - [`ImplementorIndex`]: a merging sink with lock-free snapshot reads
//! - [`global`]: a process-wide registry plus [`implementors!`] for link-time fragments

mod error;
mod fragment;
mod global;
pub mod index;
mod pending;
mod registry;
mod sink;

pub use error::RegistryError;
pub use fragment::ImplementorFragment;
pub use global::{
	StaticFragment, global, init_global, install_global_sink, load_static_fragments, register_fragment, static_fragments,
};
pub use index::{ImplementorIndex, IndexSnapshot, MergeOutcome, MergePolicy};
#[doc(hidden)]
pub use inventory;
pub use pending::PendingPolicy;
pub use registry::{FragmentRegistry, Registration};
pub use sink::RegistrationSink;
