//! Consumer-side implementor index.
//!
//! # Role
//!
//! [`ImplementorIndex`] is the sink a documentation viewer installs on a
//! [`FragmentRegistry`](crate::FragmentRegistry). It merges each delivered fragment into a
//! producer-keyed listing and publishes the result as an immutable [`IndexSnapshot`].
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the current snapshot).
//! - **Writes:** Lock-free, CAS retry loop per merged fragment.
//!
//! # Invariants
//!
//! - Producers keep the position at which they were first merged.
//! - A producer's listing keeps the emission order of the fragment(s) it came from.
//! - A fragment with no implementors still creates an (empty) entry for its producer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{ImplementorFragment, RegistrationSink};

/// How a fragment for an already-indexed producer is merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
	/// The newer listing replaces the older one.
	#[default]
	Replace,
	/// Entries not yet listed are appended in order.
	Union,
	/// The first listing for a producer is kept; later ones are ignored.
	KeepFirst,
}

impl std::fmt::Display for MergePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MergePolicy::Replace => write!(f, "replace"),
			MergePolicy::Union => write!(f, "union"),
			MergePolicy::KeepFirst => write!(f, "keep-first"),
		}
	}
}

impl std::str::FromStr for MergePolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"replace" => Ok(Self::Replace),
			"union" => Ok(Self::Union),
			"keep-first" => Ok(Self::KeepFirst),
			other => Err(format!("unknown merge policy '{other}' (expected 'replace', 'union' or 'keep-first')")),
		}
	}
}

/// Result of merging one fragment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MergeOutcome {
	/// Producer was new; listing inserted.
	Inserted,
	/// Producer existed; listing replaced.
	Replaced,
	/// Producer existed; this many new entries were appended.
	Extended(usize),
	/// Producer existed; listing left untouched.
	Kept,
}

/// Producer-ordered listing.
pub type Listing = Arc<[Box<str>]>;

/// Immutable view of the index at one point in time.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
	by_producer: IndexMap<Box<str>, Listing, FxBuildHasher>,
	generation: u64,
}

impl IndexSnapshot {
	/// Listing for `producer`, if it has been merged.
	#[inline]
	pub fn get(&self, producer: &str) -> Option<&Listing> {
		self.by_producer.get(producer)
	}

	/// Iterates producers and listings in first-merged order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Box<str>])> {
		self.by_producer.iter().map(|(k, v)| (&**k, &**v))
	}

	pub fn len(&self) -> usize {
		self.by_producer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_producer.is_empty()
	}

	/// Number of accepted merges that produced this snapshot.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Sum of all listing lengths.
	pub fn total_implementors(&self) -> usize {
		self.by_producer.values().map(|l| l.len()).sum()
	}

	/// Snapshot after merging `fragment`; `None` when the merge changes nothing.
	fn merged(&self, fragment: &ImplementorFragment, policy: MergePolicy) -> (MergeOutcome, Option<Self>) {
		let producer = fragment.producer();
		let incoming = fragment.implementors();

		let (outcome, listing) = match (self.by_producer.get(producer), policy) {
			(None, _) => (MergeOutcome::Inserted, Listing::from(incoming)),
			(Some(_), MergePolicy::KeepFirst) => return (MergeOutcome::Kept, None),
			(Some(existing), MergePolicy::Replace) => {
				if **existing == *incoming {
					return (MergeOutcome::Replaced, None);
				}
				(MergeOutcome::Replaced, Listing::from(incoming))
			}
			(Some(existing), MergePolicy::Union) => {
				let mut seen: FxHashSet<&str> = existing.iter().map(|s| &**s).collect();
				let mut combined: Vec<Box<str>> = existing.to_vec();
				for entry in incoming {
					if seen.insert(&**entry) {
						combined.push(entry.clone());
					}
				}
				let added = combined.len() - existing.len();
				if added == 0 {
					return (MergeOutcome::Extended(0), None);
				}
				(MergeOutcome::Extended(added), Listing::from(combined))
			}
		};

		let mut by_producer = self.by_producer.clone();
		by_producer.insert(producer.into(), listing);
		let next = Self {
			by_producer,
			generation: self.generation + 1,
		};
		(outcome, Some(next))
	}
}

/// Merging sink over an atomically swapped [`IndexSnapshot`].
pub struct ImplementorIndex {
	label: &'static str,
	snap: ArcSwap<IndexSnapshot>,
	policy: MergePolicy,
	merges: AtomicU64,
}

impl ImplementorIndex {
	/// Creates an empty index with [`MergePolicy::Replace`].
	pub fn new(label: &'static str) -> Self {
		Self::with_policy(label, MergePolicy::default())
	}

	/// Creates an empty index with the given merge policy.
	pub fn with_policy(label: &'static str, policy: MergePolicy) -> Self {
		Self {
			label,
			snap: ArcSwap::from_pointee(IndexSnapshot::default()),
			policy,
			merges: AtomicU64::new(0),
		}
	}

	/// Merges one fragment with linearizable semantics.
	pub fn merge(&self, fragment: &ImplementorFragment) -> MergeOutcome {
		loop {
			let old = self.snap.load_full();

			let (outcome, next) = old.merged(fragment, self.policy);
			let Some(next) = next else {
				trace!(index = self.label, producer = fragment.producer(), "fragment left listing unchanged");
				return outcome;
			};

			let next = Arc::new(next);
			let prev = self.snap.compare_and_swap(&old, Arc::clone(&next));
			if Arc::ptr_eq(&prev, &old) {
				self.merges.fetch_add(1, Ordering::Relaxed);
				debug!(
					index = self.label,
					producer = fragment.producer(),
					?outcome,
					generation = next.generation(),
					"fragment merged"
				);
				return outcome;
			}
			// CAS lost to a concurrent merge, rebuild from the newer snapshot
		}
	}

	/// Returns the current snapshot.
	#[inline]
	pub fn snapshot(&self) -> Arc<IndexSnapshot> {
		self.snap.load_full()
	}

	/// Listing for `producer` in the current snapshot.
	pub fn get(&self, producer: &str) -> Option<Listing> {
		self.snap.load().get(producer).cloned()
	}

	/// Producers in first-merged order.
	pub fn producers(&self) -> Vec<Box<str>> {
		self.snap.load().by_producer.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn total_implementors(&self) -> usize {
		self.snap.load().total_implementors()
	}

	/// Number of fragments that changed the index.
	pub fn merges(&self) -> u64 {
		self.merges.load(Ordering::Relaxed)
	}

	pub fn policy(&self) -> MergePolicy {
		self.policy
	}
}

impl RegistrationSink for ImplementorIndex {
	fn register(&self, fragment: ImplementorFragment) {
		self.merge(&fragment);
	}
}

impl std::fmt::Debug for ImplementorIndex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ImplementorIndex")
			.field("label", &self.label)
			.field("policy", &self.policy)
			.field("producers", &self.len())
			.field("merges", &self.merges())
			.finish()
	}
}
