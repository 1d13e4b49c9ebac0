//! Holding area for fragments that arrive before a sink is installed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::ImplementorFragment;

/// Overflow policy for the pending buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingPolicy {
	/// Single slot: a new arrival (one fragment or one batch) displaces whatever is parked.
	#[default]
	LatestWins,
	/// Unbounded FIFO: every undelivered fragment is kept in arrival order.
	Queue,
}

impl std::fmt::Display for PendingPolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PendingPolicy::LatestWins => write!(f, "latest-wins"),
			PendingPolicy::Queue => write!(f, "queue"),
		}
	}
}

impl std::str::FromStr for PendingPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"latest-wins" => Ok(Self::LatestWins),
			"queue" => Ok(Self::Queue),
			other => Err(format!("unknown pending policy '{other}' (expected 'latest-wins' or 'queue')")),
		}
	}
}

/// Pending fragments, shaped by a [`PendingPolicy`].
#[derive(Debug)]
pub(crate) struct PendingBuffer {
	policy: PendingPolicy,
	queue: VecDeque<ImplementorFragment>,
}

impl PendingBuffer {
	pub(crate) fn new(policy: PendingPolicy) -> Self {
		Self {
			policy,
			queue: VecDeque::new(),
		}
	}

	#[inline]
	pub(crate) fn policy(&self) -> PendingPolicy {
		self.policy
	}

	/// Parks a batch of fragments, returning whatever it displaced.
	///
	/// Under [`PendingPolicy::LatestWins`] the slot holds the most recent batch, so everything
	/// parked before it is displaced.
	pub(crate) fn push(&mut self, batch: impl IntoIterator<Item = ImplementorFragment>) -> Vec<ImplementorFragment> {
		let displaced = match self.policy {
			PendingPolicy::LatestWins => self.queue.drain(..).collect(),
			PendingPolicy::Queue => Vec::new(),
		};
		self.queue.extend(batch);
		displaced
	}

	/// Removes and returns everything parked, oldest first.
	pub(crate) fn drain(&mut self) -> Vec<ImplementorFragment> {
		self.queue.drain(..).collect()
	}

	pub(crate) fn snapshot(&self) -> Vec<ImplementorFragment> {
		self.queue.iter().cloned().collect()
	}

	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.queue.len()
	}

	#[inline]
	pub(crate) fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}
