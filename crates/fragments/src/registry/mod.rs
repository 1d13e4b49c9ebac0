//! Deliver-or-park registration of implementor fragments.
//!
//! # Role
//!
//! [`FragmentRegistry`] is the late-binding mailbox between fragment producers and the one
//! consumer that merges them. Producers call [`FragmentRegistry::register`] whenever their
//! fragment becomes available; the consumer calls [`FragmentRegistry::install_sink`] once it is
//! ready to accept them.
//!
//! # Invariants
//!
//! - The sink-presence check and the pending-buffer write happen under one lock, so a fragment
//!   is never both parked and delivered, and never parked after installation finished.
//! - Sinks are called with no lock held.
//! - Installation drains until the buffer is empty before publishing the sink, so parked
//!   fragments reach the sink in arrival order and ahead of any later immediate delivery.
//! - Fragments arriving while a sink is being installed join the installer's FIFO and are never
//!   displaced; the pending policy only applies before [`FragmentRegistry::install_sink`] starts.
//! - A batch parks as one unit, so under [`PendingPolicy::LatestWins`] a batch never displaces
//!   its own members.
//! - Under [`PendingPolicy::LatestWins`] a displaced fragment is never delivered. The loss is
//!   reported through [`Registration::Queued`] and [`FragmentRegistry::discarded`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::pending::PendingBuffer;
use crate::{ImplementorFragment, PendingPolicy, RegistrationSink, RegistryError};

/// Outcome of [`FragmentRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
	/// The sink was present and has received the fragment.
	Delivered,
	/// No sink yet; the fragment was parked until one is installed.
	Queued {
		/// Fragments evicted from a single-slot buffer to make room.
		displaced: Vec<ImplementorFragment>,
	},
}

impl Registration {
	#[inline]
	pub fn is_delivered(&self) -> bool {
		matches!(self, Registration::Delivered)
	}

	#[inline]
	pub fn is_queued(&self) -> bool {
		matches!(self, Registration::Queued { .. })
	}
}

enum SinkState {
	Absent,
	Installing,
	Installed(Arc<dyn RegistrationSink>),
}

struct RegistryState {
	sink: SinkState,
	pending: PendingBuffer,
	/// Arrivals while [`SinkState::Installing`], drained by the installer in order.
	arrivals: VecDeque<ImplementorFragment>,
}

/// Injectable registry owning the registration sink and the pending buffer.
pub struct FragmentRegistry {
	label: &'static str,
	state: Mutex<RegistryState>,
	delivered: AtomicU64,
	discarded: AtomicU64,
}

impl FragmentRegistry {
	/// Creates a registry with the single-slot [`PendingPolicy::LatestWins`] buffer.
	pub fn new(label: &'static str) -> Self {
		Self::with_policy(label, PendingPolicy::default())
	}

	/// Creates a registry with the given pending policy.
	pub fn with_policy(label: &'static str, policy: PendingPolicy) -> Self {
		Self {
			label,
			state: Mutex::new(RegistryState {
				sink: SinkState::Absent,
				pending: PendingBuffer::new(policy),
				arrivals: VecDeque::new(),
			}),
			delivered: AtomicU64::new(0),
			discarded: AtomicU64::new(0),
		}
	}

	/// Hands a fragment to the sink, or parks it if no sink is installed yet.
	pub fn register(&self, fragment: ImplementorFragment) -> Registration {
		self.register_batch([fragment])
	}

	/// Registers fragments that were produced together, such as every producer of one data file.
	///
	/// The batch is delivered or parked as a unit: under [`PendingPolicy::LatestWins`] it
	/// displaces whatever was parked before it, but never its own members.
	pub fn register_batch<I>(&self, batch: I) -> Registration
	where
		I: IntoIterator<Item = ImplementorFragment>,
	{
		let mut guard = self.state.lock();
		let state = &mut *guard;

		let installed = match &state.sink {
			SinkState::Installed(sink) => Some(Arc::clone(sink)),
			SinkState::Absent | SinkState::Installing => None,
		};

		let Some(sink) = installed else {
			if matches!(state.sink, SinkState::Installing) {
				let before = state.arrivals.len();
				state.arrivals.extend(batch);
				let count = state.arrivals.len() - before;
				drop(guard);
				debug!(registry = self.label, count, "fragments queued for the installing sink");
				return Registration::Queued { displaced: Vec::new() };
			}

			let displaced = state.pending.push(batch);
			let pending = state.pending.len();
			drop(guard);

			self.report_displaced(&displaced);
			debug!(registry = self.label, pending, "fragments parked");
			return Registration::Queued { displaced };
		};
		drop(guard);

		for fragment in batch {
			debug!(registry = self.label, producer = fragment.producer(), count = fragment.len(), "fragment delivered");
			sink.register(fragment);
			self.delivered.fetch_add(1, Ordering::Relaxed);
		}
		Registration::Delivered
	}

	fn report_displaced(&self, displaced: &[ImplementorFragment]) {
		for lost in displaced {
			self.discarded.fetch_add(1, Ordering::Relaxed);
			warn!(
				registry = self.label,
				displaced = lost.producer(),
				"pending slot overwritten; displaced fragment will not be delivered"
			);
		}
	}

	/// Installs the consumer's sink and drains the pending buffer into it.
	///
	/// Returns the number of fragments delivered during installation: the parked ones plus any
	/// that arrived while it ran.
	pub fn install_sink(&self, sink: Arc<dyn RegistrationSink>) -> Result<usize, RegistryError> {
		{
			let mut state = self.state.lock();
			if !matches!(state.sink, SinkState::Absent) {
				return Err(RegistryError::SinkAlreadyInstalled { label: self.label });
			}
			state.sink = SinkState::Installing;
		}

		let mut guard = InstallGuard {
			registry: self,
			armed: true,
		};
		let mut drained = 0usize;

		loop {
			let batch = {
				let mut state = self.state.lock();
				let mut batch = state.pending.drain();
				batch.extend(state.arrivals.drain(..));
				if batch.is_empty() {
					state.sink = SinkState::Installed(Arc::clone(&sink));
					break;
				}
				batch
			};

			for fragment in batch {
				sink.register(fragment);
				drained += 1;
				self.delivered.fetch_add(1, Ordering::Relaxed);
			}
		}
		guard.armed = false;

		info!(registry = self.label, drained, "registration sink installed");
		Ok(drained)
	}

	/// Removes every parked fragment without delivering it.
	///
	/// For consumers that pick up the pending buffer themselves instead of installing a sink.
	pub fn take_pending(&self) -> Vec<ImplementorFragment> {
		let drained = self.state.lock().pending.drain();
		if !drained.is_empty() {
			debug!(registry = self.label, count = drained.len(), "pending fragments taken");
		}
		drained
	}

	/// Returns a copy of the parked fragments, oldest first.
	pub fn pending(&self) -> Vec<ImplementorFragment> {
		self.state.lock().pending.snapshot()
	}

	pub fn pending_len(&self) -> usize {
		self.state.lock().pending.len()
	}

	/// Returns true once installation has completed.
	pub fn has_sink(&self) -> bool {
		matches!(self.state.lock().sink, SinkState::Installed(_))
	}

	/// Number of fragments handed to the sink so far.
	pub fn delivered(&self) -> u64 {
		self.delivered.load(Ordering::Relaxed)
	}

	/// Number of fragments dropped by single-slot overwrites.
	pub fn discarded(&self) -> u64 {
		self.discarded.load(Ordering::Relaxed)
	}

	pub fn policy(&self) -> PendingPolicy {
		self.state.lock().pending.policy()
	}

	pub fn label(&self) -> &'static str {
		self.label
	}
}

impl Default for FragmentRegistry {
	fn default() -> Self {
		Self::new("default")
	}
}

impl std::fmt::Debug for FragmentRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		let sink = match state.sink {
			SinkState::Absent => "absent",
			SinkState::Installing => "installing",
			SinkState::Installed(_) => "installed",
		};
		f.debug_struct("FragmentRegistry")
			.field("label", &self.label)
			.field("sink", &sink)
			.field("policy", &state.pending.policy())
			.field("pending", &state.pending.len())
			.field("delivered", &self.delivered())
			.field("discarded", &self.discarded())
			.finish()
	}
}

impl Drop for FragmentRegistry {
	fn drop(&mut self) {
		let state = self.state.get_mut();
		if !state.pending.is_empty() {
			warn!(
				registry = self.label,
				undelivered = state.pending.len(),
				"registry dropped with undelivered fragments"
			);
		}
	}
}

/// Returns the registry to [`SinkState::Absent`] if a sink panics mid-installation.
///
/// Arrivals that were waiting for the installer are parked again under the pending policy.
struct InstallGuard<'a> {
	registry: &'a FragmentRegistry,
	armed: bool,
}

impl Drop for InstallGuard<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		let mut guard = self.registry.state.lock();
		let state = &mut *guard;
		if !matches!(state.sink, SinkState::Installing) {
			return;
		}
		state.sink = SinkState::Absent;
		let arrivals = std::mem::take(&mut state.arrivals);
		let displaced = state.pending.push(arrivals);
		drop(guard);
		self.registry.report_displaced(&displaced);
	}
}
