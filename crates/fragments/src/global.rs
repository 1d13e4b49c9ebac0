//! Process-wide registry and link-time fragment submission.
//!
//! Crates that ship implementor data can declare it with [`implementors!`](crate::implementors);
//! the declaration is collected through `inventory` and registered by
//! [`load_static_fragments`] when the consumer asks for it.

use std::sync::{Arc, OnceLock};

use crate::{FragmentRegistry, ImplementorFragment, PendingPolicy, Registration, RegistrationSink, RegistryError};

static GLOBAL: OnceLock<FragmentRegistry> = OnceLock::new();

const GLOBAL_LABEL: &str = "global";

/// Creates the process-wide registry with `policy`.
///
/// Must run before the first [`global`] call; afterwards the policy is fixed.
pub fn init_global(policy: PendingPolicy) -> Result<&'static FragmentRegistry, RegistryError> {
	let mut created = false;
	let registry = GLOBAL.get_or_init(|| {
		created = true;
		FragmentRegistry::with_policy(GLOBAL_LABEL, policy)
	});
	if !created {
		return Err(RegistryError::AlreadyInitialized { label: GLOBAL_LABEL });
	}
	tracing::debug!(%policy, "global registry initialized");
	Ok(registry)
}

/// Returns the process-wide registry, creating it with the default policy if needed.
pub fn global() -> &'static FragmentRegistry {
	GLOBAL.get_or_init(|| FragmentRegistry::new(GLOBAL_LABEL))
}

/// Registers a fragment with the process-wide registry.
pub fn register_fragment(fragment: ImplementorFragment) -> Registration {
	global().register(fragment)
}

/// Installs the process-wide sink, draining anything parked before it.
pub fn install_global_sink(sink: Arc<dyn RegistrationSink>) -> Result<usize, RegistryError> {
	global().install_sink(sink)
}

/// Implementor listing embedded in a binary at compile time.
#[derive(Debug)]
pub struct StaticFragment {
	pub producer: &'static str,
	pub implementors: &'static [&'static str],
}

inventory::collect!(StaticFragment);

impl StaticFragment {
	pub const fn new(producer: &'static str, implementors: &'static [&'static str]) -> Self {
		Self { producer, implementors }
	}

	pub fn to_fragment(&self) -> ImplementorFragment {
		ImplementorFragment::new(self.producer, self.implementors.iter().copied())
	}
}

/// Every fragment submitted with [`implementors!`](crate::implementors), sorted by producer.
///
/// Link order is unspecified, so the sort keeps registration deterministic.
pub fn static_fragments() -> Vec<&'static StaticFragment> {
	let mut fragments: Vec<&'static StaticFragment> = inventory::iter::<StaticFragment>.into_iter().collect();
	fragments.sort_by(|a, b| a.producer.cmp(b.producer));
	fragments
}

/// Registers every link-time fragment with `registry` as one batch.
///
/// The batch parks as a unit, so a single-slot registry keeps all of them.
pub fn load_static_fragments(registry: &FragmentRegistry) -> Registration {
	let fragments = static_fragments();
	tracing::debug!(registry = registry.label(), count = fragments.len(), "loading static fragments");
	registry.register_batch(fragments.into_iter().map(StaticFragment::to_fragment))
}

/// Declares a crate's implementor listing at link time.
///
/// ```ignore
/// implidx_fragments::implementors!("rowdy" => [
///     "impl FromPrimitive for Weekday",
///     "impl FromPrimitive for BigUint",
/// ]);
/// ```
#[macro_export]
macro_rules! implementors {
	($producer:expr => [$($implementor:expr),* $(,)?]) => {
		$crate::inventory::submit! {
			$crate::StaticFragment::new($producer, &[$($implementor),*])
		}
	};
}
