use crate::ImplementorFragment;

/// Consumer-side callback that merges delivered fragments into an index.
///
/// Sinks are invoked without any registry lock held, so an implementation may
/// register further fragments from inside [`RegistrationSink::register`].
pub trait RegistrationSink: Send + Sync {
	/// Accepts one fragment. Called exactly once per delivered fragment.
	fn register(&self, fragment: ImplementorFragment);
}

impl<F> RegistrationSink for F
where
	F: Fn(ImplementorFragment) + Send + Sync,
{
	fn register(&self, fragment: ImplementorFragment) {
		self(fragment)
	}
}
