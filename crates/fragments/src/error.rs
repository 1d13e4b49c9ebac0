/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A sink was already installed, or an installation is in progress.
	#[error("registry '{label}' already has a registration sink")]
	SinkAlreadyInstalled { label: &'static str },
	/// The registry was already created, so its policy can no longer be chosen.
	#[error("registry '{label}' is already initialized")]
	AlreadyInitialized { label: &'static str },
}
