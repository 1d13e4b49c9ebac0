use serde::{Deserialize, Serialize};

/// Implementor listing published by a single producer crate.
///
/// The entries are opaque pre-rendered snippets, one per implementing type, in
/// the order the documentation generator emitted them. That order is the
/// display order downstream, so nothing in this crate reorders or deduplicates
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementorFragment {
	producer: Box<str>,
	implementors: Box<[Box<str>]>,
}

impl ImplementorFragment {
	/// Creates a fragment for `producer` from its ordered implementor snippets.
	pub fn new<P, I, S>(producer: P, implementors: I) -> Self
	where
		P: Into<Box<str>>,
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		Self {
			producer: producer.into(),
			implementors: implementors.into_iter().map(Into::into).collect(),
		}
	}

	/// Creates a fragment with no implementors.
	pub fn empty(producer: impl Into<Box<str>>) -> Self {
		Self {
			producer: producer.into(),
			implementors: Box::default(),
		}
	}

	/// Name of the crate that produced this listing.
	#[inline]
	pub fn producer(&self) -> &str {
		&self.producer
	}

	/// Rendered implementor snippets in emission order.
	#[inline]
	pub fn implementors(&self) -> &[Box<str>] {
		&self.implementors
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.implementors.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.implementors.is_empty()
	}

	/// Splits the fragment into its producer name and listing.
	pub fn into_parts(self) -> (Box<str>, Box<[Box<str>]>) {
		(self.producer, self.implementors)
	}
}

impl std::fmt::Display for ImplementorFragment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({} implementors)", self.producer, self.implementors.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preserves_emission_order() {
		let fragment = ImplementorFragment::new("crateA", ["implA2", "implA1", "implA2"]);
		let listed: Vec<&str> = fragment.implementors().iter().map(AsRef::as_ref).collect();
		assert_eq!(listed, ["implA2", "implA1", "implA2"]);
		assert_eq!(fragment.producer(), "crateA");
		assert_eq!(fragment.len(), 3);
	}

	#[test]
	fn empty_fragment_keeps_producer() {
		let fragment = ImplementorFragment::empty("crateB");
		assert!(fragment.is_empty());
		assert_eq!(fragment.to_string(), "crateB (0 implementors)");
	}

	#[test]
	fn serializes_as_producer_and_listing() {
		let fragment = ImplementorFragment::new("rowdy", ["impl Foo for Bar"]);
		let json = serde_json::to_string(&fragment).unwrap();
		assert_eq!(json, r#"{"producer":"rowdy","implementors":["impl Foo for Bar"]}"#);
		let back: ImplementorFragment = serde_json::from_str(&json).unwrap();
		assert_eq!(back, fragment);
	}
}
