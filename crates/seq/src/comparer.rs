//! Key equality capabilities used by the lookup.

use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

/// Equality plus a hash consistent with it.
///
/// Keys that are [`equivalent`](Self::equivalent) must produce the same [`hash`](Self::hash).
pub trait Equivalence<K: ?Sized>: Send + Sync {
	/// Returns `true` when `a` and `b` belong in the same group.
	fn equivalent(&self, a: &K, b: &K) -> bool;

	/// Hash of `key`.
	fn hash(&self, key: &K) -> u64;
}

/// The key type's own [`Eq`] and [`Hash`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalEq;

impl<K: Eq + Hash + ?Sized> Equivalence<K> for NaturalEq {
	fn equivalent(&self, a: &K, b: &K) -> bool {
		a == b
	}

	fn hash(&self, key: &K) -> u64 {
		FxBuildHasher.hash_one(key)
	}
}

/// Compares keys through a projection, e.g. `ByKey(|s: &String| s.to_ascii_lowercase())`.
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<K, F, P> Equivalence<K> for ByKey<F>
where
	K: ?Sized,
	F: Fn(&K) -> P + Send + Sync,
	P: Eq + Hash,
{
	fn equivalent(&self, a: &K, b: &K) -> bool {
		(self.0)(a) == (self.0)(b)
	}

	fn hash(&self, key: &K) -> u64 {
		FxBuildHasher.hash_one((self.0)(key))
	}
}
