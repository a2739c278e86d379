//! Insertion-ordered multi-map built from one pass over a source.

use std::future::Future;

use hashbrown::HashTable;
use hashbrown::hash_table::Entry;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::comparer::{Equivalence, NaturalEq};
use crate::handle::{SequenceHandle, until_cancelled};
#[cfg(feature = "deep-cancellation")]
use crate::project::AwaitWithCancellation;
use crate::project::{Await, Identity, Map, Projector};
use crate::sequence::AsyncSequence;


/// One key and the elements that mapped to it, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping<K, E> {
	key: K,
	elements: Vec<E>,
}

impl<K, E> Grouping<K, E> {
	/// The key shared by every element of the group.
	pub fn key(&self) -> &K {
		&self.key
	}

	/// Elements in the order the source produced them.
	pub fn elements(&self) -> &[E] {
		&self.elements
	}

	/// Splits the group into its key and elements.
	pub fn into_parts(self) -> (K, Vec<E>) {
		(self.key, self.elements)
	}
}

/// Immutable grouping of a source by key.
///
/// Groups iterate in first-seen key order; keys are compared with `C`. Built once by
/// [`Lookup::build`] and never mutated afterwards.
pub struct Lookup<K, E, C = NaturalEq> {
	groups: Vec<Grouping<K, E>>,
	/// Indices into `groups`, hashed through `comparer`.
	index: HashTable<usize>,
	comparer: C,
}

impl<K, E, C: Equivalence<K>> Lookup<K, E, C> {
	/// Groups `source` in a single pass.
	///
	/// `key` sees each element by reference, `element` then consumes it. The source is released
	/// before this returns, whether it completed or failed.
	pub async fn build<S, KP, EP>(source: &S, mut key: KP, mut element: EP, comparer: C, cancel: &CancellationToken) -> Result<Self>
	where
		S: AsyncSequence + ?Sized,
		KP: for<'a> Projector<&'a S::Item, Output = K>,
		EP: Projector<S::Item, Output = E>,
	{
		let mut lookup = Self {
			groups: Vec::new(),
			index: HashTable::new(),
			comparer,
		};
		let mut elements = 0usize;

		let mut handle = SequenceHandle::open(source, cancel)?;
		while let Some(item) = handle.next().await? {
			let group_key = until_cancelled(cancel, key.project(&item, cancel)).await?;
			let value = until_cancelled(cancel, element.project(item, cancel)).await?;
			lookup.push(group_key, value);
			elements += 1;
		}
		handle.release();

		tracing::trace!(groups = lookup.groups.len(), elements, "seq.lookup.built");
		Ok(lookup)
	}

	fn push(&mut self, key: K, value: E) {
		let Self { groups, index, comparer } = self;
		let hash = comparer.hash(&key);
		let entry = index.entry(
			hash,
			|&slot| comparer.equivalent(&groups[slot].key, &key),
			|&slot| comparer.hash(&groups[slot].key),
		);
		match entry {
			Entry::Occupied(slot) => groups[*slot.get()].elements.push(value),
			Entry::Vacant(vacant) => {
				vacant.insert(groups.len());
				groups.push(Grouping { key, elements: vec![value] });
			}
		}
	}

	fn find(&self, key: &K) -> Option<&Grouping<K, E>> {
		let hash = self.comparer.hash(key);
		self.index
			.find(hash, |&slot| self.comparer.equivalent(&self.groups[slot].key, key))
			.map(|&slot| &self.groups[slot])
	}

	/// Elements grouped under `key`; empty for a key the source never produced.
	pub fn get(&self, key: &K) -> &[E] {
		self.find(key).map(Grouping::elements).unwrap_or_default()
	}

	/// Returns `true` when some element mapped to `key`.
	pub fn contains(&self, key: &K) -> bool {
		self.find(key).is_some()
	}
}

impl<K, E, C> Lookup<K, E, C> {
	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.groups.len()
	}

	/// Returns `true` when the source was empty.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Groups in first-seen key order.
	pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, E>> {
		self.groups.iter()
	}

	/// Distinct keys in first-seen order.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.groups.iter().map(Grouping::key)
	}

	/// Applies `selector` to each group's key and elements, in group order.
	pub fn map_groups<R>(&self, mut selector: impl FnMut(&K, &[E]) -> R) -> Vec<R> {
		self.groups.iter().map(|group| selector(&group.key, &group.elements)).collect()
	}
}

impl<K: std::fmt::Debug, E: std::fmt::Debug, C> std::fmt::Debug for Lookup<K, E, C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.groups).finish()
	}
}

impl<'l, K, E, C> IntoIterator for &'l Lookup<K, E, C> {
	type Item = &'l Grouping<K, E>;
	type IntoIter = std::slice::Iter<'l, Grouping<K, E>>;

	fn into_iter(self) -> Self::IntoIter {
		self.groups.iter()
	}
}

impl<K, E, C> IntoIterator for Lookup<K, E, C> {
	type Item = Grouping<K, E>;
	type IntoIter = std::vec::IntoIter<Grouping<K, E>>;

	fn into_iter(self) -> Self::IntoIter {
		self.groups.into_iter()
	}
}

/// Groups elements by a synchronous key selector, using the key's natural equality.
pub async fn to_lookup<S, F, K>(source: &S, key: F, cancel: &CancellationToken) -> Result<Lookup<K, S::Item>>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> K,
	K: Eq + std::hash::Hash + Send,
{
	Lookup::build(source, Map(key), Identity, NaturalEq, cancel).await
}

/// Groups elements by an asynchronous key selector.
pub async fn to_lookup_await<S, F, Fut, K>(source: &S, key: F, cancel: &CancellationToken) -> Result<Lookup<K, S::Item>>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<K>> + Send,
	K: Eq + std::hash::Hash,
{
	Lookup::build(source, Await(key), Identity, NaturalEq, cancel).await
}

/// Groups elements by an asynchronous key selector that observes `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn to_lookup_await_with_cancellation<S, F, Fut, K>(source: &S, key: F, cancel: &CancellationToken) -> Result<Lookup<K, S::Item>>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<K>> + Send,
	K: Eq + std::hash::Hash,
{
	Lookup::build(source, AwaitWithCancellation(key), Identity, NaturalEq, cancel).await
}

/// Groups projected elements by key under a caller-supplied equality.
pub async fn to_lookup_with<S, KF, EF, K, E, C>(
	source: &S,
	key: KF,
	element: EF,
	comparer: C,
	cancel: &CancellationToken,
) -> Result<Lookup<K, E, C>>
where
	S: AsyncSequence + ?Sized,
	KF: FnMut(&S::Item) -> K,
	EF: FnMut(S::Item) -> E,
	K: Send,
	E: Send,
	C: Equivalence<K>,
{
	Lookup::build(source, Map(key), Map(element), comparer, cancel).await
}

/// Groups elements projected by asynchronous key and element selectors under a caller-supplied
/// equality.
pub async fn to_lookup_with_await<S, KF, KFut, EF, EFut, K, E, C>(
	source: &S,
	key: KF,
	element: EF,
	comparer: C,
	cancel: &CancellationToken,
) -> Result<Lookup<K, E, C>>
where
	S: AsyncSequence + ?Sized,
	KF: FnMut(&S::Item) -> KFut,
	KFut: Future<Output = Result<K>> + Send,
	EF: FnMut(S::Item) -> EFut,
	EFut: Future<Output = Result<E>> + Send,
	C: Equivalence<K>,
{
	Lookup::build(source, Await(key), Await(element), comparer, cancel).await
}

/// Like [`to_lookup_with_await`], with selectors that also observe `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn to_lookup_with_await_with_cancellation<S, KF, KFut, EF, EFut, K, E, C>(
	source: &S,
	key: KF,
	element: EF,
	comparer: C,
	cancel: &CancellationToken,
) -> Result<Lookup<K, E, C>>
where
	S: AsyncSequence + ?Sized,
	KF: FnMut(&S::Item, CancellationToken) -> KFut,
	KFut: Future<Output = Result<K>> + Send,
	EF: FnMut(S::Item, CancellationToken) -> EFut,
	EFut: Future<Output = Result<E>> + Send,
	C: Equivalence<K>,
{
	Lookup::build(source, AwaitWithCancellation(key), AwaitWithCancellation(element), comparer, cancel).await
}
