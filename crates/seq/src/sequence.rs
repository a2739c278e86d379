//! Source contract and the optional capabilities operators probe for.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Result;

/// Pull cursor over one enumeration of a source.
///
/// Driven by a single consumer; `next` is never polled concurrently with itself. Consumers reach
/// cursors through [`SequenceHandle`](crate::SequenceHandle), which guarantees `release` runs
/// exactly once.
#[async_trait]
pub trait Cursor: Send {
	/// Element type produced by the cursor.
	type Item: Send;

	/// Produces the next element, or `None` once the source is exhausted. May suspend.
	async fn next(&mut self) -> Result<Option<Self::Item>>;

	/// Releases resources held by the enumeration.
	fn release(&mut self) {}
}

/// Owned, type-erased cursor borrowed from its source.
pub type BoxCursor<'a, T> = Box<dyn Cursor<Item = T> + 'a>;

/// A lazy sequence that can be enumerated by opening a cursor.
///
/// The capability accessors default to `None`; sources override the ones they can answer without
/// enumerating.
pub trait AsyncSequence: Send + Sync {
	/// Element type.
	type Item: Send;

	/// Begins one enumeration. The token is the one the consumer observes.
	fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, Self::Item>;

	/// Length known without enumeration.
	fn as_sized(&self) -> Option<&dyn SizedSource> {
		None
	}

	/// Random access with a known length.
	fn as_indexed(&self) -> Option<&dyn IndexedSource<Self::Item>> {
		None
	}

	/// Partition that answers last-element and count queries itself.
	fn as_partition(&self) -> Option<&dyn Partition<Self::Item>> {
		None
	}
}

/// Source whose length is known without enumerating it.
pub trait SizedSource: Send + Sync {
	/// Number of elements an enumeration would produce.
	fn len(&self) -> usize;

	/// Returns `true` when an enumeration would produce nothing.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Source with O(1) random access.
pub trait IndexedSource<T>: SizedSource {
	/// Element at `index`, or `None` past the end.
	fn item_at(&self, index: usize) -> Option<T>;
}

/// Result of a prior lazy slicing step that can answer some queries without a full pass.
#[async_trait]
pub trait Partition<T>: Send + Sync {
	/// Final element, or `None` for an empty partition.
	async fn try_get_last(&self, cancel: &CancellationToken) -> Result<Option<T>>;

	/// Element count. With `only_if_cheap`, returns `None` instead of doing expensive work.
	async fn count(&self, only_if_cheap: bool, cancel: &CancellationToken) -> Result<Option<usize>>;
}

macro_rules! forward_sequence {
	($($ty:ty),*) => {$(
		impl<S: AsyncSequence + ?Sized> AsyncSequence for $ty {
			type Item = S::Item;

			fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, Self::Item> {
				(**self).open(cancel)
			}

			fn as_sized(&self) -> Option<&dyn SizedSource> {
				(**self).as_sized()
			}

			fn as_indexed(&self) -> Option<&dyn IndexedSource<Self::Item>> {
				(**self).as_indexed()
			}

			fn as_partition(&self) -> Option<&dyn Partition<Self::Item>> {
				(**self).as_partition()
			}
		}
	)*};
}

forward_sequence!(&S, Box<S>, Arc<S>);
