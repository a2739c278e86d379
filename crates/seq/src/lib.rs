//! Terminal and grouping operators over lazy, cancellable, pull-based async sequences.
//!
//! Every source implements [`AsyncSequence`]: it opens a [`Cursor`] that is pulled one element at
//! a time through a [`SequenceHandle`]. The handle observes a [`CancellationToken`] on every
//! advance and releases the cursor exactly once, on every exit path.
//!
//! Operators consult optional source capabilities before enumerating, strongest first:
//! - [`IndexedSource`]: random access with a known length.
//! - [`Partition`]: a lazily sliced source that can answer "last element" or "count" itself,
//!   optionally only when that answer is free.
//! - [`SizedSource`]: a known length without random access.
//!
//! Sources without any of these are enumerated once, in order.
//!
//! ## Operators
//!
//! - [`count`], [`long_count`] and their predicate variants, [`count_if_cheap`].
//! - [`sum`] and [`sum_by`] across every [`Summand`] domain, including nullable elements.
//! - [`sequence_equal`] and [`sequence_equal_by`].
//! - [`last`], [`last_or_default`] and their predicate variants.
//! - [`is_empty`].
//! - [`to_lookup`] and friends, producing an insertion-ordered [`Lookup`].
//!
//! Predicates and projectors come in three kinds: plain closures, closures returning a future
//! (`*_await`), and closures that also receive the cancellation token
//! (`*_await_with_cancellation`).
//!
//! ## Cargo features
//!
//! - `decimal`: [`Summand`] for `rust_decimal::Decimal`, which raises overflow like the
//!   integral domains.
//!   *Enabled by default.*
//! - `deep-cancellation`: the `*_await_with_cancellation` operator variants.
//!   *Enabled by default.*
//! - `stream`: [`StreamSequence`], a single-use adapter over a `futures::Stream`.
//!   *Enabled by default.*

pub use tokio_util::sync::CancellationToken;

mod capability;
mod comparer;
mod handle;
mod lookup;
mod numeric;
mod ops;
mod project;
mod sequence;
pub mod source;

#[cfg(test)]
mod test_support;

pub use capability::count_if_cheap;
pub use comparer::{ByKey, Equivalence, NaturalEq};
pub use handle::SequenceHandle;
pub use lookup::{Grouping, Lookup, to_lookup, to_lookup_await, to_lookup_with, to_lookup_with_await};
#[cfg(feature = "deep-cancellation")]
pub use lookup::{to_lookup_await_with_cancellation, to_lookup_with_await_with_cancellation};
pub use numeric::{SumValue, Summand};
pub use ops::*;
pub use project::{Await, Identity, Map, Projector};
#[cfg(feature = "deep-cancellation")]
pub use project::AwaitWithCancellation;
pub use sequence::{AsyncSequence, BoxCursor, Cursor, IndexedSource, Partition, SizedSource};
pub use source::{ListSequence, Window};
#[cfg(feature = "stream")]
pub use source::StreamSequence;

/// Boxed error raised by a source or a user-supplied projector.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The cancellation token fired before the operation produced its result.
	#[error("operation was cancelled")]
	Cancelled,
	/// A search without a default found no (matching) element.
	#[error("sequence contains no matching element")]
	NoElements,
	/// A checked accumulator exceeded the range of its numeric domain.
	#[error("arithmetic overflow accumulating {domain}")]
	Overflow {
		/// Name of the numeric domain, e.g. `i32`.
		domain: &'static str,
	},
	/// A single-use source was opened a second time.
	#[error("sequence source was already consumed")]
	AlreadyConsumed,
	/// Failure raised by the underlying source or by a user projector, passed through unchanged.
	#[error(transparent)]
	Source(BoxError),
}

impl Error {
	/// Wraps a source or projector failure.
	pub fn other(err: impl Into<BoxError>) -> Self {
		Self::Source(err.into())
	}

	/// Returns `true` for [`Error::Cancelled`].
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}
