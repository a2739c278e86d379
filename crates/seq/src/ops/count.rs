use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::overflow;
use crate::Result;
use crate::capability::probe_count;
use crate::handle::{SequenceHandle, ensure_active, until_cancelled};
use crate::numeric::Summand;
#[cfg(feature = "deep-cancellation")]
use crate::project::AwaitWithCancellation;
use crate::project::{Await, Map, Projector};
use crate::sequence::AsyncSequence;

/// Number of elements in `source`.
///
/// Answered from an indexed, partition or sized capability when the source has one; otherwise
/// counts a full pass.
pub async fn count<S>(source: &S, cancel: &CancellationToken) -> Result<usize>
where
	S: AsyncSequence + ?Sized,
{
	ensure_active(cancel)?;
	if let Some(count) = probe_count("count", source, false, cancel).await? {
		return Ok(count);
	}
	tally(source, Map(|_: &S::Item| true), cancel).await
}

/// Number of elements satisfying `predicate`.
pub async fn count_where<S, F>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<usize>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> bool,
{
	tally(source, Map(predicate), cancel).await
}

/// Number of elements satisfying an asynchronous `predicate`.
pub async fn count_where_await<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<usize>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	tally(source, Await(predicate), cancel).await
}

/// Number of elements satisfying an asynchronous `predicate` that observes `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn count_where_await_with_cancellation<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<usize>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	tally(source, AwaitWithCancellation(predicate), cancel).await
}

/// Number of elements in `source` as a 64-bit count.
pub async fn long_count<S>(source: &S, cancel: &CancellationToken) -> Result<u64>
where
	S: AsyncSequence + ?Sized,
{
	ensure_active(cancel)?;
	if let Some(count) = probe_count("long_count", source, false, cancel).await? {
		return u64::try_from(count).map_err(|_| overflow(u64::DOMAIN));
	}
	tally(source, Map(|_: &S::Item| true), cancel).await
}

/// 64-bit number of elements satisfying `predicate`.
pub async fn long_count_where<S, F>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<u64>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> bool,
{
	tally(source, Map(predicate), cancel).await
}

/// 64-bit number of elements satisfying an asynchronous `predicate`.
pub async fn long_count_where_await<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<u64>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	tally(source, Await(predicate), cancel).await
}

/// 64-bit number of elements satisfying an asynchronous `predicate` that observes `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn long_count_where_await_with_cancellation<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<u64>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	tally(source, AwaitWithCancellation(predicate), cancel).await
}

/// Counts qualifying elements in one pass with a checked accumulator of width `N`.
async fn tally<N, S, P>(source: &S, mut predicate: P, cancel: &CancellationToken) -> Result<N>
where
	N: Summand,
	S: AsyncSequence + ?Sized,
	P: for<'a> Projector<&'a S::Item, Output = bool>,
{
	let mut handle = SequenceHandle::open(source, cancel)?;
	let mut count = N::ZERO;
	while handle.advance().await? {
		let Some(item) = handle.current() else { continue };
		if until_cancelled(cancel, predicate.project(item, cancel)).await? {
			count = count.checked_sum(N::ONE).ok_or_else(|| overflow(N::DOMAIN))?;
		}
	}
	Ok(count)
}
