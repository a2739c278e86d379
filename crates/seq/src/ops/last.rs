use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::handle::{SequenceHandle, ensure_active, until_cancelled};
#[cfg(feature = "deep-cancellation")]
use crate::project::AwaitWithCancellation;
use crate::project::{Await, Map, Projector};
use crate::sequence::AsyncSequence;
use crate::{Error, Result};

/// Final element. Fails with [`Error::NoElements`] on an empty source.
pub async fn last<S>(source: &S, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
{
	try_get_last(source, cancel).await?.ok_or(Error::NoElements)
}

/// Final element, or the default value on an empty source.
pub async fn last_or_default<S>(source: &S, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	S::Item: Default,
{
	Ok(try_get_last(source, cancel).await?.unwrap_or_default())
}

/// Final element satisfying `predicate`. Fails with [`Error::NoElements`] when none does.
pub async fn last_where<S, F>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> bool,
{
	try_get_last_where(source, Map(predicate), cancel).await?.ok_or(Error::NoElements)
}

/// Final element satisfying an asynchronous `predicate`.
pub async fn last_where_await<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	try_get_last_where(source, Await(predicate), cancel).await?.ok_or(Error::NoElements)
}

/// Final element satisfying an asynchronous `predicate` that observes `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn last_where_await_with_cancellation<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	try_get_last_where(source, AwaitWithCancellation(predicate), cancel)
		.await?
		.ok_or(Error::NoElements)
}

/// Final element satisfying `predicate`, or the default value.
pub async fn last_or_default_where<S, F>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	S::Item: Default,
	F: FnMut(&S::Item) -> bool,
{
	Ok(try_get_last_where(source, Map(predicate), cancel).await?.unwrap_or_default())
}

/// Final element satisfying an asynchronous `predicate`, or the default value.
pub async fn last_or_default_where_await<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	S::Item: Default,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	Ok(try_get_last_where(source, Await(predicate), cancel).await?.unwrap_or_default())
}

/// Final element satisfying an asynchronous `predicate` that observes `cancel`, or the default.
#[cfg(feature = "deep-cancellation")]
pub async fn last_or_default_where_await_with_cancellation<S, F, Fut>(source: &S, predicate: F, cancel: &CancellationToken) -> Result<S::Item>
where
	S: AsyncSequence + ?Sized,
	S::Item: Default,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<bool>> + Send,
{
	Ok(try_get_last_where(source, AwaitWithCancellation(predicate), cancel)
		.await?
		.unwrap_or_default())
}

/// Last element via indexed access, the partition's own answer, or a full pass keeping only the
/// most recent element.
async fn try_get_last<S>(source: &S, cancel: &CancellationToken) -> Result<Option<S::Item>>
where
	S: AsyncSequence + ?Sized,
{
	ensure_active(cancel)?;
	if let Some(list) = source.as_indexed() {
		tracing::trace!(operator = "last", path = "indexed", "seq.capability");
		return Ok(list.len().checked_sub(1).and_then(|index| list.item_at(index)));
	}
	if let Some(partition) = source.as_partition() {
		tracing::trace!(operator = "last", path = "partition", "seq.capability");
		return until_cancelled(cancel, partition.try_get_last(cancel)).await;
	}

	let mut handle = SequenceHandle::open(source, cancel)?;
	let mut last = None;
	while let Some(item) = handle.next().await? {
		last = Some(item);
	}
	Ok(last)
}

/// Satisfaction is only known after evaluating the predicate, so this always takes a full pass.
async fn try_get_last_where<S, P>(source: &S, mut predicate: P, cancel: &CancellationToken) -> Result<Option<S::Item>>
where
	S: AsyncSequence + ?Sized,
	P: for<'a> Projector<&'a S::Item, Output = bool>,
{
	let mut handle = SequenceHandle::open(source, cancel)?;
	let mut last = None;
	while let Some(item) = handle.next().await? {
		if until_cancelled(cancel, predicate.project(&item, cancel)).await? {
			last = Some(item);
		}
	}
	Ok(last)
}
