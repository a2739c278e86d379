use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::overflow;
use crate::Result;
use crate::handle::{SequenceHandle, until_cancelled};
use crate::numeric::{SumValue, Summand};
#[cfg(feature = "deep-cancellation")]
use crate::project::AwaitWithCancellation;
use crate::project::{Await, Map, Projector};
use crate::sequence::AsyncSequence;

/// Sum of the elements. Absent nullable elements count as zero; the result is always present.
///
/// Integral and decimal domains fail with [`Error::Overflow`](crate::Error::Overflow) at the
/// element that leaves the representable range; floating point domains never fail.
pub async fn sum<S>(source: &S, cancel: &CancellationToken) -> Result<<S::Item as SumValue>::Sum>
where
	S: AsyncSequence + ?Sized,
	S::Item: SumValue,
{
	accumulate(source, Map(|value: &S::Item| *value), cancel).await
}

/// Sum of `selector` applied to each element.
pub async fn sum_by<S, F, V>(source: &S, selector: F, cancel: &CancellationToken) -> Result<V::Sum>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> V,
	V: SumValue,
{
	accumulate(source, Map(selector), cancel).await
}

/// Sum of an asynchronous `selector` applied to each element.
pub async fn sum_by_await<S, F, Fut, V>(source: &S, selector: F, cancel: &CancellationToken) -> Result<V::Sum>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item) -> Fut,
	Fut: Future<Output = Result<V>> + Send,
	V: SumValue,
{
	accumulate(source, Await(selector), cancel).await
}

/// Sum of an asynchronous `selector` that observes `cancel`.
#[cfg(feature = "deep-cancellation")]
pub async fn sum_by_await_with_cancellation<S, F, Fut, V>(source: &S, selector: F, cancel: &CancellationToken) -> Result<V::Sum>
where
	S: AsyncSequence + ?Sized,
	F: FnMut(&S::Item, CancellationToken) -> Fut,
	Fut: Future<Output = Result<V>> + Send,
	V: SumValue,
{
	accumulate(source, AwaitWithCancellation(selector), cancel).await
}

async fn accumulate<S, P, V>(source: &S, mut selector: P, cancel: &CancellationToken) -> Result<V::Sum>
where
	S: AsyncSequence + ?Sized,
	P: for<'a> Projector<&'a S::Item, Output = V>,
	V: SumValue,
{
	let mut handle = SequenceHandle::open(source, cancel)?;
	let mut total = <V::Sum as Summand>::ZERO;
	while handle.advance().await? {
		let Some(item) = handle.current() else { continue };
		let value = until_cancelled(cancel, selector.project(item, cancel)).await?.into_summand();
		total = total.checked_sum(value).ok_or_else(|| overflow(<V::Sum as Summand>::DOMAIN))?;
	}
	Ok(total)
}
