//! Ordered capability dispatch shared by the operators.
//!
//! Strongest capability first: indexed, then partition, then sized. Callers fall back to a full
//! pass when the chain has no answer.

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::handle::{ensure_active, until_cancelled};
use crate::sequence::AsyncSequence;

/// Length known from a synchronous capability (indexed or sized).
pub(crate) fn known_len<S: AsyncSequence + ?Sized>(source: &S) -> Option<usize> {
	if let Some(list) = source.as_indexed() {
		return Some(list.len());
	}
	source.as_sized().map(|sized| sized.len())
}

/// Count answered by the capability chain, without enumerating through a handle.
///
/// With `only_if_cheap`, a partition may decline by returning `None`.
pub(crate) async fn probe_count<S>(operator: &'static str, source: &S, only_if_cheap: bool, cancel: &CancellationToken) -> Result<Option<usize>>
where
	S: AsyncSequence + ?Sized,
{
	if let Some(list) = source.as_indexed() {
		tracing::trace!(operator, path = "indexed", "seq.capability");
		return Ok(Some(list.len()));
	}
	if let Some(partition) = source.as_partition() {
		let count = until_cancelled(cancel, partition.count(only_if_cheap, cancel)).await?;
		if count.is_some() {
			tracing::trace!(operator, path = "partition", "seq.capability");
			return Ok(count);
		}
	}
	if let Some(sized) = source.as_sized() {
		tracing::trace!(operator, path = "sized", "seq.capability");
		return Ok(Some(sized.len()));
	}
	Ok(None)
}

/// Returns the element count only when a capability can answer it cheaply, otherwise `None`.
///
/// Never enumerates the source.
pub async fn count_if_cheap<S>(source: &S, cancel: &CancellationToken) -> Result<Option<usize>>
where
	S: AsyncSequence + ?Sized,
{
	ensure_active(cancel)?;
	probe_count("count_if_cheap", source, true, cancel).await
}
