use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::capability::probe_count;
use crate::handle::{SequenceHandle, ensure_active};
use crate::sequence::AsyncSequence;

/// Returns `true` when `source` produces no elements.
///
/// Only cheap capabilities are consulted; otherwise one element is pulled and the enumeration
/// released.
pub async fn is_empty<S>(source: &S, cancel: &CancellationToken) -> Result<bool>
where
	S: AsyncSequence + ?Sized,
{
	ensure_active(cancel)?;
	if let Some(count) = probe_count("is_empty", source, true, cancel).await? {
		return Ok(count == 0);
	}
	let mut handle = SequenceHandle::open(source, cancel)?;
	Ok(!handle.advance().await?)
}
