use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::capability::known_len;
use crate::handle::{SequenceHandle, ensure_active};
use crate::sequence::AsyncSequence;

/// Returns `true` when both sequences yield equal elements in the same order.
pub async fn sequence_equal<A, B>(first: &A, second: &B, cancel: &CancellationToken) -> Result<bool>
where
	A: AsyncSequence + ?Sized,
	B: AsyncSequence<Item = A::Item> + ?Sized,
	A::Item: PartialEq,
{
	sequence_equal_by(first, second, |a, b| a == b, cancel).await
}

/// Returns `true` when both sequences yield pairwise `eq` elements in the same order.
///
/// Two sources with known, different lengths compare unequal without being opened; two indexed
/// sources are compared by index. Otherwise both are walked in lock step, `first` advancing
/// before `second` at every step, stopping at the first difference.
pub async fn sequence_equal_by<A, B, F>(first: &A, second: &B, mut eq: F, cancel: &CancellationToken) -> Result<bool>
where
	A: AsyncSequence + ?Sized,
	B: AsyncSequence<Item = A::Item> + ?Sized,
	F: FnMut(&A::Item, &A::Item) -> bool,
{
	ensure_active(cancel)?;

	if let (Some(left_len), Some(right_len)) = (known_len(first), known_len(second)) {
		if left_len != right_len {
			tracing::trace!(operator = "sequence_equal", path = "sized", "seq.capability");
			return Ok(false);
		}
		if let (Some(left), Some(right)) = (first.as_indexed(), second.as_indexed()) {
			tracing::trace!(operator = "sequence_equal", path = "indexed", "seq.capability");
			for index in 0..left_len {
				match (left.item_at(index), right.item_at(index)) {
					(Some(a), Some(b)) if eq(&a, &b) => {}
					_ => return Ok(false),
				}
			}
			return Ok(true);
		}
	}

	let mut left = SequenceHandle::open(first, cancel)?;
	let mut right = SequenceHandle::open(second, cancel)?;
	while left.advance().await? {
		if !right.advance().await? {
			return Ok(false);
		}
		match (left.current(), right.current()) {
			(Some(a), Some(b)) if eq(a, b) => {}
			_ => return Ok(false),
		}
	}
	Ok(!right.advance().await?)
}
