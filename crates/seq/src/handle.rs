//! Consumer-side enumeration protocol.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::sequence::{AsyncSequence, BoxCursor};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
	Active,
	/// Exhausted or failed; no further elements.
	Finished,
	/// Stopped by the token; advancing keeps failing with [`Error::Cancelled`].
	Cancelled,
	Released,
}

/// Scoped enumeration of one source.
///
/// Wraps a cursor with the consumer-side protocol: cancellation is checked before each advance
/// and raced against it while the cursor is suspended, and the cursor is released exactly once,
/// either by [`SequenceHandle::release`] or on drop.
pub struct SequenceHandle<'a, T: Send> {
	cursor: BoxCursor<'a, T>,
	cancel: CancellationToken,
	current: Option<T>,
	state: HandleState,
}

impl<'a, T: Send> SequenceHandle<'a, T> {
	/// Opens a handle on `source`. Fails with [`Error::Cancelled`] without opening anything when
	/// the token has already fired.
	pub fn open<S>(source: &'a S, cancel: &CancellationToken) -> Result<Self>
	where
		S: AsyncSequence<Item = T> + ?Sized,
	{
		ensure_active(cancel)?;
		Ok(Self {
			cursor: source.open(cancel),
			cancel: cancel.clone(),
			current: None,
			state: HandleState::Active,
		})
	}

	/// Moves to the next element. Returns `false` once the source is exhausted.
	///
	/// After exhaustion or a source failure the handle stays finished and keeps returning `false`.
	/// After cancellation it keeps failing with [`Error::Cancelled`].
	pub async fn advance(&mut self) -> Result<bool> {
		self.current = None;
		match self.state {
			HandleState::Active => {}
			HandleState::Cancelled => return Err(Error::Cancelled),
			HandleState::Finished | HandleState::Released => return Ok(false),
		}
		if let Err(err) = ensure_active(&self.cancel) {
			self.state = HandleState::Cancelled;
			return Err(err);
		}

		match until_cancelled(&self.cancel, self.cursor.next()).await {
			Ok(Some(item)) => {
				self.current = Some(item);
				Ok(true)
			}
			Ok(None) => {
				self.state = HandleState::Finished;
				Ok(false)
			}
			Err(err) => {
				self.state = if err.is_cancelled() { HandleState::Cancelled } else { HandleState::Finished };
				Err(err)
			}
		}
	}

	/// Element produced by the last successful [`advance`](Self::advance).
	pub fn current(&self) -> Option<&T> {
		self.current.as_ref()
	}

	/// Takes ownership of the current element.
	pub fn take_current(&mut self) -> Option<T> {
		self.current.take()
	}

	/// Pulls the next element by value.
	pub async fn next(&mut self) -> Result<Option<T>> {
		Ok(if self.advance().await? { self.take_current() } else { None })
	}

	/// Releases the underlying cursor. Idempotent.
	pub fn release(&mut self) {
		if self.state == HandleState::Released {
			return;
		}
		self.state = HandleState::Released;
		self.current = None;
		self.cursor.release();
		tracing::trace!("seq.handle.released");
	}

	/// Returns `true` once [`release`](Self::release) has run.
	pub fn is_released(&self) -> bool {
		self.state == HandleState::Released
	}
}

impl<T: Send> Drop for SequenceHandle<'_, T> {
	fn drop(&mut self) {
		if self.state != HandleState::Released {
			self.state = HandleState::Released;
			self.cursor.release();
			tracing::trace!("seq.handle.released");
		}
	}
}

/// Fails with [`Error::Cancelled`] when the token has fired.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<()> {
	if cancel.is_cancelled() {
		tracing::trace!("seq.handle.cancelled");
		return Err(Error::Cancelled);
	}
	Ok(())
}

/// Runs `work` unless the token fires first; a fired token wins even when `work` is ready.
pub(crate) async fn until_cancelled<T>(cancel: &CancellationToken, work: impl Future<Output = Result<T>>) -> Result<T> {
	tokio::select! {
		biased;
		_ = cancel.cancelled() => {
			tracing::trace!("seq.handle.cancelled");
			Err(Error::Cancelled)
		}
		result = work => result,
	}
}
