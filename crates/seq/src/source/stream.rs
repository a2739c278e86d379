use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::sequence::{AsyncSequence, BoxCursor, Cursor};
use crate::{Error, Result};

/// Single-use source over a [`Stream`].
///
/// The first [`open`](AsyncSequence::open) takes the stream; any later enumeration fails with
/// [`Error::AlreadyConsumed`] on its first advance.
pub struct StreamSequence<S> {
	stream: Mutex<Option<S>>,
}

impl<S> StreamSequence<S> {
	/// Wraps `stream`; it is not polled until the first enumeration.
	pub fn new(stream: S) -> Self {
		Self {
			stream: Mutex::new(Some(stream)),
		}
	}

	/// Returns `true` once an enumeration has taken the stream.
	pub fn is_consumed(&self) -> bool {
		self.stream.lock().is_none()
	}
}

struct StreamCursor<S> {
	stream: Option<Pin<Box<S>>>,
}

#[async_trait]
impl<S> Cursor for StreamCursor<S>
where
	S: Stream + Send,
	S::Item: Send,
{
	type Item = S::Item;

	async fn next(&mut self) -> Result<Option<S::Item>> {
		match self.stream.as_mut() {
			Some(stream) => Ok(stream.next().await),
			None => Err(Error::AlreadyConsumed),
		}
	}

	fn release(&mut self) {
		self.stream = None;
	}
}

impl<S> AsyncSequence for StreamSequence<S>
where
	S: Stream + Send,
	S::Item: Send,
{
	type Item = S::Item;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, S::Item> {
		let stream = self.stream.lock().take().map(Box::pin);
		Box::new(StreamCursor { stream })
	}
}
