use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::sequence::{AsyncSequence, BoxCursor, Cursor, Partition};

/// Skip/take slice of a shared list.
///
/// Exposes only the [`Partition`] capability: its last element and count are answered in O(1)
/// without enumerating, but it offers no random access.
#[derive(Debug, Clone)]
pub struct Window<T> {
	items: Arc<[T]>,
	start: usize,
	end: usize,
}

impl<T> Window<T> {
	/// Window over all of `items`.
	pub fn new(items: Vec<T>) -> Self {
		Self::from_shared(items.into())
	}

	pub(crate) fn from_shared(items: Arc<[T]>) -> Self {
		let end = items.len();
		Self { items, start: 0, end }
	}

	/// Drops the first `count` elements of the window.
	#[must_use]
	pub fn skip(mut self, count: usize) -> Self {
		self.start = self.start.saturating_add(count).min(self.end);
		self
	}

	/// Keeps at most `count` elements of the window.
	#[must_use]
	pub fn take(mut self, count: usize) -> Self {
		self.end = self.start.saturating_add(count).min(self.end);
		self
	}

	/// Number of elements in the window.
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns `true` when the window holds no elements.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	fn as_slice(&self) -> &[T] {
		&self.items[self.start..self.end]
	}
}

struct WindowCursor<'a, T> {
	items: std::slice::Iter<'a, T>,
}

#[async_trait]
impl<T: Clone + Send + Sync> Cursor for WindowCursor<'_, T> {
	type Item = T;

	async fn next(&mut self) -> Result<Option<T>> {
		Ok(self.items.next().cloned())
	}
}

#[async_trait]
impl<T: Clone + Send + Sync> Partition<T> for Window<T> {
	async fn try_get_last(&self, _cancel: &CancellationToken) -> Result<Option<T>> {
		Ok(self.as_slice().last().cloned())
	}

	async fn count(&self, _only_if_cheap: bool, _cancel: &CancellationToken) -> Result<Option<usize>> {
		Ok(Some(self.len()))
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for Window<T> {
	type Item = T;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, T> {
		Box::new(WindowCursor { items: self.as_slice().iter() })
	}

	fn as_partition(&self) -> Option<&dyn Partition<T>> {
		Some(self)
	}
}
