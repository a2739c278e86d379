use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Window;
use crate::Result;
use crate::sequence::{AsyncSequence, BoxCursor, Cursor, IndexedSource, SizedSource};

/// In-memory list with a known length and random access.
#[derive(Debug, Clone)]
pub struct ListSequence<T> {
	items: Arc<[T]>,
}

impl<T> ListSequence<T> {
	/// List holding `items` in order.
	pub fn new(items: Vec<T>) -> Self {
		Self { items: items.into() }
	}

	/// Lazily sliceable view sharing this list's storage.
	pub fn window(&self) -> Window<T> {
		Window::from_shared(Arc::clone(&self.items))
	}
}

impl<T> From<Vec<T>> for ListSequence<T> {
	fn from(items: Vec<T>) -> Self {
		Self::new(items)
	}
}

struct ListCursor<'a, T> {
	items: std::slice::Iter<'a, T>,
}

#[async_trait]
impl<T: Clone + Send + Sync> Cursor for ListCursor<'_, T> {
	type Item = T;

	async fn next(&mut self) -> Result<Option<T>> {
		Ok(self.items.next().cloned())
	}
}

impl<T: Clone + Send + Sync> SizedSource for ListSequence<T> {
	fn len(&self) -> usize {
		self.items.len()
	}
}

impl<T: Clone + Send + Sync> IndexedSource<T> for ListSequence<T> {
	fn item_at(&self, index: usize) -> Option<T> {
		self.items.get(index).cloned()
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for ListSequence<T> {
	type Item = T;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, T> {
		Box::new(ListCursor { items: self.items.iter() })
	}

	fn as_sized(&self) -> Option<&dyn SizedSource> {
		Some(self)
	}

	fn as_indexed(&self) -> Option<&dyn IndexedSource<T>> {
		Some(self)
	}
}
