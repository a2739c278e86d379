//! Instrumented sources for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::sequence::{AsyncSequence, BoxCursor, Cursor, Partition, SizedSource};
use crate::{Error, Result};

/// Installs a test-writer subscriber so `seq.*` trace events show up with `--nocapture`.
pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_test_writer()
		.try_init();
}

/// Opaque source (no capabilities) counting opens, pulls and releases. Each pull yields to the
/// scheduler before producing its element.
pub(crate) struct Probe<T> {
	items: Vec<T>,
	pub opens: Arc<AtomicUsize>,
	pub pulls: Arc<AtomicUsize>,
	pub releases: Arc<AtomicUsize>,
}

impl<T> Probe<T> {
	pub fn new(items: Vec<T>) -> Self {
		Self {
			items,
			opens: Arc::default(),
			pulls: Arc::default(),
			releases: Arc::default(),
		}
	}
}

struct ProbeCursor<'a, T> {
	items: std::slice::Iter<'a, T>,
	pulls: Arc<AtomicUsize>,
	releases: Arc<AtomicUsize>,
}

#[async_trait]
impl<T: Clone + Send + Sync> Cursor for ProbeCursor<'_, T> {
	type Item = T;

	async fn next(&mut self) -> Result<Option<T>> {
		tokio::task::yield_now().await;
		let item = self.items.next().cloned();
		if item.is_some() {
			self.pulls.fetch_add(1, Ordering::SeqCst);
		}
		Ok(item)
	}

	fn release(&mut self) {
		self.releases.fetch_add(1, Ordering::SeqCst);
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for Probe<T> {
	type Item = T;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, T> {
		self.opens.fetch_add(1, Ordering::SeqCst);
		Box::new(ProbeCursor {
			items: self.items.iter(),
			pulls: Arc::clone(&self.pulls),
			releases: Arc::clone(&self.releases),
		})
	}
}

/// Yields `0..ok` and then fails.
pub(crate) struct Failing {
	ok: i32,
	pub releases: Arc<AtomicUsize>,
}

impl Failing {
	pub fn after(ok: i32) -> Self {
		Self {
			ok,
			releases: Arc::default(),
		}
	}
}

struct FailingCursor {
	next: i32,
	ok: i32,
	releases: Arc<AtomicUsize>,
}

#[async_trait]
impl Cursor for FailingCursor {
	type Item = i32;

	async fn next(&mut self) -> Result<Option<i32>> {
		if self.next >= self.ok {
			return Err(Error::other("source failed"));
		}
		self.next += 1;
		Ok(Some(self.next - 1))
	}

	fn release(&mut self) {
		self.releases.fetch_add(1, Ordering::SeqCst);
	}
}

impl AsyncSequence for Failing {
	type Item = i32;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, i32> {
		Box::new(FailingCursor {
			next: 0,
			ok: self.ok,
			releases: Arc::clone(&self.releases),
		})
	}
}

/// Yields its items and then suspends forever.
pub(crate) struct Stalled<T> {
	items: Vec<T>,
	pub releases: Arc<AtomicUsize>,
}

impl<T> Stalled<T> {
	pub fn after(items: Vec<T>) -> Self {
		Self {
			items,
			releases: Arc::default(),
		}
	}
}

struct StalledCursor<'a, T> {
	items: std::slice::Iter<'a, T>,
	releases: Arc<AtomicUsize>,
}

#[async_trait]
impl<T: Clone + Send + Sync> Cursor for StalledCursor<'_, T> {
	type Item = T;

	async fn next(&mut self) -> Result<Option<T>> {
		match self.items.next() {
			Some(item) => Ok(Some(item.clone())),
			None => std::future::pending().await,
		}
	}

	fn release(&mut self) {
		self.releases.fetch_add(1, Ordering::SeqCst);
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for Stalled<T> {
	type Item = T;

	fn open(&self, _cancel: &CancellationToken) -> BoxCursor<'_, T> {
		Box::new(StalledCursor {
			items: self.items.iter(),
			releases: Arc::clone(&self.releases),
		})
	}
}

/// Source that knows its length but offers no random access.
pub(crate) struct SizedOnly<T>(pub Probe<T>);

impl<T: Send + Sync> SizedSource for SizedOnly<T> {
	fn len(&self) -> usize {
		self.0.items.len()
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for SizedOnly<T> {
	type Item = T;

	fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, T> {
		self.0.open(cancel)
	}

	fn as_sized(&self) -> Option<&dyn SizedSource> {
		Some(self)
	}
}

/// Partition whose count is only available by walking it.
pub(crate) struct CostlyPartition<T> {
	pub inner: Probe<T>,
	pub last_queries: AtomicUsize,
}

impl<T> CostlyPartition<T> {
	pub fn new(items: Vec<T>) -> Self {
		Self {
			inner: Probe::new(items),
			last_queries: AtomicUsize::new(0),
		}
	}
}

#[async_trait]
impl<T: Clone + Send + Sync> Partition<T> for CostlyPartition<T> {
	async fn try_get_last(&self, _cancel: &CancellationToken) -> Result<Option<T>> {
		self.last_queries.fetch_add(1, Ordering::SeqCst);
		Ok(self.inner.items.last().cloned())
	}

	async fn count(&self, only_if_cheap: bool, _cancel: &CancellationToken) -> Result<Option<usize>> {
		if only_if_cheap {
			return Ok(None);
		}
		Ok(Some(self.inner.items.len()))
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for CostlyPartition<T> {
	type Item = T;

	fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, T> {
		self.inner.open(cancel)
	}

	fn as_partition(&self) -> Option<&dyn Partition<T>> {
		Some(self)
	}
}

/// Partition whose answers never arrive.
pub(crate) struct StalledPartition<T>(pub Probe<T>);

#[async_trait]
impl<T: Clone + Send + Sync> Partition<T> for StalledPartition<T> {
	async fn try_get_last(&self, _cancel: &CancellationToken) -> Result<Option<T>> {
		std::future::pending().await
	}

	async fn count(&self, _only_if_cheap: bool, _cancel: &CancellationToken) -> Result<Option<usize>> {
		std::future::pending().await
	}
}

impl<T: Clone + Send + Sync> AsyncSequence for StalledPartition<T> {
	type Item = T;

	fn open(&self, cancel: &CancellationToken) -> BoxCursor<'_, T> {
		self.0.open(cancel)
	}

	fn as_partition(&self) -> Option<&dyn Partition<T>> {
		Some(self)
	}
}

/// Fires `cancel` from a spawned task after a short delay.
pub(crate) fn cancel_soon(cancel: &CancellationToken) {
	let trigger = cancel.clone();
	tokio::spawn(async move {
		tokio::time::sleep(std::time::Duration::from_millis(5)).await;
		trigger.cancel();
	});
}
