//! Projector kinds shared by every predicate- or selector-taking operator.
//!
//! Operators are written once against [`Projector`]; the public wrappers only choose the kind.

use std::future::Future;

use futures::future::ready;
use tokio_util::sync::CancellationToken;

use crate::Result;

/// Maps one input to an output, possibly suspending.
pub trait Projector<In> {
	/// Projected value.
	type Output;

	/// Projects `input`. `cancel` is the token of the enclosing operation.
	fn project(&mut self, input: In, cancel: &CancellationToken) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// Passes elements through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<In: Send> Projector<In> for Identity {
	type Output = In;

	fn project(&mut self, input: In, _cancel: &CancellationToken) -> impl Future<Output = Result<In>> + Send {
		ready(Ok(input))
	}
}

/// Synchronous projection.
#[derive(Debug, Clone, Copy)]
pub struct Map<F>(pub F);

impl<In, F, R> Projector<In> for Map<F>
where
	F: FnMut(In) -> R,
	R: Send,
{
	type Output = R;

	fn project(&mut self, input: In, _cancel: &CancellationToken) -> impl Future<Output = Result<R>> + Send {
		ready(Ok((self.0)(input)))
	}
}

/// Projection returning a future.
#[derive(Debug, Clone, Copy)]
pub struct Await<F>(pub F);

impl<In, F, Fut, R> Projector<In> for Await<F>
where
	F: FnMut(In) -> Fut,
	Fut: Future<Output = Result<R>> + Send,
{
	type Output = R;

	fn project(&mut self, input: In, _cancel: &CancellationToken) -> impl Future<Output = Result<R>> + Send {
		(self.0)(input)
	}
}

/// Projection returning a future that also observes the operation's cancellation token.
#[cfg(feature = "deep-cancellation")]
#[derive(Debug, Clone, Copy)]
pub struct AwaitWithCancellation<F>(pub F);

#[cfg(feature = "deep-cancellation")]
impl<In, F, Fut, R> Projector<In> for AwaitWithCancellation<F>
where
	F: FnMut(In, CancellationToken) -> Fut,
	Fut: Future<Output = Result<R>> + Send,
{
	type Output = R;

	fn project(&mut self, input: In, cancel: &CancellationToken) -> impl Future<Output = Result<R>> + Send {
		(self.0)(input, cancel.clone())
	}
}
