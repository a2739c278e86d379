//! Terminal operators.

mod count;
mod is_empty;
mod last;
mod sequence_equal;
mod sum;

pub use count::*;
pub use is_empty::is_empty;
pub use last::*;
pub use sequence_equal::{sequence_equal, sequence_equal_by};
pub use sum::*;

use crate::Error;

fn overflow(domain: &'static str) -> Error {
	tracing::trace!(domain, "seq.overflow");
	Error::Overflow { domain }
}
