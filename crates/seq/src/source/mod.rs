//! Sources shipped with the crate.

mod list;
#[cfg(feature = "stream")]
mod stream;
mod window;

pub use list::ListSequence;
#[cfg(feature = "stream")]
pub use stream::StreamSequence;
pub use window::Window;
