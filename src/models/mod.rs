pub mod progress;
pub mod evaluation;
pub mod error;

pub use progress::*;
pub use evaluation::*;
pub use error::*;
