//! wheel-core: Shared records and error types for the prize wheel
//!
//! Categories are the wheel's segments; their order is the segment index.

mod category;
mod error;

pub use category::*;
pub use error::*;
