//! Subscription access control.
//!
//! Pure functions over a user's subscription record and the static plan
//! catalog. Nothing here performs I/O or holds mutable state, so every call
//! can run from any number of request handlers at once.

mod evaluator;
mod features;
mod plan;


pub use evaluator::*;
pub use features::*;
pub use plan::*;
