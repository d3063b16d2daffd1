//! twix-core: shared foundation for the twix tweak controls.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{TwixError, TwixResult};
pub use numeric::*;
