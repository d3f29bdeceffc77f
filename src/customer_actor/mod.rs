//! Customer directory backing the customer picker.

pub mod entity;
pub mod error;

pub use error::*;
