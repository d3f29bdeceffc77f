//! The product catalog.

pub mod entity;
pub mod error;

pub use error::*;
