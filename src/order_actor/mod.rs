//! The order store: orders, their line items and the workflow actions on them.

mod actions;
pub mod entity;
pub mod error;
pub mod line;

pub use actions::*;
pub use error::*;
