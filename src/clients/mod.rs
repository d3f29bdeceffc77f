//! Typed clients over the resource actors.

#[macro_use]
mod macros;
pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use customer_client::CustomerClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
