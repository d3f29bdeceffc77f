pub mod customer;
pub mod line;
pub mod order;
pub mod product;

pub use customer::*;
pub use line::*;
pub use order::*;
pub use product::*;
