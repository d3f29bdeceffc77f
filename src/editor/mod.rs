//! The order editor: the controller behind the create/edit order screen.
//!
//! The controller resolves the order being edited, keeps an immutable
//! [`EditorSnapshot`] of what the screen shows, and turns user intents into
//! calls on the order store, product catalog and customer directory clients.
//! Views observe it through [`SnapshotStore`] subscriptions.

pub mod controller;
pub mod dialog;
pub mod error;
pub mod state;
pub mod store;
pub mod total;

pub use controller::*;
pub use dialog::*;
pub use error::*;
pub use state::*;
pub use store::*;
pub use total::*;
