//! # Order Editor
//!
//! The controller behind a create/edit order screen, running against an order
//! store, product catalog and customer directory built as resource actors.
//!
//! - **Actor framework** - generic [`actor_framework::ResourceActor`] and client
//! - **Domain types** - plain records: [`domain::Order`], [`domain::OrderLine`],
//!   [`domain::Product`]
//! - **Clients** - typed, traced handles; [`clients::OrderClient`] carries the store operations
//! - **Editor** - [`editor::OrderEditor`]: totals, optimistic removal, save/send/cancel and the
//!   unsaved-changes guard, observed through immutable snapshots
//! - **System** - [`app_system::OrderSystem`] wires everything up, [`app_system::setup_tracing`]
//!   configures logging
//!
//! ```no_run
//! use order_editor::app_system::{setup_tracing, OrderSystem, SystemConfig};
//! use order_editor::editor::{OpenRequest, OrderEditor, ViewLiveness};
//!
//! # async fn demo() {
//! let config = SystemConfig::from_env();
//! setup_tracing(&config);
//! let system = OrderSystem::with_config(&config);
//!
//! let mut editor = OrderEditor::open(
//!     system.editor_clients(),
//!     config.editor_settings(),
//!     OpenRequest::new_order(),
//!     ViewLiveness::new(),
//! )
//! .await;
//! editor.set_freight_text("3.50");
//! println!("total: {:?}", editor.total());
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod customer_actor;
pub mod domain;
pub mod editor;
pub mod order_actor;
pub mod product_actor;

#[cfg(test)]
mod mock_framework;
