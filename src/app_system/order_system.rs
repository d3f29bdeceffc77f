use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use super::SystemConfig;
use crate::actor_framework::ResourceActor;
use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::domain::{Customer, LineId, Order, OrderLine, Product};
use crate::editor::EditorClients;

/// The order store, product catalog and customer directory, running as actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct OrderSystem {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub customer_client: CustomerClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

/// `prefix_1`, `prefix_2`, ...
fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

impl OrderSystem {
    pub fn new() -> Self {
        Self::with_config(&SystemConfig::default())
    }

    pub fn with_config(config: &SystemConfig) -> Self {
        info!(buffer_size = config.buffer_size, "Starting order system");

        // 1. Customer directory
        let (customer_actor, customer_resource_client) =
            ResourceActor::<Customer>::new(config.buffer_size, sequential_ids("customer"));
        let customer_client = CustomerClient::new(customer_resource_client);
        let customer_handle = tokio::spawn(customer_actor.run());

        // 2. Product catalog
        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new(config.buffer_size, sequential_ids("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Order store: orders and their line items
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(config.buffer_size, sequential_ids("order"));
        let line_counter = Arc::new(AtomicU64::new(1));
        let next_line_id = move || LineId(line_counter.fetch_add(1, Ordering::SeqCst));
        let (line_actor, line_resource_client) =
            ResourceActor::<OrderLine>::new(config.buffer_size, next_line_id);
        let order_client = OrderClient::new(order_resource_client, line_resource_client);
        let order_handle = tokio::spawn(order_actor.run());
        let line_handle = tokio::spawn(line_actor.run());

        Self {
            order_client,
            product_client,
            customer_client,
            handles: vec![customer_handle, product_handle, order_handle, line_handle],
        }
    }

    /// Clients for an order editor session.
    pub fn editor_clients(&self) -> EditorClients {
        EditorClients {
            orders: self.order_client.clone(),
            products: self.product_client.clone(),
            customers: self.customer_client.clone(),
        }
    }

    /// Drops the system's clients and waits for the actors to finish.
    ///
    /// Actors stop once every client handle is gone, so editors still holding
    /// clones must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.product_client);
        drop(self.customer_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new()
    }
}
