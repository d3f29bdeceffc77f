use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{
    CustomerRef, LineId, LineUpsert, Order, OrderCreate, OrderFlag, OrderLine, OrderPatch,
};
use crate::order_actor::{OrderAction, OrderError};

/// Client for the order store.
///
/// Wraps the order and line-item actors and exposes the operations the order
/// editor issues. Submission orchestrates both actors: it writes the submitted
/// copy of the order and its lines, rolling back on a partial failure.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    lines: ResourceClient<OrderLine>,
}

crate::impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, lines: ResourceClient<OrderLine>) -> Self {
        Self { inner, lines }
    }

    /// Any order by id. Drafts are the usual case, but submitted orders are
    /// returned too so they can still be cancelled.
    #[instrument(skip(self))]
    pub async fn resolve_draft_order(&self, id: String) -> Result<Option<Order>, OrderError> {
        self.get_order(id).await
    }

    /// Returns the pending temp order left over from an earlier session, or
    /// creates a fresh one.
    #[instrument(skip(self))]
    pub async fn create_temp_order(&self) -> Result<Order, OrderError> {
        let existing = self
            .list_orders()
            .await?
            .into_iter()
            .find(|order| order.flag == OrderFlag::Temp);
        if let Some(order) = existing {
            info!(order_id = %order.id, "Reusing temp order");
            return Ok(order);
        }

        debug!("Sending request");
        let order = self.inner.create(OrderCreate::temp()).await.map_err(OrderError::from)?;
        info!(order_id = %order.id, "Temp order created");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn set_customer(
        &self,
        order_id: String,
        customer_id: String,
        customer_name: String,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let patch = OrderPatch::customer(CustomerRef::new(customer_id, customer_name));
        self.inner.update(order_id, patch).await.map_err(OrderError::from)
    }

    #[instrument(skip(self, text))]
    pub async fn set_note(&self, order_id: String, text: String) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(order_id, OrderPatch::note(text))
            .await
            .map_err(OrderError::from)
    }

    /// Line items of `order_id` in the order they were added.
    #[instrument(skip(self))]
    pub async fn list_line_items(&self, order_id: String) -> Result<Vec<OrderLine>, OrderError> {
        debug!("Sending request");
        let lines = self.lines.list().await.map_err(OrderError::from)?;
        Ok(lines.into_iter().filter(|line| line.order_id == order_id).collect())
    }

    /// Adds a new line or replaces the mutable fields of an existing one.
    /// Local only; nothing leaves the device until the order is submitted.
    #[instrument(skip(self, upsert))]
    pub async fn upsert_line_item(&self, upsert: LineUpsert) -> Result<OrderLine, OrderError> {
        debug!("Sending request");
        let result = match upsert {
            LineUpsert::New(payload) => self.lines.create(payload).await,
            LineUpsert::Replace(line) => self.lines.update(line.id, line).await,
        };
        result.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn delete_line_item(&self, id: LineId) -> Result<(), OrderError> {
        debug!("Sending request");
        self.lines.delete(id).await.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn save_draft(
        &self,
        order_id: String,
        freight: Decimal,
        total: Decimal,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let order = self
            .inner
            .perform_action(order_id, OrderAction::SaveDraft { freight, total })
            .await
            .map_err(OrderError::from)?;
        info!(order_id = %order.id, total = %order.total, "Draft saved");
        Ok(order)
    }

    /// Submits `order_id` with its current line items.
    ///
    /// Produces a new `PendingApproval` order holding copies of the lines, each
    /// with a server id. The local order is left untouched; callers delete it
    /// once the submission has succeeded. `storekeeper_id = None` offers the
    /// order to every storekeeper.
    ///
    /// # Errors
    /// `ValidationError` when the order has no customer.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        order_id: String,
        freight: Decimal,
        total: Decimal,
        storekeeper_id: Option<String>,
    ) -> Result<Order, OrderError> {
        info!("Processing submit request (Client Side)");

        // Step 1: Validate the local order
        let order = self
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
        if !order.flag.is_editable() {
            return Err(OrderError::ValidationError(format!(
                "Order {} has already been {}",
                order.id, order.flag
            )));
        }
        if !order.has_customer() {
            error!("Customer missing");
            return Err(OrderError::ValidationError("Please select a customer".to_string()));
        }

        // Step 2: Collect line items
        let lines = self.list_line_items(order_id.clone()).await?;

        // Step 3: Write the submitted order
        let submitted = self
            .inner
            .create(OrderCreate::submission_of(&order, freight, total, storekeeper_id))
            .await
            .map_err(OrderError::from)?;

        // Step 4: Copy the lines across
        let mut copied = Vec::with_capacity(lines.len());
        for (position, line) in lines.iter().enumerate() {
            let server_id = format!("{}-{}", submitted.id, position + 1);
            match self.lines.create(line.submission_copy(&submitted.id, server_id)).await {
                Ok(copy) => copied.push(copy.id),
                Err(e) => {
                    error!(error = %e, line_id = %line.id, "Copying line failed, rolling back");
                    self.roll_back_submission(&submitted, &copied).await;
                    return Err(OrderError::from(e));
                }
            }
        }

        info!(submitted_id = %submitted.id, lines = copied.len(), "Order submitted");
        Ok(submitted)
    }

    async fn roll_back_submission(&self, submitted: &Order, copied: &[LineId]) {
        for id in copied {
            if let Err(e) = self.lines.delete(*id).await {
                warn!(line_id = %id, error = %e, "Rollback could not remove line");
            }
        }
        // Submitted orders refuse deletion, so force them out of the way as cancelled.
        if let Err(e) = self.inner.perform_action(submitted.id.clone(), OrderAction::Cancel).await {
            warn!(order_id = %submitted.id, error = %e, "Rollback could not cancel order");
        }
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, flag = %order.flag))]
    pub async fn cancel(&self, order: &Order) -> Result<Order, OrderError> {
        debug!("Sending request");
        let cancelled = self
            .inner
            .perform_action(order.id.clone(), OrderAction::Cancel)
            .await
            .map_err(OrderError::from)?;
        info!("Order cancelled");
        Ok(cancelled)
    }

    /// Removes every line item of `order_id`, then the order itself.
    ///
    /// # Errors
    /// Refused for orders that are no longer temp or draft.
    #[instrument(skip(self))]
    pub async fn delete_order_and_items(&self, order_id: String) -> Result<(), OrderError> {
        debug!("Sending request");
        let order = self
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
        if !order.flag.is_editable() {
            return Err(OrderError::Rejected(format!(
                "Order {} is {} and cannot be deleted",
                order.id, order.flag
            )));
        }
        for line in self.list_line_items(order_id.clone()).await? {
            self.lines.delete(line.id).await.map_err(OrderError::from)?;
        }
        self.inner.delete(order_id).await.map_err(OrderError::from)?;
        info!("Order and line items deleted");
        Ok(())
    }
}
