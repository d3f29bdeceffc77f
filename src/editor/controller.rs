use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::dialog::{BackChoice, BackOutcome, Dialog};
use super::error::EditorError;
use super::state::{EditorPhase, EditorSnapshot, ExitReason, OrderStage};
use super::store::{SnapshotStore, SubscriptionId};
use super::total::parse_freight;
use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::domain::{
    CustomerRef, LineAttachments, LineEdit, LineId, LineUpsert, Order, OrderLine, OrderLineCreate,
    Product,
};
use crate::order_actor::OrderError;

pub const DEFAULT_GENERIC_ERROR: &str = "Something went wrong, please try again";

/// The collaborators the editor talks to.
#[derive(Clone)]
pub struct EditorClients {
    pub orders: OrderClient,
    pub products: ProductClient,
    pub customers: CustomerClient,
}

#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// Shown when a store failure carries no message of its own.
    pub generic_error_message: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            generic_error_message: DEFAULT_GENERIC_ERROR.to_string(),
        }
    }
}

/// Which order the screen was opened for.
#[derive(Debug, Clone, Default)]
pub struct OpenRequest {
    /// Existing order to edit; `None` starts (or resumes) a temp order.
    pub draft_id: Option<String>,
    /// Customer picked before the screen opened. Applied to temp orders only,
    /// and only when they have no customer yet.
    pub customer: Option<CustomerRef>,
}

impl OpenRequest {
    pub fn new_order() -> Self {
        Self::default()
    }

    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            draft_id: Some(id.into()),
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: CustomerRef) -> Self {
        self.customer = Some(customer);
        self
    }
}

/// A line item the user is adding.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub product_id: String,
    /// Defaults to the product's first unit.
    pub unit_id: Option<String>,
    pub quantity: Decimal,
    /// Defaults to the catalog rate for the unit.
    pub update_rate: Option<Decimal>,
    pub narration: String,
}

/// Shared flag telling the editor whether its view is still on screen.
#[derive(Debug, Clone)]
pub struct ViewLiveness(Arc<AtomicBool>);

impl ViewLiveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn detach(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for ViewLiveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Controller behind the create/edit order screen.
///
/// Requests to the collaborators are awaited one at a time. After every await
/// the controller checks [`ViewLiveness`]; once the view has detached nothing
/// more is published and the operation ends with [`EditorError::Detached`].
pub struct OrderEditor {
    clients: EditorClients,
    settings: EditorSettings,
    liveness: ViewLiveness,
    store: SnapshotStore,
}

impl OrderEditor {
    /// Resolves the order to edit and loads its line items. Never fails: when
    /// no order can be resolved the snapshot ends up in `LoadFailed`.
    #[instrument(name = "order_editor_open", skip(clients, settings, liveness))]
    pub async fn open(
        clients: EditorClients,
        settings: EditorSettings,
        request: OpenRequest,
        liveness: ViewLiveness,
    ) -> Self {
        let mut editor = Self {
            clients,
            settings,
            liveness,
            store: SnapshotStore::new(EditorSnapshot::default()),
        };
        editor.load(request).await;
        editor
    }

    async fn load(&mut self, request: OpenRequest) {
        let resolved = match request.draft_id {
            Some(id) => match self.clients.orders.resolve_draft_order(id.clone()).await {
                Ok(Some(order)) => Ok(order),
                Ok(None) => Err(OrderError::NotFound(id)),
                Err(e) => Err(e),
            },
            None => self.resolve_temp_order(request.customer).await,
        };
        if !self.liveness.is_attached() {
            return;
        }

        let order = match resolved {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Order failed to load");
                let message = self.store_message(e.user_message());
                self.publish(|s| {
                    s.phase = EditorPhase::LoadFailed;
                    s.message = Some(message);
                });
                return;
            }
        };

        let lines = self.clients.orders.list_line_items(order.id.clone()).await;
        if !self.liveness.is_attached() {
            return;
        }
        let (lines, message) = match lines {
            Ok(lines) => (lines, None),
            Err(e) => {
                warn!(error = %e, "Line items failed to load");
                (Vec::new(), Some(self.store_message(e.user_message())))
            }
        };

        info!(order_id = %order.id, flag = %order.flag, lines = lines.len(), "Order loaded");
        self.publish(|s| {
            s.phase = EditorPhase::for_flag(order.flag);
            s.note_text = order.note.clone();
            s.freight_text = if order.freight.is_zero() {
                String::new()
            } else {
                order.freight.to_string()
            };
            s.order = Some(order);
            s.confirmed_lines = lines;
            s.message = message;
        });
    }

    async fn resolve_temp_order(&self, customer: Option<CustomerRef>) -> Result<Order, OrderError> {
        let order = self.clients.orders.create_temp_order().await?;
        match customer {
            Some(customer) if !order.has_customer() => {
                self.clients
                    .orders
                    .set_customer(order.id.clone(), customer.id, customer.name)
                    .await
            }
            _ => Ok(order),
        }
    }

    // --- Observation ---

    pub fn snapshot(&self) -> Arc<EditorSnapshot> {
        self.store.current()
    }

    pub fn subscribe(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<Arc<EditorSnapshot>>) {
        self.store.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn liveness(&self) -> ViewLiveness {
        self.liveness.clone()
    }

    /// Called when the view is torn down.
    pub fn detach(&self) {
        self.liveness.detach();
    }

    /// Order total as currently displayed, `None` when out of range.
    pub fn total(&self) -> Option<Decimal> {
        self.store.current().total()
    }

    // --- Field edits ---

    pub fn set_note_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.publish(|s| s.note_text = text);
    }

    pub fn set_freight_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.publish(|s| s.freight_text = text);
    }

    #[instrument(skip(self))]
    pub async fn select_customer(&mut self, customer_id: String) -> Result<Order, EditorError> {
        let order = self.editable_order()?;
        let customer = match self.clients.customers.get_customer(customer_id.clone()).await {
            Ok(Some(customer)) => customer,
            Ok(None) => {
                let message = format!("Customer {} not found", customer_id);
                return Err(self.fail(EditorError::Validation(message)));
            }
            Err(e) => return Err(self.store_failed(e.user_message())),
        };
        self.ensure_attached()?;

        let updated = self
            .clients
            .orders
            .set_customer(order.id, customer.id, customer.name)
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;

        let result = updated.clone();
        self.publish(|s| s.order = Some(updated));
        Ok(result)
    }

    // --- Line items ---

    /// Adds a line for a catalog product, then reloads the list from the store.
    #[instrument(skip(self))]
    pub async fn add_line_item(&mut self, new_line: NewLine) -> Result<OrderLine, EditorError> {
        let order = self.editable_order()?;
        self.ensure_positive(new_line.quantity)?;
        let product = self.lookup_product(&new_line.product_id).await?;

        let unit = match &new_line.unit_id {
            Some(unit_id) => product.unit(unit_id),
            None => product.default_unit(),
        }
        .cloned();
        let Some(unit) = unit else {
            return Err(self.fail(EditorError::Validation(format!(
                "{} is not sold in that unit",
                product.name
            ))));
        };

        let Some(rate) = product.rate.checked_mul(unit.base_quantity) else {
            return Err(self.fail(EditorError::Validation(format!(
                "{} is priced out of range",
                product.name
            ))));
        };
        let payload = OrderLineCreate {
            server_id: None,
            order_id: order.id,
            product_id: product.id,
            unit_id: unit.id,
            unit_base_quantity: unit.base_quantity,
            quantity: new_line.quantity,
            rate,
            update_rate: new_line.update_rate.unwrap_or(rate),
            narration: new_line.narration,
            flag: order.flag,
            note: String::new(),
            attachments: LineAttachments::default(),
        };
        let line = self
            .clients
            .orders
            .upsert_line_item(LineUpsert::New(payload))
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;

        info!(line_id = %line.id, "Line item added");
        self.refresh_lines().await?;
        Ok(line)
    }

    /// Re-prices or re-quantifies a line. Identity, original rate and creation
    /// time are kept; the write stays local until the order is submitted.
    #[instrument(skip(self))]
    pub async fn edit_line_item(
        &mut self,
        line_id: LineId,
        edit: LineEdit,
    ) -> Result<OrderLine, EditorError> {
        self.editable_order()?;
        let existing = self.visible_line(line_id)?;
        self.ensure_positive(edit.quantity)?;
        let product = self.lookup_product(&existing.product_id).await?;

        let Some(unit) = product.unit(&edit.unit_id).cloned() else {
            return Err(self.fail(EditorError::Validation(format!(
                "{} is not sold in that unit",
                product.name
            ))));
        };
        let replacement = existing.replaced_with(edit, &unit, Utc::now());

        let saved = self
            .clients
            .orders
            .upsert_line_item(LineUpsert::Replace(replacement))
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;

        info!(line_id = %saved.id, "Line item updated");
        self.refresh_lines().await?;
        Ok(saved)
    }

    /// Removes a line optimistically: it disappears from the snapshot at once,
    /// then the delete is issued and the list is reloaded from the store
    /// whatever the outcome.
    #[instrument(skip(self))]
    pub async fn remove_line_item(&mut self, line_id: LineId) -> Result<(), EditorError> {
        let order = self.editable_order()?;
        self.visible_line(line_id)?;
        self.publish(|s| {
            s.pending_removals.insert(line_id);
        });

        let deleted = self.clients.orders.delete_line_item(line_id).await;
        self.ensure_attached()?;
        let reconciled = self.clients.orders.list_line_items(order.id).await;
        self.ensure_attached()?;

        let delete_ok = deleted.is_ok();
        self.publish(|s| {
            s.pending_removals.remove(&line_id);
            match reconciled {
                Ok(lines) => s.confirmed_lines = lines,
                Err(e) if delete_ok => {
                    warn!(error = %e, "Reload after removal failed, dropping line locally");
                    s.confirmed_lines.retain(|line| line.id != line_id);
                }
                Err(e) => warn!(error = %e, "Reload after failed removal failed"),
            }
        });

        match deleted {
            Ok(()) => {
                info!("Line item removed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Line item removal failed");
                Err(self.store_failed(e.user_message()))
            }
        }
    }

    /// Replaces the confirmed line list with the store's.
    #[instrument(skip(self))]
    pub async fn refresh_lines(&mut self) -> Result<(), EditorError> {
        let order = self.loaded_order()?;
        let lines = self
            .clients
            .orders
            .list_line_items(order.id)
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;
        self.publish(|s| s.confirmed_lines = lines);
        Ok(())
    }

    // --- Save / send / cancel ---

    /// Persists note, freight and total and turns the order into a draft.
    /// Closes the screen on success.
    #[instrument(skip(self))]
    pub async fn save_as_draft(&mut self) -> Result<Order, EditorError> {
        let order = self.editable_order()?;
        let (freight, total) = self.priced_totals()?;
        self.push_note(&order).await?;

        let saved = self
            .clients
            .orders
            .save_draft(order.id, freight, total)
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;

        let result = saved.clone();
        self.publish(|s| {
            s.order = Some(saved);
            s.phase = EditorPhase::Editing(OrderStage::Draft);
            s.exit = Some(ExitReason::SavedDraft);
            s.message = Some("Order saved as draft".to_string());
        });
        Ok(result)
    }

    /// Submits the order to every storekeeper, then deletes the local copy.
    /// Closes the screen on success.
    ///
    /// # Errors
    /// `Validation` without any store call when no customer is assigned or the
    /// total is out of range.
    #[instrument(skip(self))]
    pub async fn send_order(&mut self) -> Result<Order, EditorError> {
        let order = self.editable_order()?;
        if !order.has_customer() {
            return Err(self.fail(EditorError::Validation("Please select a customer".to_string())));
        }
        let (freight, total) = self.priced_totals()?;

        let editing = self.store.current().phase;
        self.publish(|s| s.phase = EditorPhase::Submitting);

        if let Err(e) = self.push_note(&order).await {
            self.publish(|s| s.phase = editing);
            return Err(e);
        }

        // No storekeeper: the order is offered to all of them.
        let submission = self.clients.orders.submit(order.id.clone(), freight, total, None);
        let submitted = match submission.await {
            Ok(submitted) => submitted,
            Err(e) => {
                warn!(error = %e, "Submit failed");
                self.publish(|s| s.phase = editing);
                return Err(self.store_failed(e.user_message()));
            }
        };
        self.ensure_attached()?;

        if let Err(e) = self.clients.orders.delete_order_and_items(order.id.clone()).await {
            warn!(
                error = %e,
                order_id = %order.id,
                "Submitted, but the local order could not be cleaned up"
            );
        }
        self.ensure_attached()?;

        let result = submitted.clone();
        self.publish(|s| {
            s.order = Some(submitted);
            s.phase = EditorPhase::Submitted;
            s.exit = Some(ExitReason::Submitted);
            s.message = Some("Order sent".to_string());
        });
        Ok(result)
    }

    /// Opens the cancel confirmation if the order may still be cancelled.
    #[instrument(skip(self))]
    pub fn request_cancel(&mut self) -> Result<(), EditorError> {
        let order = self.loaded_order()?;
        if !order.flag.is_cancellable() {
            return Err(self.fail(EditorError::Validation(
                "This order can no longer be cancelled".to_string(),
            )));
        }
        self.publish(|s| s.dialog = Some(Dialog::ConfirmCancel));
        Ok(())
    }

    /// Resolves the cancel confirmation. Returns whether the order was cancelled.
    #[instrument(skip(self))]
    pub async fn resolve_cancel_dialog(&mut self, confirmed: bool) -> Result<bool, EditorError> {
        if self.store.current().dialog != Some(Dialog::ConfirmCancel) {
            return Err(EditorError::Validation("No cancellation is pending".to_string()));
        }
        self.publish(|s| s.dialog = None);
        if !confirmed {
            return Ok(false);
        }

        let order = self.loaded_order()?;
        let cancelled = self
            .clients
            .orders
            .cancel(&order)
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()?;

        self.publish(|s| {
            s.order = Some(cancelled);
            s.phase = EditorPhase::Cancelled;
            s.exit = Some(ExitReason::Cancelled);
            s.message = Some("Order cancelled".to_string());
        });
        Ok(true)
    }

    // --- Back navigation ---

    /// Leaves silently when nothing would be lost, otherwise opens the
    /// unsaved-changes dialog.
    #[instrument(skip(self))]
    pub fn request_back(&mut self) -> BackOutcome {
        let snapshot = self.store.current();
        if snapshot.order.is_none() || !snapshot.phase.is_editing() {
            self.publish(|s| s.exit = Some(ExitReason::Left));
            return BackOutcome::Leave;
        }
        if !snapshot.has_unsaved_content() {
            debug!("Nothing to save, leaving");
            self.publish(|s| s.exit = Some(ExitReason::NothingToSave));
            return BackOutcome::Leave;
        }
        self.publish(|s| s.dialog = Some(Dialog::UnsavedChanges));
        BackOutcome::AwaitingChoice
    }

    /// Applies the unsaved-changes dialog's result.
    #[instrument(skip(self))]
    pub async fn resolve_back_dialog(
        &mut self,
        choice: BackChoice,
    ) -> Result<BackOutcome, EditorError> {
        if self.store.current().dialog != Some(Dialog::UnsavedChanges) {
            return Err(EditorError::Validation("No back navigation is pending".to_string()));
        }
        self.publish(|s| s.dialog = None);
        match choice {
            BackChoice::Cancel | BackChoice::Dismissed => Ok(BackOutcome::Stay),
            BackChoice::Save => {
                self.save_as_draft().await?;
                Ok(BackOutcome::Leave)
            }
            BackChoice::Discard => {
                let order = self.loaded_order()?;
                self.clients
                    .orders
                    .delete_order_and_items(order.id)
                    .await
                    .map_err(|e| self.store_failed(e.user_message()))?;
                self.ensure_attached()?;
                info!("Order discarded");
                self.publish(|s| {
                    s.phase = EditorPhase::Discarded;
                    s.exit = Some(ExitReason::Discarded);
                    s.confirmed_lines.clear();
                    s.pending_removals.clear();
                });
                Ok(BackOutcome::Leave)
            }
        }
    }

    // --- Helpers ---

    /// Freight and total as they would be persisted now.
    fn priced_totals(&mut self) -> Result<(Decimal, Decimal), EditorError> {
        let snapshot = self.store.current();
        match snapshot.total() {
            Some(total) => Ok((parse_freight(&snapshot.freight_text), total)),
            None => Err(self.fail(EditorError::Validation(
                "Order total is too large".to_string(),
            ))),
        }
    }

    async fn push_note(&mut self, order: &Order) -> Result<(), EditorError> {
        let note = self.store.current().note_text.clone();
        self.clients
            .orders
            .set_note(order.id.clone(), note)
            .await
            .map_err(|e| self.store_failed(e.user_message()))?;
        self.ensure_attached()
    }

    async fn lookup_product(&mut self, product_id: &str) -> Result<Product, EditorError> {
        let product = match self.clients.products.get_product(product_id.to_string()).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                return Err(self.fail(EditorError::Validation(format!(
                    "Product {} is no longer available",
                    product_id
                ))))
            }
            Err(e) => return Err(self.store_failed(e.user_message())),
        };
        self.ensure_attached()?;
        Ok(product)
    }

    fn loaded_order(&mut self) -> Result<Order, EditorError> {
        match self.store.current().order.clone() {
            Some(order) => Ok(order),
            None => Err(self.fail(EditorError::NotLoaded)),
        }
    }

    fn editable_order(&mut self) -> Result<Order, EditorError> {
        let order = self.loaded_order()?;
        if self.store.current().phase.is_editing() && order.flag.is_editable() {
            Ok(order)
        } else {
            let message = "This order can no longer be edited".to_string();
            Err(self.fail(EditorError::Validation(message)))
        }
    }

    fn visible_line(&mut self, line_id: LineId) -> Result<OrderLine, EditorError> {
        match self.store.current().visible_line(line_id).cloned() {
            Some(line) => Ok(line),
            None => {
                let message = format!("Line item {} not found", line_id);
                Err(self.fail(EditorError::Validation(message)))
            }
        }
    }

    fn ensure_positive(&mut self, quantity: Decimal) -> Result<(), EditorError> {
        if quantity > Decimal::ZERO {
            Ok(())
        } else {
            let message = "Quantity must be greater than zero".to_string();
            Err(self.fail(EditorError::Validation(message)))
        }
    }

    fn ensure_attached(&self) -> Result<(), EditorError> {
        if self.liveness.is_attached() {
            Ok(())
        } else {
            debug!("View detached, dropping result");
            Err(EditorError::Detached)
        }
    }

    fn store_message(&self, message: Option<String>) -> String {
        message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.settings.generic_error_message.clone())
    }

    fn store_failed(&mut self, message: Option<String>) -> EditorError {
        let error = EditorError::Store(self.store_message(message));
        self.fail(error)
    }

    /// Surfaces `error` to the user and hands it back.
    fn fail(&mut self, error: EditorError) -> EditorError {
        if error != EditorError::Detached {
            let message = error.to_string();
            self.publish(|s| s.message = Some(message));
        }
        error
    }

    fn publish(&mut self, f: impl FnOnce(&mut EditorSnapshot)) {
        if self.liveness.is_attached() {
            self.store.update(f);
        } else {
            debug!("View detached, snapshot not published");
        }
    }
}
