use chrono::Utc;

use super::actions::OrderAction;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderFlag, OrderPatch};

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = Order;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: OrderCreate) -> Result<Self, String> {
        let now = Utc::now();
        Ok(Self {
            id,
            source_order_id: payload.source_order_id,
            customer: payload.customer,
            note: payload.note,
            freight: payload.freight,
            total: payload.total,
            flag: payload.flag,
            storekeeper_id: payload.storekeeper_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the customer and/or note.
    ///
    /// # Errors
    /// Refused once the order has left the temp/draft states.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        self.ensure_editable()?;
        if let Some(customer) = patch.customer {
            self.customer = Some(customer);
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Only temp and draft orders may be deleted; anything submitted is history.
    fn on_delete(&self) -> Result<(), String> {
        self.ensure_editable()
    }

    /// Handles order workflow actions.
    ///
    /// # Actions
    /// - `SaveDraft`: stores freight and total and moves the order to `Draft`
    /// - `Cancel`: moves the order to `Cancelled`
    fn handle_action(&mut self, action: OrderAction) -> Result<Order, String> {
        match action {
            OrderAction::SaveDraft { freight, total } => {
                self.ensure_editable()?;
                self.freight = freight;
                self.total = total;
                self.flag = OrderFlag::Draft;
            }
            OrderAction::Cancel => {
                if !self.flag.is_cancellable() {
                    return Err(format!(
                        "Order {} is {} and can no longer be cancelled",
                        self.id, self.flag
                    ));
                }
                self.flag = OrderFlag::Cancelled;
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

impl Order {
    fn ensure_editable(&self) -> Result<(), String> {
        if self.flag.is_editable() {
            Ok(())
        } else {
            Err(format!("Order {} is {} and can no longer be edited", self.id, self.flag))
        }
    }
}
