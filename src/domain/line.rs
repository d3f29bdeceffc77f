use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OrderFlag, ProductUnit};

/// Local identity of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line_{}", self.0)
    }
}

/// Images and suggestions attached to a line. Stored and forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineAttachments {
    pub images: Vec<Value>,
    pub suggestions: Option<Value>,
}

/// One product entry within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: LineId,
    /// Identity assigned once the line has been submitted.
    pub server_id: Option<String>,
    pub order_id: String,
    pub product_id: String,
    pub unit_id: String,
    pub unit_base_quantity: Decimal,
    pub quantity: Decimal,
    /// Catalog price at the time the line was added.
    pub rate: Decimal,
    /// Price actually charged.
    pub update_rate: Decimal,
    pub narration: String,
    pub flag: OrderFlag,
    pub note: String,
    pub attachments: LineAttachments,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a line item.
#[derive(Debug, Clone)]
pub struct OrderLineCreate {
    pub server_id: Option<String>,
    pub order_id: String,
    pub product_id: String,
    pub unit_id: String,
    pub unit_base_quantity: Decimal,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub update_rate: Decimal,
    pub narration: String,
    pub flag: OrderFlag,
    pub note: String,
    pub attachments: LineAttachments,
}

/// The user-editable part of a line item.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdit {
    pub unit_id: String,
    pub update_rate: Decimal,
    pub quantity: Decimal,
    pub narration: String,
}

/// Write request for the order store: either a brand new line or a replacement
/// for an existing one.
#[derive(Debug, Clone)]
pub enum LineUpsert {
    New(OrderLineCreate),
    Replace(OrderLine),
}

impl OrderLine {
    /// `update_rate * quantity`, or `None` on overflow.
    pub fn amount(&self) -> Option<Decimal> {
        self.update_rate.checked_mul(self.quantity)
    }

    /// Builds the replacement for this line after an edit. Identity, product
    /// linkage, original rate and creation time carry over unchanged.
    pub fn replaced_with(
        &self,
        edit: LineEdit,
        unit: &ProductUnit,
        now: DateTime<Utc>,
    ) -> OrderLine {
        OrderLine {
            unit_id: unit.id.clone(),
            unit_base_quantity: unit.base_quantity,
            update_rate: edit.update_rate,
            quantity: edit.quantity,
            narration: edit.narration,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Copies this line onto the submitted order `order_id`.
    pub fn submission_copy(&self, order_id: &str, server_id: String) -> OrderLineCreate {
        OrderLineCreate {
            server_id: Some(server_id),
            order_id: order_id.to_string(),
            product_id: self.product_id.clone(),
            unit_id: self.unit_id.clone(),
            unit_base_quantity: self.unit_base_quantity,
            quantity: self.quantity,
            rate: self.rate,
            update_rate: self.update_rate,
            narration: self.narration.clone(),
            flag: OrderFlag::PendingApproval,
            note: self.note.clone(),
            attachments: self.attachments.clone(),
        }
    }
}
