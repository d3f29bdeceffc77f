use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Workflow position of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderFlag {
    /// Session-scoped scratch order, deletable without trace.
    Temp,
    /// Persisted and still editable.
    Draft,
    /// Submitted and waiting for a storekeeper to pick it up.
    PendingApproval,
    SendToStorekeeper,
    Completed,
    Cancelled,
}

impl OrderFlag {
    /// Notes, customer and line items may only change in these states.
    pub fn is_editable(self) -> bool {
        matches!(self, OrderFlag::Temp | OrderFlag::Draft)
    }

    pub fn is_cancellable(self) -> bool {
        !matches!(
            self,
            OrderFlag::SendToStorekeeper | OrderFlag::Completed | OrderFlag::Cancelled
        )
    }
}

impl fmt::Display for OrderFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderFlag::Temp => "temp",
            OrderFlag::Draft => "draft",
            OrderFlag::PendingApproval => "pending_approval",
            OrderFlag::SendToStorekeeper => "send_to_storekeeper",
            OrderFlag::Completed => "completed",
            OrderFlag::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Reference to the customer an order is placed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

impl CustomerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Master record of a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Local order this one was submitted from, if any.
    pub source_order_id: Option<String>,
    /// `None` means no customer has been picked yet.
    pub customer: Option<CustomerRef>,
    pub note: String,
    pub freight: Decimal,
    pub total: Decimal,
    pub flag: OrderFlag,
    /// `None` leaves the order open to every storekeeper.
    pub storekeeper_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub source_order_id: Option<String>,
    pub customer: Option<CustomerRef>,
    pub note: String,
    pub freight: Decimal,
    pub total: Decimal,
    pub flag: OrderFlag,
    pub storekeeper_id: Option<String>,
}

/// Payload for editing the header fields of an editable order.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer: Option<CustomerRef>,
    pub note: Option<String>,
}

impl OrderCreate {
    /// A blank scratch order.
    pub fn temp() -> Self {
        Self {
            source_order_id: None,
            customer: None,
            note: String::new(),
            freight: Decimal::ZERO,
            total: Decimal::ZERO,
            flag: OrderFlag::Temp,
            storekeeper_id: None,
        }
    }

    /// The submitted copy of `order`, carrying the final freight and total.
    pub fn submission_of(
        order: &Order,
        freight: Decimal,
        total: Decimal,
        storekeeper_id: Option<String>,
    ) -> Self {
        Self {
            source_order_id: Some(order.id.clone()),
            customer: order.customer.clone(),
            note: order.note.clone(),
            freight,
            total,
            flag: OrderFlag::PendingApproval,
            storekeeper_id,
        }
    }
}

impl OrderPatch {
    pub fn customer(customer: CustomerRef) -> Self {
        Self {
            customer: Some(customer),
            note: None,
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            customer: None,
            note: Some(note.into()),
        }
    }
}

impl Order {
    pub fn has_customer(&self) -> bool {
        self.customer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_temp_and_draft_are_editable() {
        assert!(OrderFlag::Temp.is_editable());
        assert!(OrderFlag::Draft.is_editable());
        assert!(!OrderFlag::PendingApproval.is_editable());
        assert!(OrderFlag::PendingApproval.is_cancellable());
        assert!(!OrderFlag::SendToStorekeeper.is_cancellable());
    }

    #[test]
    fn test_flag_serializes_like_it_displays() {
        let flag = OrderFlag::SendToStorekeeper;
        let json = serde_json::to_string(&flag).unwrap();
        assert_eq!(json, format!("\"{}\"", flag));
        let back: OrderFlag = serde_json::from_str("\"pending_approval\"").unwrap();
        assert_eq!(back, OrderFlag::PendingApproval);
    }
}
