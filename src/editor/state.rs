use std::collections::BTreeSet;

use rust_decimal::Decimal;

use super::dialog::Dialog;
use super::total::order_total;
use crate::domain::{LineId, Order, OrderFlag, OrderLine};

/// Which kind of editable order is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Temp,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Loading,
    /// No order could be resolved; the screen shows a load error.
    LoadFailed,
    Editing(OrderStage),
    Submitting,
    Submitted,
    Cancelled,
    Discarded,
}

impl EditorPhase {
    /// Phase for an order as the store reports it.
    pub fn for_flag(flag: OrderFlag) -> Self {
        match flag {
            OrderFlag::Temp => EditorPhase::Editing(OrderStage::Temp),
            OrderFlag::Draft => EditorPhase::Editing(OrderStage::Draft),
            OrderFlag::Cancelled => EditorPhase::Cancelled,
            OrderFlag::PendingApproval | OrderFlag::SendToStorekeeper | OrderFlag::Completed => {
                EditorPhase::Submitted
            }
        }
    }

    pub fn is_editing(self) -> bool {
        matches!(self, EditorPhase::Editing(_))
    }
}

/// Why the screen closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    NothingToSave,
    SavedDraft,
    Submitted,
    Cancelled,
    Discarded,
    /// Left a screen that had nothing editable (load failure, submitted order).
    Left,
}

/// Everything the screen renders, as of one moment.
///
/// Snapshots are immutable; every change produces a new one. Line items are
/// the last list confirmed by the store with the pending removals laid over
/// it, and the total is always derived from them and the freight text.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub phase: EditorPhase,
    pub order: Option<Order>,
    pub confirmed_lines: Vec<OrderLine>,
    pub pending_removals: BTreeSet<LineId>,
    pub note_text: String,
    pub freight_text: String,
    pub dialog: Option<Dialog>,
    /// Latest user-facing message (errors and confirmations).
    pub message: Option<String>,
    pub exit: Option<ExitReason>,
}

impl Default for EditorSnapshot {
    fn default() -> Self {
        Self {
            phase: EditorPhase::Loading,
            order: None,
            confirmed_lines: Vec::new(),
            pending_removals: BTreeSet::new(),
            note_text: String::new(),
            freight_text: String::new(),
            dialog: None,
            message: None,
            exit: None,
        }
    }
}

impl EditorSnapshot {
    /// Line items as displayed: confirmed lines minus pending removals.
    pub fn visible_lines(&self) -> impl Iterator<Item = &OrderLine> + '_ {
        self.confirmed_lines
            .iter()
            .filter(|line| !self.pending_removals.contains(&line.id))
    }

    pub fn visible_line(&self, id: LineId) -> Option<&OrderLine> {
        self.visible_lines().find(|line| line.id == id)
    }

    /// `None` when the total is out of range.
    pub fn total(&self) -> Option<Decimal> {
        order_total(self.visible_lines(), &self.freight_text)
    }

    /// False when there are no line items, no customer and no note, i.e.
    /// leaving the screen loses nothing.
    pub fn has_unsaved_content(&self) -> bool {
        let has_customer = self.order.as_ref().is_some_and(Order::has_customer);
        self.visible_lines().next().is_some() || has_customer || !self.note_text.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.exit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::Entity;
    use crate::domain::{CustomerRef, LineAttachments, OrderCreate};
    use chrono::Utc;

    fn line(id: u64, rate: i64, quantity: i64) -> OrderLine {
        let now = Utc::now();
        OrderLine {
            id: LineId(id),
            server_id: None,
            order_id: "order_1".into(),
            product_id: "product_1".into(),
            unit_id: "pcs".into(),
            unit_base_quantity: Decimal::ONE,
            quantity: Decimal::from(quantity),
            rate: Decimal::from(rate),
            update_rate: Decimal::from(rate),
            narration: String::new(),
            flag: OrderFlag::Temp,
            note: String::new(),
            attachments: LineAttachments::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_removals_hide_lines_and_drop_from_total() {
        let mut snapshot = EditorSnapshot {
            confirmed_lines: vec![line(1, 10, 2), line(2, 5, 1)],
            freight_text: "1".into(),
            ..EditorSnapshot::default()
        };
        assert_eq!(snapshot.total(), Some(Decimal::from(26)));

        snapshot.pending_removals.insert(LineId(1));
        let visible: Vec<LineId> = snapshot.visible_lines().map(|l| l.id).collect();
        assert_eq!(visible, vec![LineId(2)]);
        assert_eq!(snapshot.total(), Some(Decimal::from(6)));
        assert!(snapshot.visible_line(LineId(1)).is_none());
    }

    #[test]
    fn test_unsaved_content_detection() {
        let order = Order::from_create("order_1".into(), OrderCreate::temp()).unwrap();
        let mut snapshot = EditorSnapshot {
            order: Some(order.clone()),
            ..EditorSnapshot::default()
        };
        assert!(!snapshot.has_unsaved_content());

        snapshot.note_text = "x".into();
        assert!(snapshot.has_unsaved_content());
        snapshot.note_text.clear();

        let mut with_customer = order;
        with_customer.customer = Some(CustomerRef::new("customer_1", "Alice"));
        snapshot.order = Some(with_customer);
        assert!(snapshot.has_unsaved_content());
        snapshot.order.as_mut().unwrap().customer = None;

        snapshot.confirmed_lines.push(line(3, 1, 1));
        assert!(snapshot.has_unsaved_content());
        snapshot.pending_removals.insert(LineId(3));
        assert!(!snapshot.has_unsaved_content());
    }

    #[test]
    fn test_snapshot_is_closed_once_exit_is_set() {
        let mut snapshot = EditorSnapshot::default();
        assert!(!snapshot.is_closed());
        snapshot.exit = Some(ExitReason::SavedDraft);
        assert!(snapshot.is_closed());
    }

    #[test]
    fn test_phase_follows_store_flag() {
        let editing = |stage| EditorPhase::Editing(stage);
        assert_eq!(EditorPhase::for_flag(OrderFlag::Temp), editing(OrderStage::Temp));
        assert_eq!(EditorPhase::for_flag(OrderFlag::Draft), editing(OrderStage::Draft));
        assert_eq!(EditorPhase::for_flag(OrderFlag::Completed), EditorPhase::Submitted);
        assert_eq!(EditorPhase::for_flag(OrderFlag::Cancelled), EditorPhase::Cancelled);
    }
}
