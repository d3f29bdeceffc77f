use rust_decimal::Decimal;

/// Workflow actions on an order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Persists freight and total and turns a temp order into a draft.
    SaveDraft { freight: Decimal, total: Decimal },
    /// Withdraws the order before a storekeeper has taken it.
    Cancel,
}
