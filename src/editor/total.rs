use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::OrderLine;

/// Parses the freight field. Empty or non-numeric input counts as zero.
pub fn parse_freight(text: &str) -> Decimal {
    Decimal::from_str(text.trim()).unwrap_or(Decimal::ZERO)
}

/// `freight + Σ(update_rate × quantity)` over `lines`, or `None` once the sum
/// leaves `Decimal`'s range.
pub fn order_total<'a>(
    lines: impl IntoIterator<Item = &'a OrderLine>,
    freight_text: &str,
) -> Option<Decimal> {
    lines
        .into_iter()
        .try_fold(parse_freight(freight_text), |total, line| total.checked_add(line.amount()?))
}
