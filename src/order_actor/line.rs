use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{LineId, OrderLine, OrderLineCreate};

impl Entity for OrderLine {
    type Id = LineId;
    type CreatePayload = OrderLineCreate;
    /// A full replacement line; only its mutable fields are taken over.
    type Patch = OrderLine;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &LineId {
        &self.id
    }

    fn from_create(id: LineId, payload: OrderLineCreate) -> Result<Self, String> {
        ensure_positive_quantity(&payload.quantity)?;
        let now = Utc::now();
        Ok(Self {
            id,
            server_id: payload.server_id,
            order_id: payload.order_id,
            product_id: payload.product_id,
            unit_id: payload.unit_id,
            unit_base_quantity: payload.unit_base_quantity,
            quantity: payload.quantity,
            rate: payload.rate,
            update_rate: payload.update_rate,
            narration: payload.narration,
            flag: payload.flag,
            note: payload.note,
            attachments: payload.attachments,
            created_at: now,
            updated_at: now,
        })
    }

    /// Takes over unit, effective rate, quantity, narration and the update
    /// timestamp from `replacement`. Everything else stays as stored.
    fn on_update(&mut self, replacement: OrderLine) -> Result<(), String> {
        if replacement.id != self.id {
            return Err(format!("Replacement for {} carries id {}", self.id, replacement.id));
        }
        if !self.flag.is_editable() {
            return Err(format!(
                "Line item {} has been submitted and can no longer be edited",
                self.id
            ));
        }
        ensure_positive_quantity(&replacement.quantity)?;
        self.unit_id = replacement.unit_id;
        self.unit_base_quantity = replacement.unit_base_quantity;
        self.update_rate = replacement.update_rate;
        self.quantity = replacement.quantity;
        self.narration = replacement.narration;
        self.updated_at = replacement.updated_at;
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

fn ensure_positive_quantity(quantity: &Decimal) -> Result<(), String> {
    if quantity.is_sign_positive() && !quantity.is_zero() {
        Ok(())
    } else {
        Err(format!("Quantity must be greater than zero, got {}", quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineAttachments, OrderFlag};

    fn payload(quantity: Decimal) -> OrderLineCreate {
        OrderLineCreate {
            server_id: None,
            order_id: "order_1".into(),
            product_id: "product_1".into(),
            unit_id: "pcs".into(),
            unit_base_quantity: Decimal::ONE,
            quantity,
            rate: Decimal::from(10),
            update_rate: Decimal::from(10),
            narration: String::new(),
            flag: OrderFlag::Temp,
            note: String::new(),
            attachments: LineAttachments::default(),
        }
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        assert!(OrderLine::from_create(LineId(1), payload(Decimal::ZERO)).is_err());
        assert!(OrderLine::from_create(LineId(1), payload(Decimal::from(-2))).is_err());
    }

    #[test]
    fn test_replacement_only_touches_mutable_fields() {
        let mut stored = OrderLine::from_create(LineId(1), payload(Decimal::from(2))).unwrap();
        let mut replacement = stored.clone();
        replacement.quantity = Decimal::from(5);
        replacement.update_rate = Decimal::from(9);
        replacement.rate = Decimal::from(1);
        replacement.product_id = "product_9".into();

        stored.on_update(replacement).unwrap();

        assert_eq!(stored.quantity, Decimal::from(5));
        assert_eq!(stored.update_rate, Decimal::from(9));
        assert_eq!(stored.rate, Decimal::from(10));
        assert_eq!(stored.product_id, "product_1");
    }

    #[test]
    fn test_replacement_with_foreign_id_is_rejected() {
        let mut stored = OrderLine::from_create(LineId(1), payload(Decimal::ONE)).unwrap();
        let mut other = stored.clone();
        other.id = LineId(2);
        assert!(stored.on_update(other).is_err());
    }
}
