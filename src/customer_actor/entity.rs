use crate::actor_framework::Entity;
use crate::domain::{Customer, CustomerCreate, CustomerPatch};

impl Entity for Customer {
    type Id = String;
    type CreatePayload = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Customer from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the customer
    /// * `payload` - Customer name and phone number
    fn from_create(id: String, payload: CustomerCreate) -> Result<Self, String> {
        if payload.name.trim().is_empty() {
            return Err("Customer name required".to_string());
        }
        Ok(Self {
            id,
            name: payload.name,
            phone: payload.phone,
        })
    }

    /// Updates the customer's contact details.
    ///
    /// # Fields Updated
    /// - `name`: Display name shown on orders
    /// - `phone`: Contact number
    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        Ok(())
    }

    /// Handles customer-specific actions.
    ///
    /// Currently, no custom actions are defined for customers.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
