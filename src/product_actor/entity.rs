use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// A product must be sold in at least one unit.
    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        if payload.units.is_empty() {
            return Err(format!("Product {} needs at least one unit", payload.name));
        }
        Ok(Self {
            id,
            name: payload.name,
            rate: payload.rate,
            units: payload.units,
        })
    }

    /// Updates the product's list rate and/or units.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(units) = patch.units {
            if units.is_empty() {
                return Err(format!("Product {} needs at least one unit", self.id));
            }
            self.units = units;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
