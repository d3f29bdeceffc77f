use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable unit of a product, e.g. a single piece or a box of twelve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUnit {
    pub id: String,
    pub name: String,
    /// How many base units one of this unit holds.
    pub base_quantity: Decimal,
}

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// List price per base unit.
    pub rate: Decimal,
    pub units: Vec<ProductUnit>,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub rate: Decimal,
    pub units: Vec<ProductUnit>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub rate: Option<Decimal>,
    pub units: Option<Vec<ProductUnit>>,
}

impl ProductUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_quantity,
        }
    }
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rate: Decimal,
        units: Vec<ProductUnit>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rate,
            units,
        }
    }

    pub fn unit(&self, unit_id: &str) -> Option<&ProductUnit> {
        self.units.iter().find(|unit| unit.id == unit_id)
    }

    /// The first listed unit is the one offered by default.
    pub fn default_unit(&self) -> Option<&ProductUnit> {
        self.units.first()
    }
}
