use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{CategoryId, Entity, ItemId, SupplierId, ValidationErrors};

use crate::sku::Sku;

/// Who physically owns the units of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSource {
    /// Company stock: subject to the owned-quantity ceiling and date-range availability.
    #[default]
    Owned,
    /// Goods handed over by a client for their own event.
    ClientSupplied,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DimensionUnit {
    #[default]
    Cm,
    In,
    Mm,
    M,
    Dm,
}

/// Optional physical dimensions, each in hundredths of `unit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub depth: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub unit: DimensionUnit,
}

/// Prices in the smallest currency unit (fils).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// Cost of acquiring one unit (valuation only).
    pub purchase_price: Option<u64>,
    pub rent_price_per_day: Option<u64>,
}

/// Editable item fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub storage_location: Option<String>,
    pub item_source: ItemSource,
    /// Total units owned (or received from the client). Ceiling for all availability math.
    pub initial_quantity: u32,
    pub dimensions: Dimensions,
    pub pricing: Pricing,
    pub supplier: Option<SupplierId>,
}

impl ItemDetails {
    /// Client-supplied goods carry no purchase price and no supplier.
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        if self.item_source == ItemSource::ClientSupplied {
            self.pricing.purchase_price = None;
            self.supplier = None;
        }
        self
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.field("name", "Name cannot be empty.");
        } else if self.name.chars().count() > 200 {
            errors.field("name", "Name cannot exceed 200 characters.");
        }
        errors.into_result(())
    }
}

/// A distinct type of inventory item available for events and rentals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    sku: Sku,
    details: ItemDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    pub fn create(
        id: ItemId,
        sku: Sku,
        details: ItemDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let details = details.normalized();
        details.validate()?;
        Ok(Self {
            id,
            sku,
            details,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields. The SKU is immutable.
    pub fn update(&mut self, details: ItemDetails, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let details = details.normalized();
        details.validate()?;
        self.details = details;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn item_source(&self) -> ItemSource {
        self.details.item_source
    }

    pub fn is_owned(&self) -> bool {
        self.details.item_source == ItemSource::Owned
    }

    pub fn initial_quantity(&self) -> u32 {
        self.details.initial_quantity
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.details.category
    }

    pub fn supplier(&self) -> Option<SupplierId> {
        self.details.supplier
    }

    pub fn pricing(&self) -> &Pricing {
        &self.details.pricing
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// SET NULL side of a category delete.
    pub fn detach_category(&mut self) {
        self.details.category = None;
    }

    /// SET NULL side of a supplier delete.
    pub fn detach_supplier(&mut self) {
        self.details.supplier = None;
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.details.name, self.sku)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
