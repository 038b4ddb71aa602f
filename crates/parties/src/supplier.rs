use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{Entity, SupplierId, ValidationErrors};

use crate::contact::{ContactInfo, non_blank};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDetails {
    pub name: String,
    pub contact_person: Option<String>,
    pub contact: ContactInfo,
    pub notes: Option<String>,
}

impl SupplierDetails {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            contact_person: non_blank(self.contact_person),
            contact: self.contact.normalized(),
            notes: non_blank(self.notes),
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.field("name", "Name cannot be empty.");
        }
        self.contact.validate_into(&mut errors);
        errors.into_result(())
    }
}

/// A vendor inventory items were purchased from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    details: SupplierDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Supplier {
    pub fn register(
        id: SupplierId,
        details: SupplierDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let details = details.normalized();
        details.validate()?;
        Ok(Self {
            id,
            details,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&mut self, details: SupplierDetails, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let details = details.normalized();
        details.validate()?;
        self.details = details;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &SupplierDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
