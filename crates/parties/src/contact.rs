use serde::{Deserialize, Serialize};

use eventstock_core::ValidationErrors;

/// Contact information shared by clients and suppliers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactInfo {
    /// Blank strings are stored as `None`.
    pub fn normalized(self) -> Self {
        Self {
            email: non_blank(self.email).map(|e| e.to_lowercase()),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
        }
    }

    pub(crate) fn validate_into(&self, errors: &mut ValidationErrors) {
        if let Some(email) = &self.email {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                errors.field("email", "Enter a valid email address.");
            }
        }
        if let Some(phone) = &self.phone {
            if phone.chars().count() > 30 {
                errors.field("phone", "Phone number cannot exceed 30 characters.");
            }
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    })
}
