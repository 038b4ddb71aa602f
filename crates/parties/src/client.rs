use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{ClientId, Entity, ValidationErrors};

use crate::contact::{ContactInfo, non_blank};

/// Editable client fields (create and update share the same shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    /// Full name, or the primary contact name for a company.
    pub name: String,
    pub company_name: Option<String>,
    /// Specific contact person at the company, if different from `name`.
    pub contact_person: Option<String>,
    pub contact: ContactInfo,
}

impl ClientDetails {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            company_name: non_blank(self.company_name),
            contact_person: non_blank(self.contact_person),
            contact: self.contact.normalized(),
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.field("name", "Name cannot be empty.");
        } else if self.name.chars().count() > 200 {
            errors.field("name", "Name cannot exceed 200 characters.");
        }
        self.contact.validate_into(&mut errors);
        errors.into_result(())
    }
}

/// A client (individual or company) who books events, rentals or quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    details: ClientDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Client {
    pub fn register(
        id: ClientId,
        details: ClientDetails,
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

    pub fn update(&mut self, details: ClientDetails, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let details = details.normalized();
        details.validate()?;
        self.details = details;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn company_name(&self) -> Option<&str> {
        self.details.company_name.as_deref()
    }

    pub fn contact_person(&self) -> Option<&str> {
        self.details.contact_person.as_deref()
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.details.contact
    }

    pub fn email(&self) -> Option<&str> {
        self.details.contact.email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// `"Company (Name)"` when a company is set, otherwise just the name.
    pub fn display_name(&self) -> String {
        match &self.details.company_name {
            Some(company) => format!("{company} ({})", self.details.name),
            None => self.details.name.clone(),
        }
    }
}

impl core::fmt::Display for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventstock_core::ErrorTarget;

    fn details(name: &str) -> ClientDetails {
        ClientDetails {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn register_trims_and_normalizes() {
        let client = Client::register(
            ClientId::new(),
            ClientDetails {
                name: "  Jane Doe ".to_string(),
                company_name: Some("   ".to_string()),
                contact_person: None,
                contact: ContactInfo {
                    email: Some("Jane@Example.COM".to_string()),
                    phone: Some("".to_string()),
                    address: None,
                },
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(client.name(), "Jane Doe");
        assert_eq!(client.company_name(), None);
        assert_eq!(client.email(), Some("jane@example.com"));
        assert_eq!(client.contact().phone, None);
    }

    #[test]
    fn register_rejects_blank_name_and_bad_email_together() {
        let mut d = details("  ");
        d.contact.email = Some("nope".to_string());
        let errors = Client::register(ClientId::new(), d, Utc::now()).unwrap_err();

        let fields: Vec<_> = errors
            .iter()
            .map(|e| match &e.target {
                ErrorTarget::Field { name } => name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn display_name_includes_company() {
        let mut d = details("Ali");
        d.company_name = Some("Gulf Events".to_string());
        let client = Client::register(ClientId::new(), d, Utc::now()).unwrap();
        assert_eq!(client.display_name(), "Gulf Events (Ali)");
    }

    #[test]
    fn update_keeps_created_at() {
        let created = Utc::now();
        let mut client = Client::register(ClientId::new(), details("A"), created).unwrap();
        let later = created + chrono::Duration::hours(1);
        client.update(details("B"), later).unwrap();
        assert_eq!(client.name(), "B");
        assert_eq!(client.created_at(), created);
        assert_eq!(client.updated_at(), later);
    }
}
