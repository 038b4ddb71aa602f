use serde::{Deserialize, Serialize};

/// System-generated Stock Keeping Unit, e.g. `FU-000042`.
///
/// Assigned once when an item is created and never regenerated, even if the
/// item later moves to another category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    const FALLBACK_PREFIX: &'static str = "ITEM";

    /// Prefix is the first two alphanumeric characters of the upper-cased
    /// category name (`ITEM` without a usable category), followed by the
    /// store-assigned item number padded to six digits.
    pub fn generate(category_name: Option<&str>, number: u64) -> Self {
        let prefix: String = category_name
            .map(|name| {
                name.to_uppercase()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .take(2)
                    .collect()
            })
            .unwrap_or_default();
        let prefix = if prefix.is_empty() {
            Self::FALLBACK_PREFIX.to_string()
        } else {
            prefix
        };
        Self(format!("{prefix}-{number:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
