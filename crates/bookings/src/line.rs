//! Line items and line-row validation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use eventstock_core::{ItemId, ValidationErrors};
use eventstock_inventory::Item;

/// An item reserved by a booking (or requested by a quote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item: ItemId,
    pub quantity: u32,
}

/// One submitted line-item row.
///
/// Rows are addressed by their position in the submission; untouched rows
/// (no item, no quantity) and rows marked for deletion are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub item: Option<ItemId>,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub delete: bool,
}

impl LineRequest {
    pub fn new(item: ItemId, quantity: i64) -> Self {
        Self {
            item: Some(item),
            quantity: Some(quantity),
            delete: false,
        }
    }
}

/// Read access to the item catalog.
pub trait ItemLookup {
    fn find_item(&self, id: &ItemId) -> Option<&Item>;
}

impl ItemLookup for BTreeMap<ItemId, Item> {
    fn find_item(&self, id: &ItemId) -> Option<&Item> {
        self.get(id)
    }
}

/// A row that passed structural checks, with its original index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedLine {
    pub index: usize,
    pub line: LineItem,
}

/// Structural line checks shared by bookings and quotes.
///
/// Every row is checked; problems are pushed onto `errors` and the rows
/// that passed are returned for further (availability) checks.
pub fn prepare_lines(
    rows: &[LineRequest],
    items: &impl ItemLookup,
    errors: &mut ValidationErrors,
) -> Vec<AcceptedLine> {
    let mut accepted = Vec::new();
    let mut seen = BTreeSet::new();

    for (index, row) in rows.iter().enumerate() {
        if row.delete {
            continue;
        }
        let (item_id, quantity) = match (row.item, row.quantity) {
            (None, None) => continue,
            (Some(item), Some(quantity)) => (item, quantity),
            _ => {
                errors.line(
                    index,
                    None,
                    "Both item and quantity are required if using this row.",
                );
                continue;
            }
        };

        if quantity <= 0 {
            errors.line(index, Some("quantity"), "Quantity must be a positive number.");
            continue;
        }
        let Some(item) = items.find_item(&item_id) else {
            errors.line(index, Some("item"), "Select a valid item.");
            continue;
        };
        if !seen.insert(item_id) {
            errors.line(
                index,
                Some("item"),
                format!("'{}' is already listed on another row.", item.name()),
            );
            continue;
        }
        if item.is_owned() && quantity > i64::from(item.initial_quantity()) {
            errors.line(
                index,
                Some("quantity"),
                format!(
                    "Cannot book {quantity} units of '{}'. Only {} total units are owned by the company.",
                    item.name(),
                    item.initial_quantity()
                ),
            );
            continue;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            errors.line(index, Some("quantity"), "Quantity is too large.");
            continue;
        };

        accepted.push(AcceptedLine {
            index,
            line: LineItem {
                item: item_id,
                quantity,
            },
        });
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventstock_inventory::{ItemDetails, ItemSource, Sku};

    fn catalog() -> (BTreeMap<ItemId, Item>, ItemId, ItemId) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let owned = ItemId::new();
        let supplied = ItemId::new();
        let mut items = BTreeMap::new();
        items.insert(
            owned,
            Item::create(
                owned,
                Sku::generate(Some("Lighting"), 1),
                ItemDetails {
                    name: "Spotlight".into(),
                    initial_quantity: 10,
                    ..ItemDetails::default()
                },
                now,
            )
            .unwrap(),
        );
        items.insert(
            supplied,
            Item::create(
                supplied,
                Sku::generate(None, 2),
                ItemDetails {
                    name: "Client banner".into(),
                    item_source: ItemSource::ClientSupplied,
                    initial_quantity: 0,
                    ..ItemDetails::default()
                },
                now,
            )
            .unwrap(),
        );
        (items, owned, supplied)
    }

    #[test]
    fn skips_blank_and_deleted_rows() {
        let (items, owned, _) = catalog();
        let rows = vec![
            LineRequest::default(),
            LineRequest {
                delete: true,
                ..LineRequest::new(owned, 99)
            },
            LineRequest::new(owned, 2),
        ];
        let mut errors = ValidationErrors::new();
        let accepted = prepare_lines(&rows, &items, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].index, 2);
        assert_eq!(accepted[0].line.quantity, 2);
    }

    #[test]
    fn half_filled_row_is_rejected() {
        let (items, owned, _) = catalog();
        let rows = vec![LineRequest {
            item: Some(owned),
            quantity: None,
            delete: false,
        }];
        let mut errors = ValidationErrors::new();
        assert!(prepare_lines(&rows, &items, &mut errors).is_empty());
        assert_eq!(
            errors.for_line(0).next().map(|e| e.message.as_str()),
            Some("Both item and quantity are required if using this row.")
        );
    }

    #[test]
    fn owned_quantity_cannot_exceed_stock_ceiling() {
        let (items, owned, _) = catalog();
        let mut errors = ValidationErrors::new();
        prepare_lines(&[LineRequest::new(owned, 11)], &items, &mut errors);
        let message = &errors.for_line(0).next().unwrap().message;
        assert!(message.contains("Only 10 total units"));
    }

    #[test]
    fn client_supplied_items_skip_ceiling() {
        let (items, _, supplied) = catalog();
        let mut errors = ValidationErrors::new();
        let accepted = prepare_lines(&[LineRequest::new(supplied, 40)], &items, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(accepted[0].line.quantity, 40);
    }

    #[test]
    fn rejects_non_positive_quantities_and_duplicates() {
        let (items, owned, _) = catalog();
        let rows = vec![
            LineRequest::new(owned, 0),
            LineRequest::new(owned, 1),
            LineRequest::new(owned, 1),
        ];
        let mut errors = ValidationErrors::new();
        let accepted = prepare_lines(&rows, &items, &mut errors);

        assert_eq!(accepted.len(), 1);
        assert_eq!(errors.for_line(0).count(), 1);
        assert_eq!(errors.for_line(2).count(), 1);
    }

    #[test]
    fn unknown_item_is_a_row_error() {
        let (items, _, _) = catalog();
        let mut errors = ValidationErrors::new();
        prepare_lines(&[LineRequest::new(ItemId::new(), 1)], &items, &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
