//! Catalog records: clients, suppliers, categories, items and staff users.
//!
//! Reference rules on delete:
//! - client: refused while any booking or quote names it
//! - supplier: items keep existing with no supplier
//! - category: subcategories go too, items keep existing with no category
//! - item: refused while any booking or quote lists it
//! - user: bookings and quotes lose their project manager, the user's
//!   notifications go with them

use std::collections::BTreeSet;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use eventstock_bookings::BookingType;
use eventstock_core::{CategoryId, ClientId, ItemId, SupplierId, UserId, ValidationErrors};
use eventstock_inventory::{
    Category, CategoryDetails, Item, ItemDetails, ItemSource, Sku, category_path,
    would_create_cycle,
};
use eventstock_parties::{Client, ClientDetails, Supplier, SupplierDetails};
use eventstock_staff::{StaffUser, UserDetails};

use crate::error::{Blocker, ConflictInfo, ServiceError, ServiceResult};
use crate::store::{Store, Tables, upsert};

/// A category with its display path (`"Furniture > Chairs"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub path: String,
}

pub struct CatalogService<S> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Clients
    // ─────────────────────────────────────────────────────────────────────

    pub fn create_client(&self, details: ClientDetails) -> ServiceResult<Client> {
        self.store.transaction(|t| {
            let client = Client::register(ClientId::new(), details, Utc::now())?;
            ensure_unique_email(t, &client)?;
            upsert(&mut t.clients, client.clone());
            info!(client_id = %client.id_typed(), "client created");
            Ok(client)
        })
    }

    pub fn update_client(&self, id: ClientId, details: ClientDetails) -> ServiceResult<Client> {
        self.store.transaction(|t| {
            let mut client = t
                .clients
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("client", id))?;
            client.update(details, Utc::now())?;
            ensure_unique_email(t, &client)?;
            upsert(&mut t.clients, client.clone());
            Ok(client)
        })
    }

    pub fn delete_client(&self, id: ClientId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            if !t.clients.contains_key(&id) {
                return Err(ServiceError::not_found("client", id));
            }
            let count = |kind: BookingType| {
                t.bookings
                    .values()
                    .filter(|b| b.client() == id && b.booking_type() == kind)
                    .count()
            };
            let blockers = vec![
                Blocker { kind: "events", count: count(BookingType::Event) },
                Blocker { kind: "rentals", count: count(BookingType::Rental) },
                Blocker {
                    kind: "quote requests",
                    count: t.quotes.values().filter(|q| q.client() == Some(id)).count(),
                },
            ];
            if let Some(conflict) = ConflictInfo::protected("client", blockers) {
                return Err(ServiceError::Conflict(conflict));
            }
            t.clients.remove(&id);
            info!(client_id = %id, "client deleted");
            Ok(())
        })
    }

    pub fn client(&self, id: ClientId) -> ServiceResult<Client> {
        self.store
            .read(|t| t.clients.get(&id).cloned())?
            .ok_or_else(|| ServiceError::not_found("client", id))
    }

    /// All clients ordered by name.
    pub fn list_clients(&self) -> ServiceResult<Vec<Client>> {
        let mut clients = self.store.read(|t| t.clients.values().cloned().collect::<Vec<_>>())?;
        clients.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(clients)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Suppliers
    // ─────────────────────────────────────────────────────────────────────

    pub fn create_supplier(&self, details: SupplierDetails) -> ServiceResult<Supplier> {
        self.store.transaction(|t| {
            let supplier = Supplier::register(SupplierId::new(), details, Utc::now())?;
            ensure_unique_supplier(t, &supplier)?;
            upsert(&mut t.suppliers, supplier.clone());
            Ok(supplier)
        })
    }

    pub fn update_supplier(&self, id: SupplierId, details: SupplierDetails) -> ServiceResult<Supplier> {
        self.store.transaction(|t| {
            let mut supplier = t
                .suppliers
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("supplier", id))?;
            supplier.update(details, Utc::now())?;
            ensure_unique_supplier(t, &supplier)?;
            upsert(&mut t.suppliers, supplier.clone());
            Ok(supplier)
        })
    }

    pub fn delete_supplier(&self, id: SupplierId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            t.suppliers
                .remove(&id)
                .ok_or_else(|| ServiceError::not_found("supplier", id))?;
            for item in t.items.values_mut().filter(|i| i.supplier() == Some(id)) {
                item.detach_supplier();
            }
            info!(supplier_id = %id, "supplier deleted");
            Ok(())
        })
    }

    pub fn list_suppliers(&self) -> ServiceResult<Vec<Supplier>> {
        let mut suppliers = self.store.read(|t| t.suppliers.values().cloned().collect::<Vec<_>>())?;
        suppliers.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(suppliers)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────

    pub fn create_category(&self, details: CategoryDetails) -> ServiceResult<Category> {
        self.store.transaction(|t| {
            let category = Category::new(CategoryId::new(), details)?;
            check_category(t, &category)?;
            upsert(&mut t.categories, category.clone());
            Ok(category)
        })
    }

    pub fn update_category(&self, id: CategoryId, details: CategoryDetails) -> ServiceResult<Category> {
        self.store.transaction(|t| {
            if !t.categories.contains_key(&id) {
                return Err(ServiceError::not_found("category", id));
            }
            let category = Category::new(id, details)?;
            check_category(t, &category)?;
            upsert(&mut t.categories, category.clone());
            Ok(category)
        })
    }

    /// Delete a category and all of its subcategories.
    pub fn delete_category(&self, id: CategoryId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            if !t.categories.contains_key(&id) {
                return Err(ServiceError::not_found("category", id));
            }
            let mut doomed = BTreeSet::from([id]);
            loop {
                let before = doomed.len();
                let children: Vec<CategoryId> = t
                    .categories
                    .values()
                    .filter(|c| c.parent().is_some_and(|p| doomed.contains(&p)))
                    .map(Category::id_typed)
                    .collect();
                doomed.extend(children);
                if doomed.len() == before {
                    break;
                }
            }
            t.categories.retain(|cid, _| !doomed.contains(cid));
            for item in t.items.values_mut() {
                if item.category().is_some_and(|c| doomed.contains(&c)) {
                    item.detach_category();
                }
            }
            info!(category_id = %id, removed = doomed.len(), "category deleted");
            Ok(())
        })
    }

    /// All categories with display paths, ordered by path.
    pub fn list_categories(&self) -> ServiceResult<Vec<CategoryView>> {
        let mut views = self.store.read(|t| {
            t.categories
                .values()
                .map(|c| CategoryView {
                    category: c.clone(),
                    path: category_path(&t.categories, c.id_typed())
                        .unwrap_or_else(|| c.name().to_string()),
                })
                .collect::<Vec<_>>()
        })?;
        views.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(views)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Items
    // ─────────────────────────────────────────────────────────────────────

    /// Create an item and assign its SKU.
    pub fn create_item(&self, details: ItemDetails) -> ServiceResult<Item> {
        self.store.transaction(|t| {
            check_item_refs(t, &details)?;
            let category_name = details
                .category
                .and_then(|c| t.categories.get(&c))
                .map(|c| c.name().to_string());
            let number = t.next_sku_number();
            let sku = Sku::generate(category_name.as_deref(), number);
            let item = Item::create(ItemId::new(), sku, details, Utc::now())?;
            upsert(&mut t.items, item.clone());
            info!(item_id = %item.id_typed(), sku = %item.sku(), "item created");
            Ok(item)
        })
    }

    pub fn update_item(&self, id: ItemId, details: ItemDetails) -> ServiceResult<Item> {
        self.store.transaction(|t| {
            check_item_refs(t, &details)?;
            let item = t
                .items
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("item", id))?;
            item.update(details, Utc::now())?;
            Ok(item.clone())
        })
    }

    pub fn delete_item(&self, id: ItemId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            if !t.items.contains_key(&id) {
                return Err(ServiceError::not_found("item", id));
            }
            let count = |kind: BookingType| {
                t.bookings_using(id)
                    .filter(|b| b.booking_type() == kind)
                    .count()
            };
            let blockers = vec![
                Blocker { kind: "events", count: count(BookingType::Event) },
                Blocker { kind: "rentals", count: count(BookingType::Rental) },
                Blocker {
                    kind: "quote requests",
                    count: t
                        .quotes
                        .values()
                        .filter(|q| q.lines().iter().any(|l| l.item == id))
                        .count(),
                },
            ];
            if let Some(conflict) = ConflictInfo::protected("item", blockers) {
                return Err(ServiceError::Conflict(conflict));
            }
            t.items.remove(&id);
            info!(item_id = %id, "item deleted");
            Ok(())
        })
    }

    pub fn item(&self, id: ItemId) -> ServiceResult<Item> {
        self.store
            .read(|t| t.items.get(&id).cloned())?
            .ok_or_else(|| ServiceError::not_found("item", id))
    }

    /// All items ordered by name.
    pub fn list_items(&self) -> ServiceResult<Vec<Item>> {
        let mut items = self.store.read(|t| t.items.values().cloned().collect::<Vec<_>>())?;
        items.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(items)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Staff users
    // ─────────────────────────────────────────────────────────────────────

    pub fn register_user(&self, details: UserDetails) -> ServiceResult<StaffUser> {
        self.store.transaction(|t| {
            let user = StaffUser::register(UserId::new(), details, Utc::now())?;
            let taken = t
                .users
                .values()
                .any(|u| u.username().eq_ignore_ascii_case(user.username()));
            if taken {
                return Err(ServiceError::field("username", "A user with that username already exists."));
            }
            upsert(&mut t.users, user.clone());
            Ok(user)
        })
    }

    pub fn suspend_user(&self, id: UserId) -> ServiceResult<StaffUser> {
        self.with_user(id, StaffUser::suspend)
    }

    pub fn reactivate_user(&self, id: UserId) -> ServiceResult<StaffUser> {
        self.with_user(id, StaffUser::reactivate)
    }

    pub fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            t.users
                .remove(&id)
                .ok_or_else(|| ServiceError::not_found("user", id))?;
            for booking in t.bookings.values_mut().filter(|b| b.project_manager() == Some(id)) {
                booking.detach_project_manager();
            }
            for quote in t.quotes.values_mut().filter(|q| q.project_manager() == Some(id)) {
                quote.detach_project_manager();
            }
            t.notifications.retain(|_, n| n.user() != Some(id));
            info!(user_id = %id, "user deleted");
            Ok(())
        })
    }

    pub fn list_users(&self) -> ServiceResult<Vec<StaffUser>> {
        Ok(self.store.read(|t| t.users.values().cloned().collect())?)
    }

    fn with_user(&self, id: UserId, f: impl FnOnce(&mut StaffUser)) -> ServiceResult<StaffUser> {
        self.store.transaction(|t| {
            let user = t
                .users
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("user", id))?;
            f(user);
            Ok(user.clone())
        })
    }
}

fn ensure_unique_email(t: &Tables, client: &Client) -> ServiceResult<()> {
    let Some(email) = client.email() else {
        return Ok(());
    };
    let taken = t
        .clients
        .values()
        .any(|c| c.id_typed() != client.id_typed() && c.email() == Some(email));
    if taken {
        return Err(ServiceError::field("email", "A client with this email already exists."));
    }
    Ok(())
}

fn ensure_unique_supplier(t: &Tables, supplier: &Supplier) -> ServiceResult<()> {
    let taken = t.suppliers.values().any(|s| {
        s.id_typed() != supplier.id_typed() && s.name().eq_ignore_ascii_case(supplier.name())
    });
    if taken {
        return Err(ServiceError::field("name", "A supplier with this name already exists."));
    }
    Ok(())
}

fn check_category(t: &Tables, category: &Category) -> ServiceResult<()> {
    let mut errors = ValidationErrors::new();
    let taken = t.categories.values().any(|c| {
        c.id_typed() != category.id_typed() && c.name().eq_ignore_ascii_case(category.name())
    });
    if taken {
        errors.field("name", "A category with this name already exists.");
    }
    if let Some(parent) = category.parent() {
        if !t.categories.contains_key(&parent) {
            errors.field("parent", "Select a valid category.");
        } else if would_create_cycle(&t.categories, category.id_typed(), Some(parent)) {
            errors.field(
                "parent",
                "A category cannot be nested under itself or one of its subcategories.",
            );
        }
    }
    Ok(errors.into_result(())?)
}

fn check_item_refs(t: &Tables, details: &ItemDetails) -> ServiceResult<()> {
    let mut errors = ValidationErrors::new();
    if details.category.is_some_and(|c| !t.categories.contains_key(&c)) {
        errors.field("category", "Select a valid category.");
    }
    if details.item_source == ItemSource::Owned
        && details.supplier.is_some_and(|s| !t.suppliers.contains_key(&s))
    {
        errors.field("supplier", "Select a valid supplier.");
    }
    Ok(errors.into_result(())?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::InMemoryStore;
    use eventstock_parties::ContactInfo;

    fn service() -> CatalogService<Arc<InMemoryStore>> {
        CatalogService::new(Arc::new(InMemoryStore::new()))
    }

    fn client_details(name: &str, email: Option<&str>) -> ClientDetails {
        ClientDetails {
            name: name.into(),
            contact: ContactInfo {
                email: email.map(str::to_string),
                ..ContactInfo::default()
            },
            ..ClientDetails::default()
        }
    }

    #[test]
    fn client_email_must_be_unique_ignoring_case() {
        let catalog = service();
        catalog.create_client(client_details("A", Some("ops@acme.com"))).unwrap();
        let err = catalog
            .create_client(client_details("B", Some("OPS@acme.com")))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn sku_uses_category_prefix_and_sequence() {
        let catalog = service();
        let furniture = catalog
            .create_category(CategoryDetails { name: "furniture".into(), parent: None })
            .unwrap();
        let chair = catalog
            .create_item(ItemDetails {
                name: "Chair".into(),
                category: Some(furniture.id_typed()),
                initial_quantity: 40,
                ..ItemDetails::default()
            })
            .unwrap();
        let misc = catalog
            .create_item(ItemDetails { name: "Rope".into(), ..ItemDetails::default() })
            .unwrap();

        assert_eq!(chair.sku().as_str(), "FU-000001");
        assert_eq!(misc.sku().as_str(), "ITEM-000002");
    }

    #[test]
    fn deleting_category_cascades_and_detaches_items() {
        let catalog = service();
        let root = catalog
            .create_category(CategoryDetails { name: "Furniture".into(), parent: None })
            .unwrap();
        let child = catalog
            .create_category(CategoryDetails { name: "Chairs".into(), parent: Some(root.id_typed()) })
            .unwrap();
        let chair = catalog
            .create_item(ItemDetails {
                name: "Chair".into(),
                category: Some(child.id_typed()),
                ..ItemDetails::default()
            })
            .unwrap();

        let paths: Vec<String> = catalog.list_categories().unwrap().into_iter().map(|v| v.path).collect();
        assert_eq!(paths, vec!["Furniture", "Furniture > Chairs"]);

        catalog.delete_category(root.id_typed()).unwrap();
        assert!(catalog.list_categories().unwrap().is_empty());
        assert_eq!(catalog.item(chair.id_typed()).unwrap().category(), None);
    }

    #[test]
    fn category_cannot_be_moved_under_its_descendant() {
        let catalog = service();
        let root = catalog
            .create_category(CategoryDetails { name: "Furniture".into(), parent: None })
            .unwrap();
        let child = catalog
            .create_category(CategoryDetails { name: "Chairs".into(), parent: Some(root.id_typed()) })
            .unwrap();
        let err = catalog
            .update_category(
                root.id_typed(),
                CategoryDetails { name: "Furniture".into(), parent: Some(child.id_typed()) },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn deleting_supplier_clears_item_supplier() {
        let catalog = service();
        let supplier = catalog
            .create_supplier(SupplierDetails { name: "TentCo".into(), ..SupplierDetails::default() })
            .unwrap();
        let tent = catalog
            .create_item(ItemDetails {
                name: "Tent".into(),
                supplier: Some(supplier.id_typed()),
                ..ItemDetails::default()
            })
            .unwrap();
        assert_eq!(tent.supplier(), Some(supplier.id_typed()));

        catalog.delete_supplier(supplier.id_typed()).unwrap();
        assert_eq!(catalog.item(tent.id_typed()).unwrap().supplier(), None);
    }

    #[test]
    fn unknown_references_are_field_errors() {
        let catalog = service();
        let err = catalog
            .create_item(ItemDetails {
                name: "Tent".into(),
                category: Some(CategoryId::new()),
                supplier: Some(SupplierId::new()),
                ..ItemDetails::default()
            })
            .unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn missing_records_are_not_found() {
        let catalog = service();
        assert!(matches!(
            catalog.delete_client(ClientId::new()),
            Err(ServiceError::NotFound { entity: "client", .. })
        ));
        assert!(matches!(
            catalog.item(ItemId::new()),
            Err(ServiceError::NotFound { entity: "item", .. })
        ));
    }

    #[test]
    fn usernames_are_unique() {
        let catalog = service();
        let details = UserDetails { username: "sam".into(), ..UserDetails::default() };
        catalog.register_user(details.clone()).unwrap();
        assert!(catalog.register_user(details).is_err());
    }
}
