use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use eventstock_core::{CategoryId, Entity, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDetails {
    pub name: String,
    pub parent: Option<CategoryId>,
}

/// Item category (e.g. Furniture > Chairs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    parent: Option<CategoryId>,
}

impl Category {
    pub fn new(id: CategoryId, details: CategoryDetails) -> Result<Self, ValidationErrors> {
        let name = validate_name(&details.name)?;
        if details.parent == Some(id) {
            let mut errors = ValidationErrors::new();
            errors.field("parent", "A category cannot be its own parent.");
            return Err(errors);
        }
        Ok(Self {
            id,
            name,
            parent: details.parent,
        })
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<CategoryId> {
        self.parent
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationErrors> {
        self.name = validate_name(name)?;
        Ok(())
    }

    pub fn set_parent(&mut self, parent: Option<CategoryId>) {
        self.parent = parent;
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(name: &str) -> Result<String, ValidationErrors> {
    let name = name.trim();
    let mut errors = ValidationErrors::new();
    if name.is_empty() {
        errors.field("name", "Name cannot be empty.");
    } else if name.chars().count() > 100 {
        errors.field("name", "Name cannot exceed 100 characters.");
    }
    errors.into_result(name.to_string())
}

/// Whether re-parenting `id` under `new_parent` would make `id` its own ancestor.
pub fn would_create_cycle(
    categories: &BTreeMap<CategoryId, Category>,
    id: CategoryId,
    new_parent: Option<CategoryId>,
) -> bool {
    let mut cursor = new_parent;
    let mut hops = 0usize;
    while let Some(current) = cursor {
        if current == id || hops > categories.len() {
            return true;
        }
        cursor = categories.get(&current).and_then(Category::parent);
        hops += 1;
    }
    false
}

/// Display path such as `"Furniture > Chairs"`.
pub fn category_path(categories: &BTreeMap<CategoryId, Category>, id: CategoryId) -> Option<String> {
    let mut names = Vec::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let category = categories.get(&current)?;
        names.push(category.name());
        if names.len() > categories.len() {
            break;
        }
        cursor = category.parent();
    }
    names.reverse();
    Some(names.join(" > "))
}
