use serde::{Deserialize, Serialize};

use storefront_core::{CatalogId, Entity, ItemId};
use storefront_inventory::ItemInput;

/// Nested catalog document: a category with its items and child categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInput {
    #[serde(rename = "id")]
    pub catalog_id: CatalogId,
    pub name: String,
    /// Only honoured on the root; children are stamped with their parent's id.
    #[serde(default)]
    pub parent_id: Option<CatalogId>,
    #[serde(default, alias = "childs")]
    pub children: Vec<CatalogInput>,
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

/// Flat, independently addressable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNode {
    pub id: CatalogId,
    pub name: String,
    pub parent_id: Option<CatalogId>,
    /// Child categories, in document order.
    pub child_ids: Vec<CatalogId>,
    /// Items owned directly by this category, in document order.
    pub item_ids: Vec<ItemId>,
}

impl CatalogNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for CatalogNode {
    type Id = CatalogId;
    const KIND: &'static str = "catalog";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_document_with_childs_key() {
        let json = r#"{
            "id": 1,
            "name": "root",
            "childs": [
                {"id": 2, "name": "phones", "items": [
                    {"id": 10, "name": "p1", "in_stock": 4, "seller_id": 1}
                ]}
            ]
        }"#;

        let input: CatalogInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.catalog_id, CatalogId::new(1));
        assert_eq!(input.parent_id, None);
        assert_eq!(input.children.len(), 1);
        assert_eq!(input.children[0].items[0].item_id, ItemId::new(10));
    }
}
