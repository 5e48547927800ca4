use serde::Serialize;
use tracing::{debug, info, instrument};

use storefront_catalog::{CatalogArena, CatalogInput, CatalogNode};
use storefront_core::CatalogId;
use storefront_inventory::Item;

use crate::config::StorefrontConfig;
use crate::store::{ItemFilter, Page, StoreError, StoreHandles};

use super::{ServiceError, ServiceResult};

/// What one seeding pass inserted and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub catalogs_inserted: usize,
    pub catalogs_skipped: usize,
    pub items_inserted: usize,
    pub items_skipped: usize,
    pub sellers_inserted: usize,
    pub sellers_skipped: usize,
}

/// Catalog tree builder and catalog reads.
#[derive(Debug, Clone)]
pub struct CatalogService {
    stores: StoreHandles,
    page_size: usize,
}

impl CatalogService {
    pub fn new(stores: StoreHandles, config: &StorefrontConfig) -> Self {
        Self {
            stores,
            page_size: config.catalog_page_size,
        }
    }

    /// Insert a nested catalog document and return the stored root.
    ///
    /// Seeding is idempotent per id: a node that already exists is left alone and
    /// its whole subtree is skipped; items that already exist are skipped one by
    /// one. Any other failure stops the walk and is returned; whatever was written
    /// before it stays written.
    pub fn add_catalog(&self, input: &CatalogInput) -> ServiceResult<CatalogNode> {
        self.seed_tree(input)?;
        self.lookup_catalog(input.catalog_id)?
            .ok_or_else(|| ServiceError::not_found(format!("catalog {}", input.catalog_id)))
    }

    /// Same walk as [`add_catalog`](Self::add_catalog), reporting counts instead
    /// of the root.
    #[instrument(skip(self, input), fields(root = %input.catalog_id), err)]
    pub fn seed_tree(&self, input: &CatalogInput) -> ServiceResult<SeedReport> {
        let arena = CatalogArena::flatten(input);
        for id in arena.duplicates() {
            debug!(catalog_id = %id, "catalog id repeated inside document; repeat dropped");
        }

        let mut report = SeedReport::default();
        self.insert_nodes(&arena, &mut report)?;
        self.insert_items(&arena, &mut report)?;

        info!(
            catalogs_inserted = report.catalogs_inserted,
            catalogs_skipped = report.catalogs_skipped,
            items_inserted = report.items_inserted,
            items_skipped = report.items_skipped,
            "catalog seeded"
        );
        Ok(report)
    }

    fn insert_nodes(&self, arena: &CatalogArena, report: &mut SeedReport) -> ServiceResult<()> {
        let nodes = arena.nodes();
        let mut idx = 0;
        while idx < nodes.len() {
            let entry = &nodes[idx];
            match self.stores.catalogs.insert(entry.node.clone()) {
                Ok(()) => {
                    report.catalogs_inserted += 1;
                    idx += 1;
                }
                Err(StoreError::Duplicate(_)) => {
                    debug!(catalog_id = %entry.node.id, "catalog exists; subtree skipped");
                    report.catalogs_skipped += entry.subtree_end - idx;
                    idx = entry.subtree_end;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn insert_items(&self, arena: &CatalogArena, report: &mut SeedReport) -> ServiceResult<()> {
        for input in arena.items() {
            let item = Item::create(input)?;
            match self.stores.items.insert(item) {
                Ok(()) => report.items_inserted += 1,
                Err(StoreError::Duplicate(_)) => {
                    debug!(item_id = %input.item_id, "item exists; skipped");
                    report.items_skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// `None` when no node has this id.
    pub fn lookup_catalog(&self, id: CatalogId) -> ServiceResult<Option<CatalogNode>> {
        Ok(self.stores.catalogs.get(id)?)
    }

    /// Child nodes in stored order. Children missing from the store are skipped.
    pub fn catalog_children(&self, id: CatalogId) -> ServiceResult<Vec<CatalogNode>> {
        let node = self
            .lookup_catalog(id)?
            .ok_or_else(|| ServiceError::not_found(format!("catalog {id}")))?;

        let mut children = Vec::with_capacity(node.child_ids.len());
        for child_id in &node.child_ids {
            if let Some(child) = self.stores.catalogs.get(*child_id)? {
                children.push(child);
            }
        }
        Ok(children)
    }

    /// The parent node, or `None` for roots (and for parents that were never stored).
    pub fn catalog_parent(&self, id: CatalogId) -> ServiceResult<Option<CatalogNode>> {
        let node = self
            .lookup_catalog(id)?
            .ok_or_else(|| ServiceError::not_found(format!("catalog {id}")))?;

        match node.parent_id {
            Some(parent_id) => Ok(self.stores.catalogs.get(parent_id)?),
            None => Ok(None),
        }
    }

    /// Items filed under `catalog_id`, ordered by id. A missing or zero `limit`
    /// means the configured page size; `offset` defaults to zero.
    pub fn items_by_catalog(
        &self,
        catalog_id: CatalogId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> ServiceResult<Vec<Item>> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(self.page_size);
        let page = Page::new(Some(limit), offset.unwrap_or(0));
        Ok(self
            .stores
            .items
            .find(ItemFilter::Catalog(catalog_id), page)?)
    }
}
