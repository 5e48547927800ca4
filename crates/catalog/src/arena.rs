//! Pre-order flattening of a nested catalog document into an arena of flat records.
//!
//! Nodes are addressed by id and laid out in pre-order, so every node's subtree is
//! the contiguous range `index..subtree_end`. Parent ids are stamped top-down while
//! walking; a child never keeps the parent id its caller supplied.

use std::collections::HashMap;

use storefront_core::CatalogId;
use storefront_inventory::ItemInput;

use crate::node::{CatalogInput, CatalogNode};

/// A flattened node plus the end (exclusive) of its pre-order subtree range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaNode {
    pub node: CatalogNode,
    pub subtree_end: usize,
}

/// Flat view of one catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogArena {
    nodes: Vec<ArenaNode>,
    index: HashMap<CatalogId, usize>,
    items: Vec<ItemInput>,
    duplicates: Vec<CatalogId>,
}

enum Visit<'a> {
    Enter {
        input: &'a CatalogInput,
        parent: Option<usize>,
    },
    Exit(usize),
}

impl CatalogArena {
    /// Flatten `root` in pre-order.
    ///
    /// The root keeps the parent id it was given unless that id names a node of this
    /// same document, in which case it is cleared. Every descendant is stamped with
    /// its containing node's id, and every item with its containing node's catalog
    /// id. When an id repeats inside the document, the first occurrence wins and the
    /// repeat is dropped together with its subtree, which keeps the result acyclic.
    pub fn flatten(root: &CatalogInput) -> Self {
        let mut arena = Self::default();
        let mut stack = vec![Visit::Enter {
            input: root,
            parent: None,
        }];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter { input, parent } => {
                    let id = input.catalog_id;
                    if arena.index.contains_key(&id) {
                        arena.duplicates.push(id);
                        continue;
                    }

                    let parent_id = match parent {
                        Some(p) => {
                            arena.nodes[p].node.child_ids.push(id);
                            Some(arena.nodes[p].node.id)
                        }
                        None => input.parent_id,
                    };

                    let mut item_ids = Vec::with_capacity(input.items.len());
                    for item in &input.items {
                        let mut placed = item.clone();
                        placed.catalog_id = Some(id);
                        item_ids.push(placed.item_id);
                        arena.items.push(placed);
                    }

                    let idx = arena.nodes.len();
                    arena.nodes.push(ArenaNode {
                        node: CatalogNode {
                            id,
                            name: input.name.clone(),
                            parent_id,
                            child_ids: Vec::with_capacity(input.children.len()),
                            item_ids,
                        },
                        subtree_end: idx + 1,
                    });
                    arena.index.insert(id, idx);

                    stack.push(Visit::Exit(idx));
                    for child in input.children.iter().rev() {
                        stack.push(Visit::Enter {
                            input: child,
                            parent: Some(idx),
                        });
                    }
                }
                Visit::Exit(idx) => {
                    arena.nodes[idx].subtree_end = arena.nodes.len();
                }
            }
        }

        if let Some(root) = arena.nodes.first_mut() {
            if root.node.parent_id.is_some_and(|p| arena.index.contains_key(&p)) {
                root.node.parent_id = None;
            }
        }

        arena
    }

    pub fn nodes(&self) -> &[ArenaNode] {
        &self.nodes
    }

    /// Items in pre-order, each stamped with its containing node's id.
    pub fn items(&self) -> &[ItemInput] {
        &self.items
    }

    pub fn root(&self) -> Option<&CatalogNode> {
        self.nodes.first().map(|n| &n.node)
    }

    pub fn get(&self, id: CatalogId) -> Option<&CatalogNode> {
        self.index.get(&id).map(|&i| &self.nodes[i].node)
    }

    /// Ids that appeared more than once in the document (repeats were dropped).
    pub fn duplicates(&self) -> &[CatalogId] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
