//! Deduplicated, alphabetically ordered item catalog.

use std::collections::HashSet;

use crate::model::NameCollator;

/// An entry a [`Catalog`] can hold.
pub trait CatalogItem {
    /// Stable identifier; duplicates of it are rejected.
    fn id(&self) -> &str;

    /// Name shown to the user; drives alphabetical ordering.
    fn display_name(&self) -> &str;
}

/// Identifier-keyed item collection with on-demand alphabetical order.
///
/// Insertions and removals keep the collection deduplicated but do not
/// sort; [`materialize`](Self::materialize) stable-sorts the display order
/// by locale-aware collation of the display names, once per reload rather
/// than per insertion. Names that collate equal keep their insertion
/// order, so repeated materializations are deterministic.
///
/// Between materializations the display order is the last sorted sequence
/// with later insertions appended at the end; removals take effect
/// immediately.
#[derive(Debug)]
pub struct Catalog<T> {
    entries: Vec<T>,
    ids: HashSet<String>,
    /// Display order as a permutation of entry indices.
    order: Vec<usize>,
    materialized: bool,
    collator: NameCollator,
}

impl<T: CatalogItem> Catalog<T> {
    /// Create an empty catalog collating in the system locale.
    pub fn new() -> Self {
        Self::with_collator(NameCollator::new())
    }

    /// Create an empty catalog with an explicit collator.
    pub fn with_collator(collator: NameCollator) -> Self {
        Self {
            entries: Vec::new(),
            ids: HashSet::new(),
            order: Vec::new(),
            materialized: false,
            collator,
        }
    }

    /// Register an item, rejecting duplicate identifiers.
    ///
    /// Returns `false` and leaves the catalog untouched when an item with
    /// the same identifier is already present.
    pub fn add(&mut self, item: T) -> bool {
        if self.ids.contains(item.id()) {
            tracing::debug!(target: "trellis::model", id = item.id(), "duplicate item ignored");
            return false;
        }
        self.ids.insert(item.id().to_owned());
        self.order.push(self.entries.len());
        self.entries.push(item);
        self.materialized = false;
        true
    }

    /// Remove the item with the given identifier, if present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let position = self.entries.iter().position(|item| item.id() == id)?;
        self.ids.remove(id);
        let removed = self.entries.remove(position);

        // Fix the display order around the removed entry index.
        self.order.retain(|&index| index != position);
        for index in &mut self.order {
            if *index > position {
                *index -= 1;
            }
        }
        Some(removed)
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
        self.order.clear();
        self.materialized = false;
    }

    /// Whether an item with the given identifier is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the display order reflects the current item set.
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    /// Stable-sort the display order by collated display name.
    ///
    /// O(n log n); intended to run once per full reload.
    pub fn materialize(&mut self) {
        let entries = &self.entries;
        let collator = &self.collator;
        self.order.sort_by(|&a, &b| {
            let left = entries.get(a).map_or("", |item| item.display_name());
            let right = entries.get(b).map_or("", |item| item.display_name());
            collator.compare(left, right)
        });
        self.materialized = true;
        tracing::debug!(
            target: "trellis::model",
            items = self.entries.len(),
            "catalog materialized"
        );
    }

    /// Items in display order.
    pub fn ordered(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(move |&index| self.entries.get(index))
    }

    /// The item at a display-order position.
    pub fn item_at(&self, position: usize) -> Option<&T> {
        self.order
            .get(position)
            .and_then(|&index| self.entries.get(index))
    }
}

impl<T: CatalogItem> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}
