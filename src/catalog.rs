use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxBuildHasher, FxHashMap};

/// An item the catalog exposes to the selection tree.
///
/// Items are read-only for the lifetime of the [`Catalog`] that owns them.
pub trait CatalogItem {
    /// Selection identity of the item.
    type Key: Clone + Eq + Hash + Debug;

    /// Returns the key that identifies this item.
    fn key(&self) -> Self::Key;
    /// Returns the display name.
    fn name(&self) -> &str;
    /// Other names the item is known by. Searched along with [`name`](Self::name).
    fn alt_names(&self) -> &[String] {
        &[]
    }
}

/// Ordered snapshot of catalog items.
///
/// The order is the provider's stored order and is never re-sorted; callers
/// that want a by-name listing sort before constructing the catalog.
#[derive(Clone, Debug)]
pub struct Catalog<I: CatalogItem> {
    items: Vec<I>,
    index: FxHashMap<I::Key, usize>,
}

impl<I: CatalogItem> Catalog<I> {
    /// Builds a catalog from items in their stored order.
    ///
    /// When two items share a key, lookups resolve to the first one.
    pub fn new(items: impl IntoIterator<Item = I>) -> Self {
        let items: Vec<I> = items.into_iter().collect();
        let mut index = FxHashMap::with_capacity_and_hasher(items.len(), FxBuildHasher);
        for (pos, item) in items.iter().enumerate() {
            index.entry(item.key()).or_insert(pos);
        }
        Self { items, index }
    }

    /// Returns all items in stored order.
    #[inline]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Resolves a key to its item, or `None` if the key is stale.
    pub fn get(&self, key: &I::Key) -> Option<&I> {
        self.index.get(key).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, key: &I::Key) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.items.iter()
    }

    /// Counts the items matching `predicate`.
    pub fn count_matching(&self, predicate: impl Fn(&I) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(item)).count()
    }
}

impl<'a, I: CatalogItem> IntoIterator for &'a Catalog<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(u32, &'static str);

    impl CatalogItem for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }

        fn name(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn keeps_stored_order_and_resolves_keys() {
        let catalog = Catalog::new([Item(7, "Spider"), Item(1, "Klondike"), Item(3, "Golf")]);

        let names: Vec<_> = catalog.iter().map(CatalogItem::name).collect();
        assert_eq!(names, vec!["Spider", "Klondike", "Golf"]);
        assert_eq!(catalog.get(&1).map(CatalogItem::name), Some("Klondike"));
        assert!(catalog.get(&2).is_none());
    }

    #[test]
    fn duplicate_keys_resolve_to_first_item() {
        let catalog = Catalog::new([Item(1, "first"), Item(1, "second")]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&1).map(CatalogItem::name), Some("first"));
    }
}
