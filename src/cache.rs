use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::catalog::CatalogItem;
use crate::tree::SelectTree;

/// Which selection dialog a tree belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogKind {
    Games,
    Cardsets,
    /// Cardsets restricted to the type group, as used by the options dialog.
    CardsetsByType,
    Tiles,
}

/// Process-lifetime store of built trees, owned by the application.
///
/// Every dialog of one kind gets the same [`SelectTree`], so computed
/// children, expansion flags and the last scroll position carry over.
pub struct TreeCache<I: CatalogItem> {
    trees: FxHashMap<CatalogKind, Rc<SelectTree<I>>>,
}

impl<I: CatalogItem> Default for TreeCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: CatalogItem> TreeCache<I> {
    pub fn new() -> Self {
        Self {
            trees: FxHashMap::default(),
        }
    }

    /// Returns the tree for `kind`, building it on the first request.
    pub fn get_or_build(
        &mut self,
        kind: CatalogKind,
        build: impl FnOnce() -> SelectTree<I>,
    ) -> Rc<SelectTree<I>> {
        if let Some(tree) = self.trees.get(&kind) {
            tracing::debug!(message = "select_tree.cache_hit", kind = ?kind);
            return Rc::clone(tree);
        }
        tracing::debug!(message = "select_tree.cache_miss", kind = ?kind);
        let tree = Rc::new(build());
        self.trees.insert(kind, Rc::clone(&tree));
        tree
    }

    pub fn get(&self, kind: CatalogKind) -> Option<Rc<SelectTree<I>>> {
        self.trees.get(&kind).map(Rc::clone)
    }

    /// Drops the tree for `kind`; the next request rebuilds it from a fresh catalog.
    ///
    /// Open dialogs keep the tree they hold.
    pub fn invalidate(&mut self, kind: CatalogKind) -> bool {
        self.trees.remove(&kind).is_some()
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl<I: CatalogItem> fmt::Debug for TreeCache<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.trees.keys().copied().collect();
        kinds.sort_unstable();
        f.debug_struct("TreeCache").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::SelectTreeConfig;
    use crate::node::BranchSpec;

    struct Cardset(usize);

    impl CatalogItem for Cardset {
        type Key = usize;

        fn key(&self) -> usize {
            self.0
        }

        fn name(&self) -> &str {
            "Standard"
        }
    }

    fn build() -> SelectTree<Cardset> {
        SelectTree::build(
            Catalog::new([Cardset(1)]),
            [BranchSpec::all("All Cardsets")],
            &SelectTreeConfig::default(),
        )
    }

    #[test]
    fn repeated_requests_share_one_tree() {
        let mut cache = TreeCache::new();
        let mut builds = 0;

        let first = cache.get_or_build(CatalogKind::Cardsets, || {
            builds += 1;
            build()
        });
        let second = cache.get_or_build(CatalogKind::Cardsets, || {
            builds += 1;
            build()
        });

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(builds, 1);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = TreeCache::new();
        let first = cache.get_or_build(CatalogKind::Tiles, build);

        assert!(cache.invalidate(CatalogKind::Tiles));
        assert!(!cache.invalidate(CatalogKind::Tiles));
        let second = cache.get_or_build(CatalogKind::Tiles, build);

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
