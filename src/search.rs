use crate::catalog::{Catalog, CatalogItem};
use crate::model::TreeFilter;
use crate::node::NodeId;
use crate::tree::SelectTree;

/// Case-insensitive substring match on item names.
///
/// As a [`TreeFilter`] it matches selectable leaves only; branches stay
/// visible while one of their descendants matches. An empty query matches
/// every leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.needle
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.needle.is_empty() || text.to_lowercase().contains(&self.needle)
    }
}

impl<I: CatalogItem> TreeFilter<SelectTree<I>> for NameFilter {
    fn is_match(&self, model: &SelectTree<I>, id: NodeId) -> bool {
        model
            .leaf(id)
            .is_some_and(|leaf| leaf.is_selectable() && self.matches(leaf.text()))
    }
}

/// Returns the keys of every item whose name or alternate name contains
/// `query`, in catalog order. Each item appears at most once.
pub fn search_catalog<I: CatalogItem>(catalog: &Catalog<I>, query: &str) -> Vec<I::Key> {
    let filter = NameFilter::new(query);
    catalog
        .iter()
        .filter(|item| {
            filter.matches(item.name()) || item.alt_names().iter().any(|alt| filter.matches(alt))
        })
        .map(CatalogItem::key)
        .collect()
}
