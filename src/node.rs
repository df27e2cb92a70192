use std::cell::{Cell, OnceCell};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Identifier of a node inside one [`SelectTree`](crate::SelectTree).
///
/// Branch ids index the branch arena. Leaf ids are positions inside the
/// memoized contents of their owning branch, so they stay valid for the
/// lifetime of the tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Branch(u32),
    Leaf { branch: u32, index: u32 },
}

impl NodeId {
    #[inline]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    #[inline]
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// Returns the owning branch of a leaf.
    #[inline]
    pub const fn owning_branch(self) -> Option<Self> {
        match self {
            Self::Leaf { branch, .. } => Some(Self::Branch(branch)),
            Self::Branch(_) => None,
        }
    }
}

/// Item filter used to compute a branch's leaves.
pub type Predicate<I> = Box<dyn Fn(&I) -> bool>;

/// Where a branch takes its children from.
pub enum ChildSource<I: CatalogItem> {
    /// Sub-branches fixed at construction.
    Fixed(Vec<NodeId>),
    /// Leaves computed lazily from the catalog, one per matching item.
    Predicate(Predicate<I>),
    /// Leaves built from an ordered key/text list (alternate names, chunks).
    Pairs(Vec<(I::Key, String)>),
}

impl<I: CatalogItem> fmt::Debug for ChildSource<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(ids) => f.debug_tuple("Fixed").field(ids).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Pairs(pairs) => f.debug_tuple("Pairs").field(&pairs.len()).finish(),
        }
    }
}

/// A selectable (or placeholder) entry of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf<K> {
    key: Option<K>,
    text: String,
    parent: NodeId,
}

impl<K> Leaf<K> {
    /// Returns the item key, or `None` for the "(no items)" placeholder.
    #[inline]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the branch this leaf was produced by.
    #[inline]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    #[inline]
    pub const fn is_selectable(&self) -> bool {
        self.key.is_some()
    }
}

pub(crate) struct Contents<K> {
    pub(crate) ids: Vec<NodeId>,
    pub(crate) leaves: Vec<Leaf<K>>,
}

/// A category node.
pub struct Branch<I: CatalogItem> {
    label: String,
    parent: Option<NodeId>,
    pub(crate) source: ChildSource<I>,
    expanded: Cell<bool>,
    contents: OnceCell<Contents<I::Key>>,
}

impl<I: CatalogItem> Branch<I> {
    pub(crate) const fn new(
        label: String,
        parent: Option<NodeId>,
        source: ChildSource<I>,
        expanded: bool,
    ) -> Self {
        Self {
            label,
            parent,
            source,
            expanded: Cell::new(expanded),
            contents: OnceCell::new(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub const fn source(&self) -> &ChildSource<I> {
        &self.source
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub(crate) fn set_expanded(&self, expanded: bool) {
        self.expanded.set(expanded);
    }

    /// Returns `true` once the children are known without touching the catalog.
    pub fn is_materialized(&self) -> bool {
        matches!(self.source, ChildSource::Fixed(_)) || self.contents.get().is_some()
    }

    pub(crate) fn materialized(&self) -> Option<&Contents<I::Key>> {
        self.contents.get()
    }

    /// Computes the leaves on first use and returns the cached result afterwards.
    pub(crate) fn contents(&self, index: u32, items: &[I], no_items: &str) -> &Contents<I::Key> {
        self.contents.get_or_init(|| {
            let parent = NodeId::Branch(index);
            let mut leaves = match &self.source {
                ChildSource::Predicate(predicate) => items
                    .iter()
                    .filter(|item| predicate(item))
                    .map(|item| Leaf {
                        key: Some(item.key()),
                        text: item.name().to_owned(),
                        parent,
                    })
                    .collect(),
                ChildSource::Pairs(pairs) => pairs
                    .iter()
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(key, text)| Leaf {
                        key: Some(key.clone()),
                        text: text.clone(),
                        parent,
                    })
                    .collect(),
                ChildSource::Fixed(_) => Vec::new(),
            };
            let matches = leaves.len();
            if leaves.is_empty() {
                leaves.push(Leaf {
                    key: None,
                    text: no_items.to_owned(),
                    parent,
                });
            }
            tracing::debug!(
                message = "select_tree.materialize",
                branch = index,
                label = %self.label,
                matches
            );
            let ids = (0..leaves.len())
                .map(|leaf| NodeId::Leaf {
                    branch: index,
                    index: u32::try_from(leaf).unwrap_or(u32::MAX),
                })
                .collect();
            Contents { ids, leaves }
        })
    }
}

impl<I: CatalogItem> fmt::Debug for Branch<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("label", &self.label)
            .field("parent", &self.parent)
            .field("source", &self.source)
            .field("expanded", &self.expanded.get())
            .field("materialized", &self.contents.get().is_some())
            .finish()
    }
}

/// Borrowed view of either node kind.
#[derive(Debug)]
pub enum TreeNode<'a, I: CatalogItem> {
    Branch(&'a Branch<I>),
    Leaf(&'a Leaf<I::Key>),
}

impl<I: CatalogItem> TreeNode<'_, I> {
    /// Branch label or leaf text.
    pub fn text(&self) -> &str {
        match self {
            Self::Branch(branch) => branch.label(),
            Self::Leaf(leaf) => leaf.text(),
        }
    }
}

pub(crate) enum SpecKind<I: CatalogItem> {
    Group(Vec<BranchSpec<I>>),
    Filter(Predicate<I>),
    Pairs(Vec<(I::Key, String)>),
}

/// Declarative description of a branch, turned into nodes by
/// [`SelectTree::build`](crate::SelectTree::build).
pub struct BranchSpec<I: CatalogItem> {
    pub(crate) label: String,
    pub(crate) kind: SpecKind<I>,
    pub(crate) expanded: bool,
    pub(crate) hide_when_empty: bool,
}

impl<I: CatalogItem> BranchSpec<I> {
    /// A category whose children are other branches.
    ///
    /// The group is dropped at construction if none of its children survive.
    pub fn group(label: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self::with_kind(label, SpecKind::Group(children.into_iter().collect()))
    }

    /// A category listing every catalog item accepted by `predicate`.
    pub fn filter(label: impl Into<String>, predicate: impl Fn(&I) -> bool + 'static) -> Self {
        Self::with_kind(label, SpecKind::Filter(Box::new(predicate)))
    }

    /// A category listing the whole catalog.
    pub fn all(label: impl Into<String>) -> Self {
        Self::filter(label, |_| true)
    }

    /// A category listing the given key/text pairs in order.
    pub fn pairs<S: Into<String>>(
        label: impl Into<String>,
        pairs: impl IntoIterator<Item = (I::Key, S)>,
    ) -> Self {
        let pairs = pairs
            .into_iter()
            .map(|(key, text)| (key, text.into()))
            .collect();
        Self::with_kind(label, SpecKind::Pairs(pairs))
    }

    fn with_kind(label: impl Into<String>, kind: SpecKind<I>) -> Self {
        Self {
            label: label.into(),
            kind,
            expanded: false,
            hide_when_empty: false,
        }
    }

    /// Sets the initial expansion flag.
    #[must_use]
    pub const fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Omits the branch at construction when it would have no items.
    #[must_use]
    pub const fn hide_when_empty(mut self) -> Self {
        self.hide_when_empty = true;
        self
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<I: CatalogItem> fmt::Debug for BranchSpec<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            SpecKind::Group(children) => format!("Group({})", children.len()),
            SpecKind::Filter(_) => "Filter(..)".to_owned(),
            SpecKind::Pairs(pairs) => format!("Pairs({})", pairs.len()),
        };
        f.debug_struct("BranchSpec")
            .field("label", &self.label)
            .field("kind", &kind)
            .field("expanded", &self.expanded)
            .field("hide_when_empty", &self.hide_when_empty)
            .finish()
    }
}

/// Splits `items` into pages of `chunk_size` entries, one `Pairs` branch per page.
///
/// Each page is labelled with the first four characters of its first and last
/// item names. Concatenating the pages reproduces the input order. A chunk size
/// of zero is treated as one.
pub fn chunked_pairs<I: CatalogItem>(
    items: &[I],
    chunk_size: usize,
    leaf_text: impl Fn(&I) -> String,
) -> Vec<BranchSpec<I>> {
    items
        .chunks(chunk_size.max(1))
        .map(|page| {
            let first = page.first().map_or("", CatalogItem::name);
            let last = page.last().map_or("", CatalogItem::name);
            let label = format!("{} - {}", prefix(first, 4), prefix(last, 4));
            BranchSpec::pairs(
                label,
                page.iter().map(|item| (item.key(), leaf_text(item))),
            )
        })
        .collect()
}

fn prefix(text: &str, chars: usize) -> &str {
    text.char_indices()
        .nth(chars)
        .map_or(text, |(end, _)| &text[..end])
}
