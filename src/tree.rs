use std::cell::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem};
use crate::config::SelectTreeConfig;
use crate::error::TreeError;
use crate::model::TreeModel;
use crate::node::{Branch, BranchSpec, ChildSource, Leaf, NodeId, SpecKind, TreeNode};

/// Horizontal and vertical scroll position as `(first, last)` visible fractions.
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollView {
    pub xview: (f32, f32),
    pub yview: (f32, f32),
}

impl ScrollView {
    /// Everything visible, nothing scrolled.
    pub const FULL: Self = Self {
        xview: (0.0, 1.0),
        yview: (0.0, 1.0),
    };

    /// Returns `true` when the view has never been scrolled.
    pub fn is_default(&self) -> bool {
        *self == Self::FULL
    }

    /// Clamps both pairs into `[0, 1]` with `first <= last`.
    #[must_use]
    pub fn clamped(self) -> Self {
        fn clamp((first, last): (f32, f32)) -> (f32, f32) {
            let first = first.clamp(0.0, 1.0);
            (first, last.clamp(first, 1.0))
        }
        Self {
            xview: clamp(self.xview),
            yview: clamp(self.yview),
        }
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::FULL
    }
}

/// Catalog tree shared by every selection dialog of one catalog kind.
///
/// Top-level categories are built once from [`BranchSpec`]s; predicate
/// branches compute their leaves on first access and keep them for the
/// lifetime of the tree. Expansion flags and the last scroll position live
/// here too, so a reopened dialog looks the way the previous one was left.
pub struct SelectTree<I: CatalogItem> {
    catalog: Catalog<I>,
    branches: Vec<Branch<I>>,
    roots: Vec<NodeId>,
    no_items_label: String,
    scroll: Cell<ScrollView>,
}

impl<I: CatalogItem> SelectTree<I> {
    /// Builds the tree, dropping categories that would be empty.
    ///
    /// Omitted at construction: top-level filter branches without a matching
    /// item, top-level pair lists without pairs, branches marked
    /// [`BranchSpec::hide_when_empty`] without items, and groups left without
    /// children.
    pub fn build(
        catalog: Catalog<I>,
        specs: impl IntoIterator<Item = BranchSpec<I>>,
        config: &SelectTreeConfig,
    ) -> Self {
        let mut tree = Self {
            catalog,
            branches: Vec::new(),
            roots: Vec::new(),
            no_items_label: config.no_items_label.to_string(),
            scroll: Cell::new(ScrollView::FULL),
        };
        let mut omitted = 0usize;
        for spec in specs {
            if let Some(id) = tree.insert_spec(spec, None, &mut omitted) {
                tree.roots.push(id);
            }
        }
        tracing::debug!(
            message = "select_tree.build",
            items = tree.catalog.len(),
            branches = tree.branches.len(),
            roots = tree.roots.len(),
            omitted
        );
        tree
    }

    fn insert_spec(
        &mut self,
        spec: BranchSpec<I>,
        parent: Option<NodeId>,
        omitted: &mut usize,
    ) -> Option<NodeId> {
        let BranchSpec {
            label,
            kind,
            expanded,
            hide_when_empty,
        } = spec;
        let declutter = parent.is_none() || hide_when_empty;
        match kind {
            SpecKind::Filter(predicate) => {
                if declutter && !self.catalog.iter().any(|item| predicate(item)) {
                    *omitted += 1;
                    return None;
                }
                Some(self.push_branch(label, parent, ChildSource::Predicate(predicate), expanded))
            }
            SpecKind::Pairs(pairs) => {
                if declutter && pairs.iter().all(|(_, text)| text.is_empty()) {
                    *omitted += 1;
                    return None;
                }
                Some(self.push_branch(label, parent, ChildSource::Pairs(pairs), expanded))
            }
            SpecKind::Group(children) => {
                let mark = self.branches.len();
                let id = self.push_branch(label, parent, ChildSource::Fixed(Vec::new()), expanded);
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(child_id) = self.insert_spec(child, Some(id), omitted) {
                        ids.push(child_id);
                    }
                }
                if ids.is_empty() {
                    // Every descendant was dropped, so the group is the last node pushed.
                    self.branches.truncate(mark);
                    *omitted += 1;
                    return None;
                }
                self.branches[mark].source = ChildSource::Fixed(ids);
                Some(id)
            }
        }
    }

    fn push_branch(
        &mut self,
        label: String,
        parent: Option<NodeId>,
        source: ChildSource<I>,
        expanded: bool,
    ) -> NodeId {
        let index = u32::try_from(self.branches.len()).unwrap_or(u32::MAX);
        self.branches
            .push(Branch::new(label, parent, source, expanded));
        NodeId::Branch(index)
    }

    /// Returns the catalog snapshot the tree was built from.
    #[inline]
    pub const fn catalog(&self) -> &Catalog<I> {
        &self.catalog
    }

    /// Returns the top-level categories in display order.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the number of branches (top-level and nested).
    #[inline]
    pub const fn branch_count(&self) -> usize {
        self.branches.len()
    }

    fn branch_at(&self, id: NodeId) -> Result<(u32, &Branch<I>), TreeError> {
        match id {
            NodeId::Branch(index) => self
                .branches
                .get(index as usize)
                .map(|branch| (index, branch))
                .ok_or(TreeError::UnknownNode(id)),
            NodeId::Leaf { .. } => {
                if self.leaf(id).is_some() {
                    Err(TreeError::NotABranch(id))
                } else {
                    Err(TreeError::UnknownNode(id))
                }
            }
        }
    }

    /// Returns the branch behind `id`.
    pub fn branch(&self, id: NodeId) -> Result<&Branch<I>, TreeError> {
        self.branch_at(id).map(|(_, branch)| branch)
    }

    /// Returns the children of a branch, computing and caching them on first use.
    ///
    /// Later calls return the same slice. Leaves have no children.
    pub fn get_children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        let (index, branch) = self.branch_at(id)?;
        Ok(self.branch_children(index, branch))
    }

    fn branch_children<'a>(&'a self, index: u32, branch: &'a Branch<I>) -> &'a [NodeId] {
        match &branch.source {
            ChildSource::Fixed(ids) => ids,
            ChildSource::Predicate(_) | ChildSource::Pairs(_) => {
                &branch
                    .contents(index, self.catalog.items(), &self.no_items_label)
                    .ids
            }
        }
    }

    /// Returns a leaf if its owning branch has already been expanded once.
    pub fn leaf(&self, id: NodeId) -> Option<&Leaf<I::Key>> {
        let NodeId::Leaf { branch, index } = id else {
            return None;
        };
        self.branches
            .get(branch as usize)?
            .materialized()?
            .leaves
            .get(index as usize)
    }

    /// Returns either node kind behind `id`.
    pub fn node(&self, id: NodeId) -> Option<TreeNode<'_, I>> {
        match id {
            NodeId::Branch(index) => self.branches.get(index as usize).map(TreeNode::Branch),
            NodeId::Leaf { .. } => self.leaf(id).map(TreeNode::Leaf),
        }
    }

    /// Returns the branch label or leaf text.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match id {
            NodeId::Branch(index) => self.branches.get(index as usize).map(Branch::label),
            NodeId::Leaf { .. } => self.leaf(id).map(Leaf::text),
        }
    }

    /// Returns the key carried by a leaf.
    pub fn key_of(&self, id: NodeId) -> Option<&I::Key> {
        self.leaf(id).and_then(Leaf::key)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match id {
            NodeId::Branch(index) => self.branches.get(index as usize)?.parent(),
            NodeId::Leaf { .. } => self.leaf(id).map(Leaf::parent),
        }
    }

    /// Returns the ancestors of `id`, outermost first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Flips the expansion flag of a branch and returns the new value.
    ///
    /// Expansion is a display concern; the children cache is not touched.
    pub fn toggle(&self, id: NodeId) -> Result<bool, TreeError> {
        let branch = self.branch(id)?;
        let expanded = !branch.is_expanded();
        branch.set_expanded(expanded);
        Ok(expanded)
    }

    pub fn set_expanded(&self, id: NodeId, expanded: bool) -> Result<(), TreeError> {
        self.branch(id)?.set_expanded(expanded);
        Ok(())
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.branch(id).is_ok_and(Branch::is_expanded)
    }

    /// Returns `true` if the node's children are known without evaluating anything.
    pub fn is_materialized(&self, id: NodeId) -> bool {
        self.branch(id).is_ok_and(Branch::is_materialized)
    }

    /// Finds a branch by its label path from the roots, e.g. `["by Size", "Tiny cardsets"]`.
    ///
    /// Only descends through fixed groups, so the lookup never evaluates a predicate.
    pub fn find_branch(&self, path: &[&str]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut current = self.find_in(&self.roots, first)?;
        for label in rest {
            let ChildSource::Fixed(children) = &self.branch(current).ok()?.source else {
                return None;
            };
            current = self.find_in(children, label)?;
        }
        Some(current)
    }

    fn find_in(&self, ids: &[NodeId], label: &str) -> Option<NodeId> {
        ids.iter()
            .copied()
            .find(|&id| self.text(id) == Some(label))
    }

    /// Returns every already-computed leaf that carries `key`.
    ///
    /// Alternate-name listings can hold several leaves for the same key.
    pub fn leaves_with_key(&self, key: &I::Key) -> Vec<NodeId> {
        let mut found = Vec::new();
        for branch in &self.branches {
            let Some(contents) = branch.materialized() else {
                continue;
            };
            for (id, leaf) in contents.ids.iter().zip(&contents.leaves) {
                if leaf.key() == Some(key) {
                    found.push(*id);
                }
            }
        }
        found
    }

    /// Returns the scroll position stored by the last dialog that persisted one.
    #[inline]
    pub fn scroll_view(&self) -> ScrollView {
        self.scroll.get()
    }

    pub(crate) fn store_scroll_view(&self, view: ScrollView) {
        self.scroll.set(view.clamped());
    }
}

impl<I: CatalogItem> TreeModel for SelectTree<I> {
    type Id = NodeId;

    fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_children(id).unwrap_or(&[])
    }

    // Every branch shows at least the placeholder leaf, so no lookup is needed.
    fn has_children(&self, id: NodeId) -> bool {
        id.is_branch() && self.contains(id)
    }

    fn is_expanded(&self, id: NodeId) -> bool {
        self.branch(id).is_ok_and(Branch::is_expanded)
    }

    fn is_selectable(&self, id: NodeId) -> bool {
        self.leaf(id).is_some_and(Leaf::is_selectable)
    }

    fn contains(&self, id: NodeId) -> bool {
        match id {
            NodeId::Branch(index) => (index as usize) < self.branches.len(),
            NodeId::Leaf { .. } => self.leaf(id).is_some(),
        }
    }

    fn size_hint(&self) -> usize {
        self.branches.len() + self.catalog.len()
    }
}

impl<I: CatalogItem> std::fmt::Debug for SelectTree<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectTree")
            .field("items", &self.catalog.len())
            .field("branches", &self.branches.len())
            .field("roots", &self.roots)
            .field("scroll", &self.scroll.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug)]
    struct Game {
        id: u32,
        name: &'static str,
        decks: u8,
    }

    impl CatalogItem for Game {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn catalog() -> Catalog<Game> {
        Catalog::new([
            Game {
                id: 1,
                name: "Klondike",
                decks: 1,
            },
            Game {
                id: 2,
                name: "FreeCell",
                decks: 1,
            },
            Game {
                id: 3,
                name: "Spider",
                decks: 2,
            },
        ])
    }

    fn texts(tree: &SelectTree<Game>, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.text(id).unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn predicate_children_are_computed_once() {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let spec = BranchSpec::group(
            "by Decks",
            [BranchSpec::filter("1 deck games", move |game: &Game| {
                counter.set(counter.get() + 1);
                game.decks == 1
            })],
        );
        let tree = SelectTree::build(catalog(), [spec], &SelectTreeConfig::default());
        let branch = tree.find_branch(&["by Decks", "1 deck games"]).unwrap();
        assert!(!tree.is_materialized(branch));
        assert_eq!(calls.get(), 0);

        let first = tree.get_children(branch).unwrap();
        let second = tree.get_children(branch).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(calls.get(), 3);
        assert_eq!(texts(&tree, first), vec!["Klondike", "FreeCell"]);
    }

    #[test]
    fn empty_nested_branch_shows_placeholder() {
        let spec = BranchSpec::group(
            "by Decks",
            [
                BranchSpec::filter("1 deck games", |game: &Game| game.decks == 1),
                BranchSpec::filter("4 deck games", |game: &Game| game.decks == 4),
            ],
        );
        let config = SelectTreeConfig::default().with_no_items_label("(no games)");
        let tree = SelectTree::build(catalog(), [spec], &config);
        let branch = tree.find_branch(&["by Decks", "4 deck games"]).unwrap();

        let children = tree.get_children(branch).unwrap();

        assert_eq!(children.len(), 1);
        let leaf = tree.leaf(children[0]).unwrap();
        assert_eq!(leaf.text(), "(no games)");
        assert!(leaf.key().is_none());
        assert!(!tree.is_selectable(children[0]));
    }

    #[test]
    fn declutter_drops_empty_roots_and_groups() {
        let specs = [
            BranchSpec::filter("Four deck games", |game: &Game| game.decks == 4),
            BranchSpec::group(
                "Hidden",
                [BranchSpec::filter("none", |_: &Game| false).hide_when_empty()],
            ),
            BranchSpec::pairs("Alternate Names", Vec::<(u32, String)>::new()),
            BranchSpec::all("All Games"),
        ];

        let tree = SelectTree::build(catalog(), specs, &SelectTreeConfig::default());

        assert_eq!(texts(&tree, tree.roots()), vec!["All Games"]);
        assert_eq!(tree.branch_count(), 1);
        assert_eq!(tree.roots(), &[NodeId::Branch(0)]);
    }

    #[test]
    fn root_pairs_with_only_blank_names_are_dropped() {
        let specs = [
            BranchSpec::all("All Games"),
            BranchSpec::pairs("Alternate Names", [(1, "")]),
        ];

        let tree = SelectTree::build(catalog(), specs, &SelectTreeConfig::default());

        assert_eq!(texts(&tree, tree.roots()), vec!["All Games"]);
        assert_eq!(tree.branch_count(), 1);
    }

    #[test]
    fn pairs_keep_their_order() {
        let spec = BranchSpec::pairs(
            "Alternate Names",
            [(3, "Arachnid"), (1, "Patience"), (2, "Baker's Game"), (9, "")],
        );
        let tree = SelectTree::build(catalog(), [spec], &SelectTreeConfig::default());
        let root = tree.roots()[0];

        let children = tree.get_children(root).unwrap();

        assert_eq!(texts(&tree, children), vec!["Arachnid", "Patience", "Baker's Game"]);
        let keys: Vec<_> = children.iter().filter_map(|&id| tree.key_of(id)).collect();
        assert_eq!(keys, vec![&3, &1, &2]);
    }

    #[test]
    fn toggle_does_not_materialize() {
        let tree = SelectTree::build(
            catalog(),
            [BranchSpec::all("All Games")],
            &SelectTreeConfig::default(),
        );
        let root = tree.roots()[0];

        assert_eq!(tree.toggle(root), Ok(true));
        assert!(tree.is_expanded(root));
        assert!(!tree.is_materialized(root));
        assert_eq!(tree.toggle(root), Ok(false));
    }

    #[test]
    fn leaves_reject_branch_operations() {
        let tree = SelectTree::build(
            catalog(),
            [BranchSpec::all("All Games")],
            &SelectTreeConfig::default(),
        );
        let root = tree.roots()[0];
        let leaf = tree.get_children(root).unwrap()[0];

        assert_eq!(tree.get_children(leaf), Err(TreeError::NotABranch(leaf)));
        assert_eq!(tree.toggle(leaf), Err(TreeError::NotABranch(leaf)));
        assert_eq!(
            tree.get_children(NodeId::Branch(42)),
            Err(TreeError::UnknownNode(NodeId::Branch(42)))
        );
        assert_eq!(tree.parent(leaf), Some(root));
        assert_eq!(tree.ancestors(leaf), vec![root]);
    }

    #[test]
    fn leaves_with_key_only_sees_computed_branches() {
        let specs = [
            BranchSpec::all("All Games"),
            BranchSpec::pairs("Alternate Names", [(3, "Arachnid")]),
        ];
        let tree = SelectTree::build(catalog(), specs, &SelectTreeConfig::default());
        assert!(tree.leaves_with_key(&3).is_empty());

        for &root in tree.roots() {
            tree.get_children(root).unwrap();
        }

        assert_eq!(tree.leaves_with_key(&3).len(), 2);
    }

    #[test]
    fn stored_scroll_view_is_clamped() {
        let tree = SelectTree::build(
            catalog(),
            [BranchSpec::all("All Games")],
            &SelectTreeConfig::default(),
        );
        assert!(tree.scroll_view().is_default());

        tree.store_scroll_view(ScrollView {
            xview: (0.0, 1.0),
            yview: (1.5, -0.5),
        });

        assert_eq!(tree.scroll_view().yview, (1.0, 1.0));
    }
}
