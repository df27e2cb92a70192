use std::hash::Hash;

use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

use crate::action::{TreeAction, TreeEvent};
use crate::model::{TreeFilter, TreeFilterConfig, TreeModel};
use crate::style::TreeScrollPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::TreeKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// A visible node row with metadata used for rendering and navigation.
#[derive(Clone, Debug)]
pub struct VisibleNode<Id> {
    pub(crate) id: Id,
    pub(crate) level: u16,
    pub(crate) parent: Option<Id>,
    pub(crate) has_children: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl<Id: Copy> VisibleNode<Id> {
    #[inline]
    pub const fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub const fn level(&self) -> u16 {
        self.level
    }

    #[inline]
    pub const fn parent(&self) -> Option<Id> {
        self.parent
    }

    #[inline]
    pub const fn has_children(&self) -> bool {
        self.has_children
    }

    #[inline]
    pub fn is_tail_stack(&self) -> &[bool] {
        &self.is_tail_stack
    }
}

/// View state: cursor, scroll offset and the cached list of visible rows.
///
/// Expansion flags are read from the model, so this state only has to be
/// invalidated when the model changes them.
pub struct TreeViewState<Id> {
    list_state: TableState,
    // Cached visible rows to avoid recomputing DFS every render.
    visible_nodes: Vec<VisibleNode<Id>>,
    // Fast lookup from node id to visible row index.
    visible_index: FxHashMap<Id, usize>,
    // Marks whether visible_nodes must be rebuilt.
    dirty: bool,
    draw_lines: bool,
    viewport_height: usize,
    // Vertical fraction to scroll to once the rows are known.
    pending_yview: Option<f32>,
    #[cfg(feature = "keymap")]
    keymap: TreeKeyBindings,
}

/// Snapshot of the view (cursor, offset, guides).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeViewSnapshot {
    /// Cursor row index in the visible list.
    pub selected: Option<usize>,
    /// Scroll offset within the visible list.
    pub offset: usize,
    /// Whether guide lines were enabled.
    pub draw_lines: bool,
}

impl<Id: Copy + Eq + Hash> Default for TreeViewState<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash> TreeViewState<Id> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list_state: TableState::default(),
            visible_nodes: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            draw_lines: true,
            viewport_height: 0,
            pending_yview: None,
            #[cfg(feature = "keymap")]
            keymap: TreeKeyBindings::new(),
        }
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    #[cfg(feature = "keymap")]
    pub(crate) const fn keymap(&self) -> &TreeKeyBindings {
        &self.keymap
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    /// Returns the rows computed by the last rebuild.
    pub fn visible_nodes(&self) -> &[VisibleNode<Id>] {
        &self.visible_nodes
    }

    /// Returns the row index of a visible node.
    pub fn row_of(&self, id: Id) -> Option<usize> {
        self.visible_index.get(&id).copied()
    }

    pub fn snapshot(&self) -> TreeViewSnapshot {
        TreeViewSnapshot {
            selected: self.list_state.selected(),
            offset: self.list_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    pub fn restore(&mut self, snapshot: &TreeViewSnapshot) {
        self.draw_lines = snapshot.draw_lines;
        *self.list_state.offset_mut() = snapshot.offset;
        self.list_state.select(snapshot.selected);
        self.dirty = true;
    }

    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-row cache as dirty.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the height last passed to [`Self::ensure_selection_visible`].
    #[inline]
    pub const fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Records the number of rows the surface can show.
    pub const fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    /// Returns the vertical `(first, last)` visible fractions.
    #[allow(clippy::cast_precision_loss)]
    pub fn yview(&self) -> (f32, f32) {
        let total = self.visible_nodes.len();
        if total == 0 {
            return (0.0, 1.0);
        }
        let offset = self.list_state.offset().min(total);
        let bottom = (offset + self.viewport_height.max(1)).min(total);
        (offset as f32 / total as f32, bottom as f32 / total as f32)
    }

    /// Scrolls so the row at fraction `first` of the list is at the top.
    ///
    /// Applied on the next rebuild if the rows are not known yet.
    pub fn scroll_to_fraction(&mut self, first: f32) {
        self.pending_yview = Some(first.clamp(0.0, 1.0));
        if !self.dirty {
            self.apply_pending_scroll();
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn apply_pending_scroll(&mut self) {
        let Some(first) = self.pending_yview.take() else {
            return;
        };
        let total = self.visible_nodes.len();
        let offset = (first * total as f32).round() as usize;
        *self.list_state.offset_mut() = offset.min(total.saturating_sub(1));
    }

    pub const fn select_first(&mut self) {
        self.list_state.select_first();
    }

    pub const fn select_last(&mut self) {
        self.list_state.select_last();
        self.clamp_selection();
    }

    /// Puts the cursor on a row index.
    pub fn select_row(&mut self, row: Option<usize>) {
        self.list_state.select(row);
        self.clamp_selection();
    }

    pub fn scroll_down_by(&mut self, amount: u16) {
        self.list_state.scroll_down_by(amount);
    }

    pub fn scroll_up_by(&mut self, amount: u16) {
        self.list_state.scroll_up_by(amount);
    }

    /// Moves the cursor to the previous visible row.
    pub fn select_prev(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    /// Moves the cursor to the next visible row.
    pub fn select_next(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let new_selected = self.list_state.selected().map_or(0, |selected| {
            (selected + 1).min(self.visible_nodes.len().saturating_sub(1))
        });
        self.list_state.select(Some(new_selected));
    }

    fn page(&mut self, down: bool) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let step = self.viewport_height.max(1);
        let selected = self.list_state.selected().unwrap_or(0);
        let target = if down {
            (selected + step).min(self.visible_nodes.len() - 1)
        } else {
            selected.saturating_sub(step)
        };
        self.list_state.select(Some(target));
    }

    /// Adjusts scroll offset so the cursor is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        self.viewport_height = viewport_height;
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    /// Adjusts cursor visibility according to the provided scroll policy.
    pub fn ensure_selection_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) {
        match policy {
            TreeScrollPolicy::KeepInView => self.ensure_selection_visible(viewport_height),
            TreeScrollPolicy::CenterOnSelect => {
                self.ensure_selection_visible_centered(viewport_height);
            }
        }
    }

    fn ensure_selection_visible_centered(&mut self, viewport_height: usize) {
        self.viewport_height = viewport_height;
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_nodes.len();
        if total <= viewport_height {
            *self.list_state.offset_mut() = 0;
            return;
        }

        let half = viewport_height / 2;
        let max_offset = total.saturating_sub(viewport_height);
        *self.list_state.offset_mut() = selected.saturating_sub(half).min(max_offset);
    }

    /// Returns the id of the node under the cursor, if any.
    pub fn selected_id(&self) -> Option<Id> {
        self.selected_node().map(|node| node.id)
    }

    /// Returns the parent id of the node under the cursor, if any.
    pub fn selected_parent_id(&self) -> Option<Id> {
        self.selected_node().and_then(|node| node.parent)
    }

    /// Returns the depth level of the node under the cursor.
    pub fn selected_level(&self) -> Option<u16> {
        self.selected_node().map(|node| node.level)
    }

    fn selected_node(&self) -> Option<&VisibleNode<Id>> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible_nodes.get(idx))
    }

    /// Returns the number of visible rows in the current view.
    pub const fn visible_len(&self) -> usize {
        self.visible_nodes.len()
    }

    /// Moves the cursor to the node if it is visible.
    pub fn select_by_id<T: TreeModel<Id = Id>>(&mut self, model: &T, id: Id) -> bool {
        self.ensure_visible_nodes(model);
        if let Some(idx) = self.row_of(id) {
            self.list_state.select(Some(idx));
            true
        } else {
            false
        }
    }

    /// Ensures the visible row list is up to date (if marked dirty).
    pub fn ensure_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        if !self.dirty {
            return;
        }
        self.update_visible_nodes(model);
    }

    /// Ensures the visible row list is up to date with an active filter.
    ///
    /// Deciding whether a subtree matches has to look at its children, so
    /// lazily computed models will compute every branch on the first pass.
    pub fn ensure_visible_nodes_filtered<T, F>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        if !self.dirty {
            return;
        }
        if !config.enabled {
            self.update_visible_nodes(model);
            return;
        }

        self.visible_nodes.clear();
        self.visible_index.clear();
        self.reserve_visible_capacity(model);
        let memo_capacity = model.size_hint().max(1);
        let mut memo: FxHashMap<Id, bool> =
            FxHashMap::with_capacity_and_hasher(memo_capacity, FxBuildHasher);
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        for root in model.roots().iter().copied() {
            self.build_visible_nodes_filtered(
                model,
                root,
                0,
                None,
                &mut is_tail_stack,
                filter,
                config,
                &mut memo,
            );
        }
        self.finish_rebuild();
    }

    /// Handles a navigation action and returns the resulting event.
    ///
    /// Actions that change expansion are returned as [`TreeEvent::Action`]
    /// for the owner of the model to apply.
    pub fn handle_action<T: TreeModel<Id = Id>, C>(
        &mut self,
        model: &T,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        self.ensure_visible_nodes(model);
        self.handle_action_inner(model, action)
    }

    /// Handles an action with filtering enabled and returns the resulting event.
    pub fn handle_action_filtered<T, F, C>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
        action: TreeAction<C>,
    ) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        self.ensure_visible_nodes_filtered(model, filter, config);
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key<T: TreeModel<Id = Id>>(&mut self, model: &T, key: KeyEvent) -> TreeEvent<()> {
        self.ensure_visible_nodes(model);
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<T, C, F>(&mut self, model: &T, key: KeyEvent, custom: F) -> TreeEvent<C>
    where
        T: TreeModel<Id = Id>,
        F: Fn(KeyEvent) -> Option<C>,
    {
        self.ensure_visible_nodes(model);
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action_inner(model, action)
    }

    fn handle_action_inner<T: TreeModel<Id = Id>, C>(
        &mut self,
        model: &T,
        action: TreeAction<C>,
    ) -> TreeEvent<C> {
        if matches!(&action, TreeAction::Custom(_)) {
            return TreeEvent::Action(action);
        }

        if self.visible_nodes.is_empty() {
            return TreeEvent::Unhandled;
        }

        match action {
            TreeAction::SelectPrev => {
                self.select_prev();
                TreeEvent::Handled
            }
            TreeAction::SelectNext => {
                self.select_next();
                TreeEvent::Handled
            }
            TreeAction::SelectParent => {
                if self.select_parent() {
                    TreeEvent::Handled
                } else {
                    TreeEvent::Unhandled
                }
            }
            TreeAction::SelectChild => {
                let Some(node) = self.selected_node() else {
                    return TreeEvent::Unhandled;
                };
                if !node.has_children {
                    return TreeEvent::Unhandled;
                }
                if model.is_expanded(node.id) {
                    // The first child is the next row of an open branch.
                    self.select_next();
                    TreeEvent::Handled
                } else {
                    TreeEvent::Action(action)
                }
            }
            TreeAction::SelectFirst => {
                self.select_first();
                TreeEvent::Handled
            }
            TreeAction::SelectLast => {
                self.select_last();
                TreeEvent::Handled
            }
            TreeAction::PageUp => {
                self.page(false);
                TreeEvent::Handled
            }
            TreeAction::PageDown => {
                self.page(true);
                TreeEvent::Handled
            }
            TreeAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                TreeEvent::Handled
            }
            TreeAction::ToggleNode => match self.selected_node() {
                Some(node) if node.has_children => TreeEvent::Action(action),
                _ => TreeEvent::Unhandled,
            },
            TreeAction::Activate => {
                if self.selected_node().is_some() {
                    TreeEvent::Action(action)
                } else {
                    TreeEvent::Unhandled
                }
            }
            TreeAction::Custom(_) => TreeEvent::Action(action),
        }
    }

    fn reserve_visible_capacity<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        let hint = model.size_hint();
        if hint == 0 {
            return;
        }
        let node_extra = hint.saturating_sub(self.visible_nodes.capacity());
        if node_extra > 0 {
            self.visible_nodes.reserve(node_extra);
        }
        let index_extra = hint.saturating_sub(self.visible_index.capacity());
        if index_extra > 0 {
            self.visible_index.reserve(index_extra);
        }
    }

    fn update_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.visible_nodes.clear();
        self.visible_index.clear();
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        for root in model.roots().iter().copied() {
            self.build_visible_nodes(model, root, 0, None, &mut is_tail_stack);
        }
        self.finish_rebuild();
    }

    fn finish_rebuild(&mut self) {
        self.dirty = false;
        self.apply_pending_scroll();
        self.clamp_selection();
    }

    fn push_visible(&mut self, node: VisibleNode<Id>) {
        let idx = self.visible_nodes.len();
        self.visible_index.insert(node.id, idx);
        self.visible_nodes.push(node);
    }

    fn build_visible_nodes<T: TreeModel<Id = Id>>(
        &mut self,
        model: &T,
        node_id: Id,
        level: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
    ) {
        let has_children = model.has_children(node_id);
        self.push_visible(VisibleNode {
            id: node_id,
            level,
            parent,
            has_children,
            is_tail_stack: is_tail_stack.clone(),
        });

        if !has_children || !model.is_expanded(node_id) {
            return;
        }

        // Only open nodes are asked for their children.
        let children = model.children(node_id);
        let last_idx = children.len().saturating_sub(1);
        for (i, child) in children.iter().copied().enumerate() {
            is_tail_stack.push(i == last_idx);
            self.build_visible_nodes(model, child, level + 1, Some(node_id), is_tail_stack);
            is_tail_stack.pop();
        }
    }

    fn subtree_has_match<T, F>(
        &self,
        model: &T,
        node_id: Id,
        filter: &F,
        memo: &mut FxHashMap<Id, bool>,
    ) -> bool
    where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        if let Some(&cached) = memo.get(&node_id) {
            return cached;
        }

        let mut matched = filter.is_match(model, node_id);
        if !matched {
            for child in model.children(node_id).iter().copied() {
                if self.subtree_has_match(model, child, filter, memo) {
                    matched = true;
                    break;
                }
            }
        }

        memo.insert(node_id, matched);
        matched
    }

    #[allow(clippy::too_many_arguments)]
    fn build_visible_nodes_filtered<T, F>(
        &mut self,
        model: &T,
        node_id: Id,
        level: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
        filter: &F,
        config: TreeFilterConfig,
        memo: &mut FxHashMap<Id, bool>,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T>,
    {
        let self_match = filter.is_match(model, node_id);
        let has_children = model.has_children(node_id);

        let mut visible_children: SmallVec<[Id; 8]> = SmallVec::new();
        if has_children {
            for child in model.children(node_id).iter().copied() {
                if self.subtree_has_match(model, child, filter, memo) {
                    visible_children.push(child);
                }
            }
        }

        if !self_match && visible_children.is_empty() {
            return;
        }

        self.push_visible(VisibleNode {
            id: node_id,
            level,
            parent,
            has_children,
            is_tail_stack: is_tail_stack.clone(),
        });

        let expand_children = config.auto_expand || model.is_expanded(node_id);
        if !expand_children {
            return;
        }
        let last_idx = visible_children.len().saturating_sub(1);
        for (idx, child) in visible_children.iter().copied().enumerate() {
            is_tail_stack.push(idx == last_idx);
            self.build_visible_nodes_filtered(
                model,
                child,
                level + 1,
                Some(node_id),
                is_tail_stack,
                filter,
                config,
                memo,
            );
            is_tail_stack.pop();
        }
    }

    const fn clamp_selection(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }

        if let Some(selected) = self.list_state.selected()
            && selected >= self.visible_nodes.len()
        {
            self.list_state
                .select(Some(self.visible_nodes.len().saturating_sub(1)));
        }
    }

    fn select_parent(&mut self) -> bool {
        let Some(parent_id) = self.selected_parent_id() else {
            return false;
        };
        if let Some(parent_idx) = self.row_of(parent_id) {
            self.list_state.select(Some(parent_idx));
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use rustc_hash::FxHashSet;

    struct TestTree {
        roots: Vec<usize>,
        children: Vec<Vec<usize>>,
        expanded: RefCell<FxHashSet<usize>>,
    }

    impl TestTree {
        fn new() -> Self {
            Self {
                roots: vec![0, 5],
                children: vec![
                    vec![1, 2], // 0
                    vec![3, 4], // 1
                    vec![],     // 2
                    vec![],     // 3
                    vec![],     // 4
                    vec![6],    // 5
                    vec![],     // 6
                ],
                expanded: RefCell::new(FxHashSet::default()),
            }
        }

        fn expand(&self, id: usize) {
            self.expanded.borrow_mut().insert(id);
        }
    }

    impl TreeModel for TestTree {
        type Id = usize;

        fn roots(&self) -> &[usize] {
            &self.roots
        }

        fn children(&self, id: usize) -> &[usize] {
            &self.children[id]
        }

        fn is_expanded(&self, id: usize) -> bool {
            self.expanded.borrow().contains(&id)
        }

        fn contains(&self, id: usize) -> bool {
            id < self.children.len()
        }
    }

    fn ids(state: &TreeViewState<usize>) -> Vec<usize> {
        state.visible_nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn builds_visible_nodes_from_model_expansion() {
        let tree = TestTree::new();
        let mut state = TreeViewState::<usize>::new();

        tree.expand(0);
        tree.expand(1);
        state.ensure_visible_nodes(&tree);

        let levels: Vec<_> = state.visible_nodes.iter().map(|n| n.level).collect();
        assert_eq!(ids(&state), vec![0, 1, 3, 4, 2, 5]);
        assert_eq!(levels, vec![0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn filtered_view_keeps_matching_path_across_roots() {
        let tree = TestTree::new();
        let mut state = TreeViewState::<usize>::new();
        let filter = |_: &TestTree, id: usize| id == 4 || id == 6;

        state.ensure_visible_nodes_filtered(&tree, &filter, TreeFilterConfig::enabled());

        assert_eq!(ids(&state), vec![0, 1, 4, 5, 6]);
    }

    #[test]
    fn filtered_view_without_matches_clears_selection() {
        let tree = TestTree::new();
        let mut state = TreeViewState::<usize>::new();
        let filter = |_: &TestTree, _: usize| false;

        state.list_state.select(Some(0));
        state.ensure_visible_nodes_filtered(&tree, &filter, TreeFilterConfig::enabled());

        assert!(state.visible_nodes.is_empty());
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn select_prev_clears_selection_when_empty() {
        let mut state = TreeViewState::<usize>::new();
        state.list_state.select(Some(0));

        state.select_prev();

        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn select_child_defers_expansion_to_owner() {
        let tree = TestTree::new();
        let mut state = TreeViewState::<usize>::new();
        state.ensure_visible_nodes(&tree);
        state.select_first();

        let event = state.handle_action(&tree, TreeAction::<()>::SelectChild);
        assert_eq!(event, TreeEvent::Action(TreeAction::SelectChild));

        tree.expand(0);
        state.invalidate();
        let event = state.handle_action(&tree, TreeAction::<()>::SelectChild);
        assert_eq!(event, TreeEvent::Handled);
        assert_eq!(state.selected_id(), Some(1));

        let event = state.handle_action(&tree, TreeAction::<()>::SelectParent);
        assert_eq!(event, TreeEvent::Handled);
        assert_eq!(state.selected_id(), Some(0));
    }

    #[test]
    fn pending_scroll_applies_after_rebuild() {
        let tree = TestTree::new();
        tree.expand(0);
        tree.expand(1);
        tree.expand(5);
        let mut state = TreeViewState::<usize>::new();
        state.set_viewport_height(2);

        state.scroll_to_fraction(0.5);
        assert_eq!(state.list_state.offset(), 0);
        state.ensure_visible_nodes(&tree);

        assert_eq!(state.visible_len(), 7);
        assert_eq!(state.list_state.offset(), 4);
        let (first, last) = state.yview();
        assert!((first - 4.0 / 7.0).abs() < f32::EPSILON);
        assert!((last - 6.0 / 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn page_moves_by_viewport() {
        let tree = TestTree::new();
        tree.expand(0);
        tree.expand(1);
        let mut state = TreeViewState::<usize>::new();
        state.ensure_visible_nodes(&tree);
        state.set_viewport_height(4);
        state.select_first();

        assert_eq!(state.handle_action(&tree, TreeAction::<()>::PageDown), TreeEvent::Handled);
        assert_eq!(state.selected_id(), Some(2));
        assert_eq!(state.handle_action(&tree, TreeAction::<()>::PageDown), TreeEvent::Handled);
        assert_eq!(state.selected_id(), Some(5));
        assert_eq!(state.handle_action(&tree, TreeAction::<()>::PageUp), TreeEvent::Handled);
        assert_eq!(state.selected_id(), Some(1));
    }
}
