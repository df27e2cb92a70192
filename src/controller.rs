use std::fmt;
use std::rc::Rc;

use ratatui::style::Style;

#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

use crate::action::{TreeAction, TreeEvent};
use crate::catalog::CatalogItem;
use crate::context::TreeRowContext;
use crate::error::TreeError;
use crate::node::NodeId;
use crate::preview::PreviewRenderer;
use crate::render::TreeRenderer;
use crate::state::TreeViewState;
use crate::tree::{ScrollView, SelectTree};

/// Where a selection dialog is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    /// Nothing picked since the dialog opened.
    #[default]
    Idle,
    /// At least one item was picked.
    ItemSelected,
    /// The dialog was closed; no further changes are accepted.
    Confirmed,
}

/// What a user interaction did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectEvent<K> {
    Ignored,
    /// The cursor moved without changing the selection.
    Moved,
    Selected(K),
    Toggled { branch: NodeId, expanded: bool },
    /// The dialog was closed with this result.
    Confirmed(Option<K>),
}

/// Per-dialog selection and expansion logic on top of a shared [`SelectTree`].
///
/// Backends forward clicks and key actions here and draw through
/// [`paint`](Self::paint) or the [`TreeListView`](crate::TreeListView) widget.
pub struct SelectionController<I: CatalogItem> {
    tree: Rc<SelectTree<I>>,
    view: TreeViewState<NodeId>,
    initial_key: Option<I::Key>,
    selection_key: Option<I::Key>,
    n_selections: usize,
    n_expansions: usize,
    phase: SelectionPhase,
    preview: Option<Box<dyn PreviewRenderer<I::Key>>>,
    redraw: bool,
}

impl<I: CatalogItem> SelectionController<I> {
    /// Opens a dialog on `tree` with `initial_key` as the current selection.
    ///
    /// A scroll position left by an earlier dialog is restored before the first paint.
    pub fn new(tree: Rc<SelectTree<I>>, initial_key: Option<I::Key>) -> Self {
        let mut view = TreeViewState::with_capacity(tree.roots().len());
        let scroll = tree.scroll_view();
        if !scroll.is_default() {
            view.scroll_to_fraction(scroll.yview.0);
        }
        Self {
            tree,
            view,
            selection_key: initial_key.clone(),
            initial_key,
            n_selections: 0,
            n_expansions: 0,
            phase: SelectionPhase::Idle,
            preview: None,
            redraw: true,
        }
    }

    #[must_use]
    pub fn with_preview(mut self, preview: impl PreviewRenderer<I::Key> + 'static) -> Self {
        self.set_preview(preview);
        self
    }

    pub fn set_preview(&mut self, preview: impl PreviewRenderer<I::Key> + 'static) {
        self.preview = Some(Box::new(preview));
    }

    /// Draws the current selection on the preview, e.g. right after opening.
    pub fn refresh_preview(&mut self) {
        if let (Some(preview), Some(key)) = (self.preview.as_mut(), self.selection_key.as_ref()) {
            preview.update_preview(key);
        }
    }

    #[inline]
    pub fn tree(&self) -> &Rc<SelectTree<I>> {
        &self.tree
    }

    #[inline]
    pub const fn view(&self) -> &TreeViewState<NodeId> {
        &self.view
    }

    #[inline]
    pub const fn view_mut(&mut self) -> &mut TreeViewState<NodeId> {
        &mut self.view
    }

    #[inline]
    pub const fn selection_key(&self) -> Option<&I::Key> {
        self.selection_key.as_ref()
    }

    #[inline]
    pub const fn initial_key(&self) -> Option<&I::Key> {
        self.initial_key.as_ref()
    }

    #[inline]
    pub const fn n_selections(&self) -> usize {
        self.n_selections
    }

    #[inline]
    pub const fn n_expansions(&self) -> usize {
        self.n_expansions
    }

    #[inline]
    pub const fn phase(&self) -> SelectionPhase {
        self.phase
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.phase == SelectionPhase::Confirmed
    }

    /// Returns and clears the pending redraw request.
    pub const fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    /// Makes `key` the selection and updates the preview.
    ///
    /// Returns `false` without side effects for `None`, for the key already
    /// selected, and after the dialog was confirmed.
    pub fn select(&mut self, key: Option<I::Key>) -> bool {
        if self.is_confirmed() {
            return false;
        }
        let Some(key) = key else {
            return false;
        };
        if self.selection_key.as_ref() == Some(&key) {
            return false;
        }
        self.n_selections += 1;
        self.phase = SelectionPhase::ItemSelected;
        self.redraw = true;
        tracing::debug!(
            message = "select_tree.select",
            key = ?key,
            n_selections = self.n_selections
        );
        if let Some(preview) = self.preview.as_mut() {
            preview.update_preview(&key);
        }
        self.selection_key = Some(key);
        true
    }

    /// Opens or closes a branch and returns its new expansion flag.
    ///
    /// After confirmation the flag is returned unchanged.
    pub fn toggle_branch(&mut self, id: NodeId) -> Result<bool, TreeError> {
        if self.is_confirmed() {
            return Ok(self.tree.branch(id)?.is_expanded());
        }
        let expanded = self.tree.toggle(id)?;
        self.n_expansions += 1;
        self.view.invalidate();
        self.redraw = true;
        tracing::debug!(
            message = "select_tree.toggle",
            branch = ?id,
            expanded,
            n_expansions = self.n_expansions
        );
        Ok(expanded)
    }

    /// Single click: branches open or close, leaves become the selection.
    pub fn click(&mut self, id: NodeId) -> SelectEvent<I::Key> {
        if self.is_confirmed() {
            return SelectEvent::Ignored;
        }
        self.view.select_by_id(&*self.tree, id);
        match id {
            NodeId::Branch(_) => match self.toggle_branch(id) {
                Ok(expanded) => SelectEvent::Toggled {
                    branch: id,
                    expanded,
                },
                Err(_) => SelectEvent::Ignored,
            },
            NodeId::Leaf { .. } => self.select_leaf(id),
        }
    }

    /// Double click: a leaf is selected and the dialog confirmed.
    pub fn double_click(&mut self, id: NodeId) -> SelectEvent<I::Key> {
        if self.is_confirmed() {
            return SelectEvent::Ignored;
        }
        if id.is_branch() {
            return self.click(id);
        }
        let Some(key) = self.tree.key_of(id).cloned() else {
            return SelectEvent::Ignored;
        };
        self.select(Some(key));
        SelectEvent::Confirmed(self.finalize())
    }

    fn select_leaf(&mut self, id: NodeId) -> SelectEvent<I::Key> {
        let Some(key) = self.tree.key_of(id).cloned() else {
            return SelectEvent::Ignored;
        };
        if self.select(Some(key.clone())) {
            SelectEvent::Selected(key)
        } else {
            SelectEvent::Ignored
        }
    }

    /// Closes the dialog keeping the current selection.
    ///
    /// The scroll position is stored in the shared tree if anything was
    /// expanded or collapsed. Later calls return the same result.
    pub fn finalize(&mut self) -> Option<I::Key> {
        self.confirm();
        self.selection_key.clone()
    }

    /// Closes the dialog discarding the selection; returns the initial key.
    pub fn cancel(&mut self) -> Option<I::Key> {
        if !self.is_confirmed() {
            self.selection_key.clone_from(&self.initial_key);
            self.confirm();
        }
        self.selection_key.clone()
    }

    /// The terminal view has no horizontal scroll, so the stored `xview` is kept as is.
    fn confirm(&mut self) {
        if self.is_confirmed() {
            return;
        }
        self.phase = SelectionPhase::Confirmed;
        let persisted = self.n_expansions > 0;
        if persisted {
            let yview = self.view.yview();
            self.tree.store_scroll_view(ScrollView {
                yview,
                ..self.tree.scroll_view()
            });
        }
        tracing::debug!(
            message = "select_tree.finalize",
            key = ?self.selection_key,
            n_selections = self.n_selections,
            n_expansions = self.n_expansions,
            persisted
        );
    }

    /// Applies a keyboard action.
    ///
    /// Moving the cursor onto an item selects it. `ToggleNode` and `SelectChild`
    /// on a collapsed branch toggle it; `Activate` behaves like a double click.
    pub fn handle_action(&mut self, action: TreeAction) -> SelectEvent<I::Key> {
        if self.is_confirmed() {
            return SelectEvent::Ignored;
        }
        match self.view.handle_action(&*self.tree, action) {
            TreeEvent::Handled => {
                self.redraw = true;
                self.browse_select()
            }
            TreeEvent::Unhandled => SelectEvent::Ignored,
            TreeEvent::Action(TreeAction::ToggleNode | TreeAction::SelectChild) => {
                match self.view.selected_id() {
                    Some(id) => self.click(id),
                    None => SelectEvent::Ignored,
                }
            }
            TreeEvent::Action(TreeAction::Activate) => match self.view.selected_id() {
                Some(id) => self.double_click(id),
                None => SelectEvent::Ignored,
            },
            TreeEvent::Action(_) => SelectEvent::Ignored,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key through the view's key bindings and applies it.
    pub fn handle_key(&mut self, key: KeyEvent) -> SelectEvent<I::Key> {
        match self.view.keymap().resolve(key) {
            Some(action) => self.handle_action(action),
            None => SelectEvent::Ignored,
        }
    }

    fn browse_select(&mut self) -> SelectEvent<I::Key> {
        match self.view.selected_id() {
            Some(id) if id.is_leaf() => match self.select_leaf(id) {
                SelectEvent::Ignored => SelectEvent::Moved,
                event => event,
            },
            _ => SelectEvent::Moved,
        }
    }

    /// Returns every computed leaf that carries the selected key.
    pub fn selected_leaves(&self) -> Vec<NodeId> {
        self.selection_key
            .as_ref()
            .map(|key| self.tree.leaves_with_key(key))
            .unwrap_or_default()
    }

    /// Opens the ancestors of the first computed leaf with the selected key and
    /// puts the cursor on it. Returns `false` if no such leaf exists yet.
    pub fn reveal_selection(&mut self) -> bool {
        let Some(leaf) = self.selected_leaves().first().copied() else {
            return false;
        };
        for ancestor in self.tree.ancestors(leaf) {
            if !self.tree.is_expanded(ancestor) && self.tree.set_expanded(ancestor, true).is_err() {
                return false;
            }
        }
        self.view.invalidate();
        self.redraw = true;
        self.view.select_by_id(&*self.tree, leaf)
    }

    /// Walks the visible rows top to bottom and draws them on `renderer`.
    pub fn paint<R: TreeRenderer<I::Key>>(&mut self, renderer: &mut R) {
        self.view.ensure_visible_nodes(&*self.tree);
        let highlighted = self.selected_leaves();
        let draw_lines = self.view.draw_lines();
        for node in self.view.visible_nodes() {
            let id = node.id();
            let mut row = TreeRowContext {
                level: node.level(),
                is_tail_stack: node.is_tail_stack(),
                is_expanded: self.tree.is_expanded(id),
                has_children: node.has_children(),
                is_selected: false,
                is_selectable: true,
                draw_lines,
                line_style: Style::default(),
            };
            match id {
                NodeId::Branch(_) => {
                    renderer.draw_branch(&row, self.tree.text(id).unwrap_or_default());
                }
                NodeId::Leaf { .. } => {
                    let Some(leaf) = self.tree.leaf(id) else {
                        continue;
                    };
                    row.is_selected = highlighted.contains(&id);
                    row.is_selectable = leaf.is_selectable();
                    renderer.draw_leaf(&row, leaf.text(), leaf.key());
                }
            }
        }
    }
}

impl<I: CatalogItem> fmt::Debug for SelectionController<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("initial_key", &self.initial_key)
            .field("selection_key", &self.selection_key)
            .field("n_selections", &self.n_selections)
            .field("n_expansions", &self.n_expansions)
            .field("phase", &self.phase)
            .field("has_preview", &self.preview.is_some())
            .finish_non_exhaustive()
    }
}
