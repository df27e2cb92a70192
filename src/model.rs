use std::hash::Hash;

/// Tree contract consumed by the view state and the widget.
///
/// A proper forest is expected (not a DAG):
/// - no cycles (DFS traversal is used directly);
/// - each node has at most one parent;
/// - identifiers are stable between frames (for selection and expansion).
///
/// Expansion is owned by the model, so several views of the same shared tree
/// agree on which categories are open.
pub trait TreeModel {
    /// Node identifier type.
    type Id: Copy + Eq + Hash;

    /// Returns the top-level nodes in display order.
    fn roots(&self) -> &[Self::Id];
    /// Returns the node's children in a deterministic order.
    ///
    /// Models with lazily computed children may do that work here; the view
    /// only calls this for expanded nodes unless a filter is active.
    fn children(&self, id: Self::Id) -> &[Self::Id];
    /// Returns `true` if the node can be expanded.
    fn has_children(&self, id: Self::Id) -> bool {
        !self.children(id).is_empty()
    }
    /// Returns `true` if the node is currently expanded.
    fn is_expanded(&self, id: Self::Id) -> bool;
    /// Returns `false` for rows that must never become the selection.
    fn is_selectable(&self, _id: Self::Id) -> bool {
        true
    }
    /// Returns `true` if the node exists in the model.
    fn contains(&self, id: Self::Id) -> bool;
    /// Returns an approximate size hint (not required to be exact).
    fn size_hint(&self) -> usize {
        0
    }
}

/// Visibility filter for nodes (used to build a reduced list).
pub trait TreeFilter<T: TreeModel> {
    /// Returns `true` if the node matches the filter criteria.
    fn is_match(&self, model: &T, id: T::Id) -> bool;
}

impl<T, F> TreeFilter<T> for F
where
    T: TreeModel,
    F: Fn(&T, T::Id) -> bool,
{
    #[inline]
    fn is_match(&self, model: &T, id: T::Id) -> bool {
        self(model, id)
    }
}

/// Configuration for filtered rendering.
#[derive(Clone, Copy, Debug)]
pub struct TreeFilterConfig {
    /// Enables or disables filtering.
    pub enabled: bool,
    /// Opens every branch on a matching path, ignoring the model's flags.
    pub auto_expand: bool,
}

impl TreeFilterConfig {
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            auto_expand: false,
        }
    }

    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            auto_expand: true,
        }
    }
}

impl Default for TreeFilterConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Filter that matches every node.
#[derive(Clone, Copy, Debug)]
pub struct NoFilter;

impl<T: TreeModel> TreeFilter<T> for NoFilter {
    #[inline]
    fn is_match(&self, _model: &T, _id: T::Id) -> bool {
        true
    }
}
