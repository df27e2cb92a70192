/// Actions that a user or application can initiate on the tree view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeAction<Custom = ()> {
    /// Move the cursor to the previous visible row.
    SelectPrev,
    /// Move the cursor to the next visible row.
    SelectNext,
    /// Move the cursor to the parent row.
    SelectParent,
    /// Open a collapsed branch, or step into an open one.
    SelectChild,
    /// Move the cursor to the first visible row.
    SelectFirst,
    /// Move the cursor to the last visible row.
    SelectLast,
    /// Move the cursor up by one viewport.
    PageUp,
    /// Move the cursor down by one viewport.
    PageDown,
    /// Open or close the branch under the cursor.
    ToggleNode,
    /// Same as a double click on the row under the cursor.
    Activate,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing under the cursor / nothing to do).
    Unhandled,
    /// The action needs the tree's owner (expansion lives in the model).
    Action(TreeAction<Custom>),
}
