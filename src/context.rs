use ratatui::style::Style;

/// Per-row data handed to label renderers.
#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub is_expanded: bool,
    pub has_children: bool,
    /// The row carries the current selection.
    pub is_selected: bool,
    /// `false` for placeholder rows that can never be selected.
    pub is_selectable: bool,
    pub draw_lines: bool,
    pub line_style: Style,
}
