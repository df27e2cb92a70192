use std::borrow::Cow;

use crate::context::TreeRowContext;
use crate::glyphs::{TreeGlyphs, TreeLabelPrefix, tree_label_line};

/// Drawing surface driven by [`SelectionController::paint`](crate::SelectionController::paint).
///
/// Rows arrive top to bottom in display order. A backend only decides how a
/// row looks; which rows exist and in what state is decided by the controller.
pub trait TreeRenderer<K> {
    fn draw_branch(&mut self, row: &TreeRowContext<'_>, label: &str);
    /// `key` is `None` for the "(no items)" placeholder.
    fn draw_leaf(&mut self, row: &TreeRowContext<'_>, text: &str, key: Option<&K>);
}

/// Renders the tree into plain text lines, one per visible row.
///
/// Selected leaves are prefixed with `*`.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    glyphs: TreeGlyphs<'static>,
    lines: Vec<String>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub const fn new() -> Self {
        Self::with_glyphs(TreeGlyphs::ascii())
    }

    pub const fn with_glyphs(glyphs: TreeGlyphs<'static>) -> Self {
        Self {
            glyphs,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drops the collected lines so the renderer can be reused for the next frame.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn push(&mut self, row: &TreeRowContext<'_>, name: &str) {
        let parts = TreeLabelPrefix {
            name,
            prefix: row.is_selected.then_some(Cow::Borrowed("*")),
        };
        let line = tree_label_line(row, parts, &self.glyphs);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        self.lines.push(text);
    }
}

impl<K> TreeRenderer<K> for TextRenderer {
    fn draw_branch(&mut self, row: &TreeRowContext<'_>, label: &str) {
        self.push(row, label);
    }

    fn draw_leaf(&mut self, row: &TreeRowContext<'_>, text: &str, _key: Option<&K>) {
        self.push(row, text);
    }
}
