use std::borrow::Cow;

use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use crate::catalog::CatalogItem;
use crate::context::TreeRowContext;
use crate::model::TreeModel;
use crate::node::NodeId;
use crate::tree::SelectTree;

#[derive(Clone, Copy, Debug)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    /// Marker of rows that cannot be selected.
    pub placeholder: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
            placeholder: "∅",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
            placeholder: "-",
        }
    }
}

#[derive(Clone)]
pub struct TreeLabelPrefix<'a> {
    pub name: &'a str,
    pub prefix: Option<Cow<'a, str>>,
}

pub trait TreeLabelProvider<T: TreeModel> {
    fn label_parts<'a>(&'a self, model: &'a T, id: T::Id) -> TreeLabelPrefix<'a>;
}

/// Labels rows of a [`SelectTree`] with branch labels and leaf texts.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogLabels;

impl<I: CatalogItem> TreeLabelProvider<SelectTree<I>> for CatalogLabels {
    fn label_parts<'a>(&'a self, model: &'a SelectTree<I>, id: NodeId) -> TreeLabelPrefix<'a> {
        TreeLabelPrefix {
            name: model.text(id).unwrap_or_default(),
            prefix: None,
        }
    }
}

pub trait TreeLabelRenderer<T: TreeModel> {
    fn cell<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a>;
}

impl<T, P> TreeLabelRenderer<T> for P
where
    T: TreeModel,
    P: TreeLabelProvider<T>,
{
    fn cell<'a>(
        &'a self,
        model: &'a T,
        id: T::Id,
        ctx: &TreeRowContext,
        glyphs: &TreeGlyphs<'a>,
    ) -> Cell<'a> {
        let parts = self.label_parts(model, id);
        tree_name_cell(ctx, parts, glyphs)
    }
}

const fn leaf_glyph<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> &'a str {
    if ctx.is_selectable {
        glyphs.leaf
    } else {
        glyphs.placeholder
    }
}

pub fn tree_label_line<'a>(
    ctx: &TreeRowContext<'_>,
    parts: TreeLabelPrefix<'a>,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let TreeLabelPrefix { name, prefix: op } = parts;
    let op = op.filter(|value| !value.is_empty());

    if ctx.level == 0 || !ctx.draw_lines {
        let expander = if ctx.has_children {
            if ctx.is_expanded {
                glyphs.expanded
            } else {
                glyphs.collapsed
            }
        } else if ctx.level == 0 {
            ""
        } else {
            leaf_glyph(ctx, glyphs)
        };

        let mut spans = Vec::with_capacity(ctx.level as usize + 6);
        if ctx.level > 0 {
            for _ in 0..ctx.level {
                spans.push(Span::raw(glyphs.empty));
            }
        }
        if !expander.is_empty() {
            spans.push(Span::raw(expander));
        }
        if let Some(op) = op {
            spans.push(Span::raw(op));
        }
        spans.push(Span::raw(" "));
        spans.push(Span::raw(name));
        return Line::from(spans);
    }

    let mut name_spans = Vec::with_capacity(ctx.is_tail_stack.len() + 6);

    for (l, is_last) in ctx.is_tail_stack.iter().enumerate() {
        let part = if l == (ctx.level as usize) - 1 {
            if *is_last {
                glyphs.branch_last
            } else {
                glyphs.branch
            }
        } else if ctx.is_tail_stack[l] {
            glyphs.indent
        } else {
            glyphs.vert
        };
        name_spans.push(Span::styled(part, ctx.line_style));
    }

    let expander = if ctx.has_children {
        if ctx.is_expanded {
            glyphs.expanded
        } else {
            glyphs.collapsed
        }
    } else {
        leaf_glyph(ctx, glyphs)
    };

    if !expander.is_empty() {
        name_spans.push(Span::raw(expander));
        name_spans.push(Span::raw(" "));
    }

    if let Some(op) = op {
        name_spans.push(Span::raw(op));
        name_spans.push(Span::raw(" "));
    }

    name_spans.push(Span::raw(name));
    Line::from(name_spans)
}

pub fn tree_name_cell<'a>(
    ctx: &TreeRowContext<'_>,
    parts: TreeLabelPrefix<'a>,
    glyphs: &TreeGlyphs<'a>,
) -> Cell<'a> {
    Cell::from(tree_label_line(ctx, parts, glyphs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    fn ctx(tail: &[bool], is_selectable: bool) -> TreeRowContext<'_> {
        TreeRowContext {
            level: u16::try_from(tail.len()).unwrap(),
            is_tail_stack: tail,
            is_expanded: false,
            has_children: false,
            is_selected: false,
            is_selectable,
            draw_lines: true,
            line_style: Style::default(),
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn placeholder_rows_use_their_own_glyph() {
        let glyphs = TreeGlyphs::ascii();
        let parts = |name| TreeLabelPrefix { name, prefix: None };

        let leaf = tree_label_line(&ctx(&[true], true), parts("Klondike"), &glyphs);
        let empty = tree_label_line(&ctx(&[true], false), parts("(no items)"), &glyphs);

        assert_eq!(plain(&leaf), "`--* Klondike");
        assert_eq!(plain(&empty), "`--- (no items)");
    }

    #[test]
    fn nested_rows_draw_guides_for_open_ancestors() {
        let glyphs = TreeGlyphs::ascii();
        let parts = TreeLabelPrefix {
            name: "Tiny cardsets",
            prefix: None,
        };
        let mut row = ctx(&[false, false], true);
        row.has_children = true;

        let line = tree_label_line(&row, parts, &glyphs);

        assert_eq!(plain(&line), "|  |--> Tiny cardsets");
    }
}
