// Minimal example: a small cardset catalog, one dialog, text and buffer output.
use std::rc::Rc;

use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_catalogtree::catalogs::{
    CardsetAttributeNames, CardsetInfo, CardsetSize, CardsetType, cardset_catalog, cardset_tree,
};
use tui_catalogtree::{
    CatalogLabels, SelectTreeConfig, SelectionController, TextRenderer, TreeListView,
    TreeListViewStyle,
};

fn main() {
    // Cardsets as the resource manager would report them.
    let catalog = cardset_catalog([
        CardsetInfo::new(0, "Standard", CardsetSize::Medium),
        CardsetInfo::new(1, "Dondorf", CardsetSize::Large).with_dates([19]),
        CardsetInfo::new(2, "Hanafuda", CardsetSize::Small).with_type(CardsetType::Hanafuda),
        CardsetInfo::new(3, "Broken", CardsetSize::Tiny).with_error(),
    ]);

    // The tree is built once and shared by every dialog opened on it.
    let tree = Rc::new(cardset_tree(
        catalog,
        &CardsetAttributeNames::default(),
        &SelectTreeConfig::default(),
    ));
    let mut dialog = SelectionController::new(Rc::clone(&tree), Some(0))
        .with_preview(|key: &usize| println!("preview cardset #{key}"));

    // Open "Large cardsets" and pick the only entry.
    if let Some(large) = tree.find_branch(&["by Size", "Large cardsets"]) {
        dialog.click(large);
        if let Ok(&[first, ..]) = tree.get_children(large) {
            dialog.click(first);
        }
    }

    // Plain text output through the renderer trait.
    let mut text = TextRenderer::new();
    dialog.paint(&mut text);
    for line in text.lines() {
        println!("{line}");
    }

    // The same rows through the ratatui widget, into an in-memory buffer.
    let highlighted = dialog.selected_leaves();
    let widget = TreeListView::new(&*tree, &CatalogLabels, TreeListViewStyle::default())
        .highlighted(&highlighted);
    let area = Rect::new(0, 0, 40, 16);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, dialog.view_mut());

    println!("selected: {:?}", dialog.finalize());
}
