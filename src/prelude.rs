pub use crate::{
    BranchSpec, Catalog, CatalogItem, CatalogKind, CatalogLabels, CatalogPreview, NameFilter,
    NodeId, PreviewRenderer, PreviewSurface, ScrollView, SelectEvent, SelectTree,
    SelectTreeConfig, SelectionController, SelectionPhase, TextRenderer, TreeAction, TreeCache,
    TreeEvent, TreeFilterConfig, TreeGlyphs, TreeListView, TreeListViewStyle, TreeModel,
    TreeRenderer, TreeRowContext, TreeScrollPolicy, TreeViewState, chunked_pairs,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TreeKeyBindings};
