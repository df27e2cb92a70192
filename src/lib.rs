//! Lazily expanded catalog selection tree with a Ratatui front end.
//!
//! A [`SelectTree`] is built once per catalog kind and shared by every dialog
//! through a [`TreeCache`]. Each dialog drives it with a [`SelectionController`]
//! and draws it with the [`TreeListView`] widget or any other [`TreeRenderer`].
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `handle_key` helpers.
//! - `serde`: serde support for `ScrollView`, `SelectTreeConfig`, `NodeId` and `TreeViewSnapshot`.

mod action;
mod cache;
mod catalog;
pub mod catalogs;
mod config;
mod context;
mod controller;
mod error;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
mod node;
pub mod prelude;
mod preview;
mod render;
mod search;
mod state;
mod style;
mod tree;
mod widget;

pub use action::{TreeAction, TreeEvent};
pub use cache::{CatalogKind, TreeCache};
pub use catalog::{Catalog, CatalogItem};
pub use config::{DEFAULT_CHUNK_SIZE, SelectTreeConfig};
pub use context::TreeRowContext;
pub use controller::{SelectEvent, SelectionController, SelectionPhase};
pub use error::{PreviewError, TreeError};
pub use glyphs::{
    CatalogLabels, TreeGlyphs, TreeLabelPrefix, TreeLabelProvider, TreeLabelRenderer,
    tree_label_line, tree_name_cell,
};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use model::{NoFilter, TreeFilter, TreeFilterConfig, TreeModel};
pub use node::{Branch, BranchSpec, ChildSource, Leaf, NodeId, Predicate, TreeNode, chunked_pairs};
pub use preview::{CatalogPreview, PreviewRenderer, PreviewSurface};
pub use render::{TextRenderer, TreeRenderer};
pub use search::{NameFilter, search_catalog};
pub use state::{TreeViewSnapshot, TreeViewState, VisibleNode};
pub use style::{TreeListViewStyle, TreeScrollPolicy};
pub use tree::{ScrollView, SelectTree};
pub use widget::TreeListView;
