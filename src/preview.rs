use std::fmt;
use std::rc::Rc;

use crate::catalog::CatalogItem;
use crate::error::PreviewError;
use crate::tree::SelectTree;

/// Receives every accepted selection change of a dialog.
///
/// Implementations must not panic on keys they cannot resolve; they simply
/// leave the previous preview in place.
pub trait PreviewRenderer<K> {
    fn update_preview(&mut self, key: &K);
}

impl<K, F> PreviewRenderer<K> for F
where
    F: FnMut(&K),
{
    #[inline]
    fn update_preview(&mut self, key: &K) {
        self(key);
    }
}

/// Something that can draw one catalog item (a game layout, a cardset sample, a tile).
pub trait PreviewSurface<I> {
    fn draw(&mut self, item: &I) -> Result<(), PreviewError>;
}

/// Resolves keys through the tree's catalog and forwards the item to a surface.
///
/// Redrawing the key already shown is skipped. Stale keys and surface failures
/// are logged and leave the previous preview on screen.
pub struct CatalogPreview<I: CatalogItem, S> {
    tree: Rc<SelectTree<I>>,
    shown: Option<I::Key>,
    surface: S,
}

impl<I: CatalogItem, S: PreviewSurface<I>> CatalogPreview<I, S> {
    pub const fn new(tree: Rc<SelectTree<I>>, surface: S) -> Self {
        Self {
            tree,
            shown: None,
            surface,
        }
    }

    /// Returns the key currently on the surface.
    pub const fn shown(&self) -> Option<&I::Key> {
        self.shown.as_ref()
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Draws the item behind `key` unless it is already shown.
    pub fn show(&mut self, key: &I::Key) -> Result<(), PreviewError> {
        if self.shown.as_ref() == Some(key) {
            return Ok(());
        }
        let item = self.tree.catalog().get(key).ok_or(PreviewError::StaleKey)?;
        self.surface.draw(item)?;
        self.shown = Some(key.clone());
        Ok(())
    }
}

impl<I: CatalogItem, S: PreviewSurface<I>> PreviewRenderer<I::Key> for CatalogPreview<I, S> {
    fn update_preview(&mut self, key: &I::Key) {
        if let Err(error) = self.show(key) {
            tracing::debug!(
                message = "select_tree.preview_skipped",
                key = ?key,
                error = %error,
                shown = ?self.shown
            );
        }
    }
}

impl<I: CatalogItem, S> fmt::Debug for CatalogPreview<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogPreview")
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::SelectTreeConfig;
    use crate::node::BranchSpec;

    #[derive(Debug)]
    struct Tile {
        index: usize,
        name: &'static str,
        broken: bool,
    }

    impl CatalogItem for Tile {
        type Key = usize;

        fn key(&self) -> usize {
            self.index
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[derive(Default)]
    struct Canvas {
        drawn: Vec<&'static str>,
    }

    impl PreviewSurface<Tile> for Canvas {
        fn draw(&mut self, item: &Tile) -> Result<(), PreviewError> {
            if item.broken {
                return Err(PreviewError::Unavailable(format!("{}.gif", item.name)));
            }
            self.drawn.push(item.name);
            Ok(())
        }
    }

    fn preview() -> CatalogPreview<Tile, Canvas> {
        let catalog = Catalog::new([
            Tile {
                index: 1,
                name: "Felt",
                broken: false,
            },
            Tile {
                index: 2,
                name: "Wood",
                broken: true,
            },
            Tile {
                index: 3,
                name: "Marble",
                broken: false,
            },
        ]);
        let tree = SelectTree::build(
            catalog,
            [BranchSpec::all("All Backgrounds")],
            &SelectTreeConfig::default(),
        );
        CatalogPreview::new(Rc::new(tree), Canvas::default())
    }

    #[test]
    fn repeated_key_is_drawn_once() {
        let mut preview = preview();

        preview.update_preview(&1);
        preview.update_preview(&1);

        assert_eq!(preview.surface().drawn, vec!["Felt"]);
        assert_eq!(preview.shown(), Some(&1));
    }

    #[test]
    fn stale_key_keeps_previous_preview() {
        let mut preview = preview();
        preview.update_preview(&3);

        assert_eq!(preview.show(&42), Err(PreviewError::StaleKey));
        preview.update_preview(&42);

        assert_eq!(preview.shown(), Some(&3));
        assert_eq!(preview.surface().drawn, vec!["Marble"]);
    }

    #[test]
    fn surface_failure_keeps_previous_preview() {
        let mut preview = preview();
        preview.update_preview(&1);

        preview.update_preview(&2);

        assert_eq!(preview.shown(), Some(&1));
        assert_eq!(preview.surface().drawn, vec!["Felt"]);
    }
}
