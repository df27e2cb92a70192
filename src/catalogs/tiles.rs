use std::fmt;
use std::path::Path;

use crate::catalog::{Catalog, CatalogItem};
use crate::config::SelectTreeConfig;
use crate::node::BranchSpec;
use crate::tree::SelectTree;

/// "Solid Colors" starts open when there are at most this many background images.
pub const EXPANDED_COLORS_LIMIT: usize = 17;

/// Built-in table colors as `(name, #rrggbb)`.
pub const SOLID_COLORS: [(&str, &str); 6] = [
    ("Blue", "#0082df"),
    ("Green", "#008200"),
    ("Navy", "#000086"),
    ("Olive", "#868200"),
    ("Orange", "#f79600"),
    ("Teal", "#008286"),
];

/// A table background: a solid color or an image of the tile manager.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileKey {
    Color(String),
    Image(usize),
}

impl TileKey {
    pub const fn is_color(&self) -> bool {
        matches!(self, Self::Color(_))
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(color) => f.write_str(color),
            Self::Image(index) => write!(f, "tile #{index}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileInfo {
    pub key: TileKey,
    pub name: String,
    pub filename: Option<String>,
    /// The image failed to load.
    pub error: bool,
}

impl TileInfo {
    pub fn color(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: TileKey::Color(color.into()),
            name: name.into(),
            filename: None,
            error: false,
        }
    }

    pub fn image(index: usize, name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            key: TileKey::Image(index),
            name: name.into(),
            filename: Some(filename.into()),
            error: false,
        }
    }

    #[must_use]
    pub const fn with_error(mut self) -> Self {
        self.error = true;
        self
    }

    /// Name of the directory holding the image file, if any.
    pub fn directory(&self) -> Option<&str> {
        Path::new(self.filename.as_deref()?)
            .parent()?
            .file_name()?
            .to_str()
    }

    fn is_texture(&self) -> bool {
        self.directory() == Some("tiles")
    }

    fn is_scaled_image(&self) -> bool {
        matches!(self.directory(), Some("stretch" | "save-aspect"))
    }

    /// Index 0 is the manager's "no image" slot.
    fn is_usable_image(&self) -> bool {
        matches!(self.key, TileKey::Image(index) if index > 0)
            && self.filename.as_deref().is_some_and(|name| !name.is_empty())
            && !self.error
    }
}

impl CatalogItem for TileInfo {
    type Key = TileKey;

    fn key(&self) -> TileKey {
        self.key.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the tile catalog: the built-in colors first, then every usable image
/// sorted by name.
pub fn tile_catalog(images: impl IntoIterator<Item = TileInfo>) -> Catalog<TileInfo> {
    let mut images: Vec<_> = images
        .into_iter()
        .filter(TileInfo::is_usable_image)
        .collect();
    images.sort_by_cached_key(|tile| tile.name.to_lowercase());
    let colors = SOLID_COLORS
        .iter()
        .map(|&(name, color)| TileInfo::color(name, color));
    Catalog::new(colors.chain(images))
}

/// Builds the tree of the table tile dialog.
///
/// "Solid Colors" is open when `initial` is a color or the image list is short.
/// "Textures" lists images stored under `tiles/`, "Images" those under
/// `stretch/` or `save-aspect/`. Either is left out when nothing matches.
pub fn tile_tree(
    catalog: Catalog<TileInfo>,
    initial: Option<&TileKey>,
    config: &SelectTreeConfig,
) -> SelectTree<TileInfo> {
    let images = catalog.count_matching(|tile| !tile.key.is_color());
    let colors_open = initial.is_some_and(TileKey::is_color) || images <= EXPANDED_COLORS_LIMIT;
    let specs = [
        BranchSpec::filter("Solid Colors", |tile: &TileInfo| tile.key.is_color())
            .expanded(colors_open),
        BranchSpec::filter("All Backgrounds", |tile: &TileInfo| !tile.key.is_color())
            .expanded(true),
        BranchSpec::filter("Textures", TileInfo::is_texture),
        BranchSpec::filter("Images", TileInfo::is_scaled_image),
    ];
    SelectTree::build(catalog, specs, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeModel;

    fn images(count: usize) -> Vec<TileInfo> {
        (1..=count)
            .map(|index| TileInfo::image(index, format!("Felt {index:02}"), format!("felt{index}.png")))
            .collect()
    }

    #[test]
    fn unusable_images_are_skipped() {
        let catalog = tile_catalog([
            TileInfo::image(0, "None", "none.png"),
            TileInfo::image(4, "Wood", "wood.png"),
            TileInfo::image(5, "Marble", ""),
            TileInfo::image(6, "Cork", "cork.png").with_error(),
        ]);

        let names: Vec<_> = catalog.iter().map(|tile| tile.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Blue", "Green", "Navy", "Olive", "Orange", "Teal", "Wood"]
        );
    }

    #[test]
    fn images_are_grouped_by_directory() {
        let catalog = tile_catalog([
            TileInfo::image(1, "Felt", "data/tiles/felt.png"),
            TileInfo::image(2, "Beach", "data/tiles/stretch/beach.jpg"),
            TileInfo::image(3, "Castle", "data/tiles/save-aspect/castle.jpg"),
            TileInfo::image(4, "Loose", "loose.png"),
        ]);
        let tree = tile_tree(catalog, None, &SelectTreeConfig::default());
        let names = |path: &[&str]| -> Vec<String> {
            let branch = tree.find_branch(path).unwrap();
            tree.get_children(branch)
                .unwrap()
                .iter()
                .filter_map(|&id| tree.text(id))
                .map(str::to_owned)
                .collect()
        };

        assert_eq!(names(&["Textures"]), vec!["Felt"]);
        assert_eq!(names(&["Images"]), vec!["Beach", "Castle"]);
        assert_eq!(names(&["All Backgrounds"]).len(), 4);
    }

    #[test]
    fn directory_categories_are_dropped_when_empty() {
        let tree = tile_tree(tile_catalog(images(3)), None, &SelectTreeConfig::default());

        assert!(tree.find_branch(&["Textures"]).is_none());
        assert!(tree.find_branch(&["Images"]).is_none());
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn colors_open_for_short_image_lists() {
        let tree = tile_tree(tile_catalog(images(17)), None, &SelectTreeConfig::default());
        let colors = tree.find_branch(&["Solid Colors"]).unwrap();
        let backgrounds = tree.find_branch(&["All Backgrounds"]).unwrap();

        assert!(tree.is_expanded(colors));
        assert!(tree.is_expanded(backgrounds));
        let first = tree.children(colors)[0];
        assert_eq!(tree.key_of(first), Some(&TileKey::Color("#0082df".to_owned())));
    }

    #[test]
    fn colors_open_for_color_key_only_with_many_images() {
        let color = TileKey::Color("#008200".to_owned());
        let by_image = tile_tree(
            tile_catalog(images(18)),
            Some(&TileKey::Image(3)),
            &SelectTreeConfig::default(),
        );
        let by_color = tile_tree(tile_catalog(images(18)), Some(&color), &SelectTreeConfig::default());

        let colors = by_image.find_branch(&["Solid Colors"]).unwrap();
        assert!(!by_image.is_expanded(colors));
        let colors = by_color.find_branch(&["Solid Colors"]).unwrap();
        assert!(by_color.is_expanded(colors));
    }
}
