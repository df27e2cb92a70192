//! Category hierarchies of the game, cardset and table tile dialogs.

pub mod cardsets;
pub mod games;
pub mod tiles;

pub use cardsets::{
    CardsetAttributeNames, CardsetInfo, CardsetSize, CardsetType, cardset_by_type_tree,
    cardset_catalog, cardset_tree,
};
pub use games::{
    GameCategory, GameFlags, GameGroups, GameId, GameInfo, GameType, SkillLevel, game_catalog,
    game_tree,
};
pub use tiles::{TileInfo, TileKey, tile_catalog, tile_tree};
