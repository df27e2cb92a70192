use bitflags::bitflags;
use rustc_hash::FxHashSet;

use crate::catalog::{Catalog, CatalogItem};
use crate::config::SelectTreeConfig;
use crate::node::{BranchSpec, chunked_pairs};
use crate::tree::SelectTree;

pub type GameId = u32;

bitflags! {
    /// Per-game feature flags.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GameFlags: u32 {
        const BETA = 1 << 12;
        const CHILDREN = 1 << 13;
        /// Contributed under the GNU GPL.
        const CONTRIB = 1 << 14;
        /// Loadable but never listed.
        const HIDDEN = 1 << 15;
        const OPEN = 1 << 16;
        const ORIGINAL = 1 << 17;
        const POPULAR = 1 << 18;
        const RELAXED = 1 << 19;
        const SCORE = 1 << 20;
        const SEPARATE_DECKS = 1 << 21;
        /// Original games by other people, not playable.
        const XORIGINAL = 1 << 22;
        const STRIPPED = 1 << 23;
    }
}

/// Rule family of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameType {
    OneDeck,
    TwoDeck,
    ThreeDeck,
    FourDeck,
    BakersDozen,
    BeleagueredCastle,
    Canfield,
    Cribbage,
    DashavataraGanjifa,
    Fan,
    FortyThieves,
    FreeCell,
    Golf,
    Gypsy,
    Hanafuda,
    Hanoi,
    HexADeck,
    Ishido,
    Klondike,
    LightsOut,
    Mahjongg,
    Matrix,
    Memory,
    Montana,
    MughalGanjifa,
    Napoleon,
    NavagrahaGanjifa,
    Numerica,
    Pairing,
    Pegged,
    PictureGallery,
    Poker,
    Puzzle,
    Raglan,
    Row,
    Samegame,
    ShisenSho,
    Simple,
    Spider,
    Tarock,
    Terrace,
    Yukon,
    Custom,
}

impl GameType {
    const fn is_ganjifa(self) -> bool {
        matches!(
            self,
            Self::MughalGanjifa | Self::NavagrahaGanjifa | Self::DashavataraGanjifa
        )
    }

    /// Types played with something other than a French deck.
    const fn is_non_french(self) -> bool {
        self.is_ganjifa() || matches!(self, Self::Hanafuda | Self::HexADeck | Self::Tarock)
    }
}

/// Card deck a game is played with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameCategory {
    #[default]
    French,
    Hanafuda,
    Tarock,
    Mahjongg,
    HexADeck,
    MughalGanjifa,
    NavagrahaGanjifa,
    DashavataraGanjifa,
    TrumpOnly,
    Matching,
    Puzzle,
    Ishido,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SkillLevel {
    Luck,
    MostlyLuck,
    #[default]
    Balanced,
    MostlySkill,
    Skill,
}

/// Redeals value meaning "as many as you like".
pub const UNLIMITED_REDEALS: i8 = -1;
/// Redeals value meaning "depends on the deal".
pub const VARIABLE_REDEALS: i8 = -2;

/// Catalog entry of the games database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameInfo {
    pub id: GameId,
    pub name: String,
    pub alt_names: Vec<String>,
    pub game_type: GameType,
    pub flags: GameFlags,
    pub skill_level: SkillLevel,
    pub ncards: u16,
    pub decks: u8,
    pub redeals: i8,
    pub category: GameCategory,
    /// French deck extended with jokers.
    pub joker_deck: bool,
}

impl GameInfo {
    /// A one-deck, 52-card, no-redeal French game.
    pub fn new(id: GameId, name: impl Into<String>, game_type: GameType) -> Self {
        Self {
            id,
            name: name.into(),
            alt_names: Vec::new(),
            game_type,
            flags: GameFlags::empty(),
            skill_level: SkillLevel::default(),
            ncards: 52,
            decks: 1,
            redeals: 0,
            category: GameCategory::French,
            joker_deck: false,
        }
    }

    #[must_use]
    pub fn with_alt_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.alt_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: GameFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn with_skill(mut self, skill_level: SkillLevel) -> Self {
        self.skill_level = skill_level;
        self
    }

    /// Sets the deck count and the total number of cards dealt.
    #[must_use]
    pub const fn with_decks(mut self, decks: u8, ncards: u16) -> Self {
        self.decks = decks;
        self.ncards = ncards;
        self
    }

    #[must_use]
    pub const fn with_redeals(mut self, redeals: i8) -> Self {
        self.redeals = redeals;
        self
    }

    #[must_use]
    pub const fn with_category(mut self, category: GameCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub const fn with_jokers(mut self) -> Self {
        self.joker_deck = true;
        self
    }
}

impl CatalogItem for GameInfo {
    type Key = GameId;

    fn key(&self) -> GameId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn alt_names(&self) -> &[String] {
        &self.alt_names
    }
}

/// Named game lists maintained next to the games database.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameGroups {
    /// Games compatible with other solitaire programs, by program.
    pub compatibility: Vec<(String, Vec<GameId>)>,
    /// Games added in each release, by version string.
    pub pysol_versions: Vec<(String, Vec<GameId>)>,
    pub inventors: Vec<(String, Vec<GameId>)>,
}

/// Builds the games catalog: hidden games are dropped, the rest sorted by name.
pub fn game_catalog(games: impl IntoIterator<Item = GameInfo>) -> Catalog<GameInfo> {
    let mut games: Vec<_> = games
        .into_iter()
        .filter(|game| !game.flags.contains(GameFlags::HIDDEN))
        .collect();
    games.sort_by_cached_key(|game| (game.name.to_lowercase(), game.id));
    Catalog::new(games)
}

/// Alternate names of every game as `(id, alternate name)`, sorted by name.
pub fn alternate_names(catalog: &Catalog<GameInfo>) -> Vec<(GameId, String)> {
    let mut names: Vec<_> = catalog
        .iter()
        .flat_map(|game| game.alt_names.iter().map(|alt| (game.id, alt.clone())))
        .collect();
    names.sort_by_cached_key(|(id, alt)| (alt.to_lowercase(), *id));
    names
}

const FRENCH_TYPES: [(&str, GameType); 23] = [
    ("Baker's Dozen type", GameType::BakersDozen),
    ("Beleaguered Castle type", GameType::BeleagueredCastle),
    ("Canfield type", GameType::Canfield),
    ("Fan type", GameType::Fan),
    ("Forty Thieves type", GameType::FortyThieves),
    ("FreeCell type", GameType::FreeCell),
    ("Golf type", GameType::Golf),
    ("Gypsy type", GameType::Gypsy),
    ("Klondike type", GameType::Klondike),
    ("Montana type", GameType::Montana),
    ("Napoleon type", GameType::Napoleon),
    ("Numerica type", GameType::Numerica),
    ("Pairing type", GameType::Pairing),
    ("Picture Gallery type", GameType::PictureGallery),
    ("Raglan type", GameType::Raglan),
    ("Simple games", GameType::Simple),
    ("Spider type", GameType::Spider),
    ("Terrace type", GameType::Terrace),
    ("Yukon type", GameType::Yukon),
    ("One-Deck games", GameType::OneDeck),
    ("Two-Deck games", GameType::TwoDeck),
    ("Three-Deck games", GameType::ThreeDeck),
    ("Four-Deck games", GameType::FourDeck),
];

const SPECIAL_TYPES: [(&str, GameType); 13] = [
    ("Cribbage type", GameType::Cribbage),
    ("Hex A Deck type", GameType::HexADeck),
    ("Ishido type", GameType::Ishido),
    ("Lights Out type", GameType::LightsOut),
    ("Matrix type", GameType::Matrix),
    ("Memory type", GameType::Memory),
    ("Pegged type", GameType::Pegged),
    ("Poker type", GameType::Poker),
    ("Puzzle type", GameType::Puzzle),
    ("Samegame type", GameType::Samegame),
    ("Shisen-Sho type", GameType::ShisenSho),
    ("Tarock type", GameType::Tarock),
    ("Tower of Hanoi type", GameType::Hanoi),
];

const CARD_COUNTS: [u16; 7] = [32, 48, 52, 64, 78, 104, 144];
const REDEAL_COUNTS: [i8; 6] = [VARIABLE_REDEALS, UNLIMITED_REDEALS, 0, 1, 2, 3];

fn of_type(label: &str, game_type: GameType) -> BranchSpec<GameInfo> {
    BranchSpec::filter(label, move |game: &GameInfo| game.game_type == game_type).hide_when_empty()
}

fn flagged(label: &str, flags: GameFlags) -> BranchSpec<GameInfo> {
    BranchSpec::filter(label, move |game: &GameInfo| game.flags.intersects(flags))
}

fn listed(label: String, ids: &[GameId]) -> BranchSpec<GameInfo> {
    let ids: FxHashSet<GameId> = ids.iter().copied().collect();
    BranchSpec::filter(label, move |game: &GameInfo| ids.contains(&game.id)).hide_when_empty()
}

fn original(label: &str, keep: fn(GameType) -> bool) -> BranchSpec<GameInfo> {
    BranchSpec::filter(label, move |game: &GameInfo| {
        game.flags.contains(GameFlags::ORIGINAL) && keep(game.game_type)
    })
    .hide_when_empty()
}

fn skill_levels() -> BranchSpec<GameInfo> {
    let level = |label: &str, skill: SkillLevel| {
        BranchSpec::filter(label, move |game: &GameInfo| game.skill_level == skill)
    };
    BranchSpec::group(
        "by Skill Level",
        [
            level("Luck only", SkillLevel::Luck),
            level("Mostly luck", SkillLevel::MostlyLuck),
            level("Balanced", SkillLevel::Balanced),
            level("Mostly skill", SkillLevel::MostlySkill),
            level("Skill only", SkillLevel::Skill),
        ],
    )
}

fn game_features(groups: &GameGroups) -> BranchSpec<GameInfo> {
    let cards = CARD_COUNTS
        .iter()
        .map(|&count| {
            BranchSpec::filter(format!("{count} cards"), move |game: &GameInfo| {
                game.ncards == count
            })
        })
        .chain([BranchSpec::filter("Other number", |game: &GameInfo| {
            !CARD_COUNTS.contains(&game.ncards)
        })]);
    let decks = (1..=4u8).map(|count| {
        BranchSpec::filter(format!("{count} deck games"), move |game: &GameInfo| {
            game.decks == count
        })
    });
    let redeals = [
        ("No redeal", 0),
        ("1 redeal", 1),
        ("2 redeals", 2),
        ("3 redeals", 3),
        ("Unlimited redeals", UNLIMITED_REDEALS),
        ("Variable redeals", VARIABLE_REDEALS),
    ]
    .into_iter()
    .map(|(label, count)| {
        BranchSpec::filter(label, move |game: &GameInfo| game.redeals == count)
    })
    .chain([BranchSpec::filter(
        "Other number of redeals",
        |game: &GameInfo| !REDEAL_COUNTS.contains(&game.redeals),
    )]);
    let compatibility = groups
        .compatibility
        .iter()
        .map(|(name, ids)| listed(name.clone(), ids));

    BranchSpec::group(
        "by Game Feature",
        [
            BranchSpec::group("by Number of Cards", cards),
            BranchSpec::group("by Number of Decks", decks),
            BranchSpec::group("by Number of Redeals", redeals),
            BranchSpec::group("by Compatibility", compatibility),
        ],
    )
}

fn other_categories() -> BranchSpec<GameInfo> {
    BranchSpec::group(
        "Other Categories",
        [
            flagged("Games for Children (very easy)", GameFlags::CHILDREN),
            flagged("Games with Scoring", GameFlags::SCORE),
            flagged("Games with Stripped Decks", GameFlags::STRIPPED),
            flagged("Games with Separate Decks", GameFlags::SEPARATE_DECKS),
            BranchSpec::filter("Games with Jokers", |game: &GameInfo| {
                game.category == GameCategory::French && game.joker_deck
            }),
            flagged("Open Games (all cards visible)", GameFlags::OPEN),
            flagged("Relaxed Variants", GameFlags::RELAXED),
        ],
    )
}

/// Builds the category hierarchy of the game selection dialog.
///
/// "All Games" is paged into chunks of `config.chunk_size` games. Type lists
/// and the named game lists in `groups` leave out entries without games;
/// skill, feature and other categories keep them with a placeholder.
pub fn game_tree(
    catalog: Catalog<GameInfo>,
    groups: &GameGroups,
    config: &SelectTreeConfig,
) -> SelectTree<GameInfo> {
    let all_games = chunked_pairs(catalog.items(), config.effective_chunk_size(), |game| {
        game.name.clone()
    });
    let alternate = alternate_names(&catalog);

    let specs = [
        BranchSpec::group("All Games", all_games),
        BranchSpec::pairs("Alternate Names", alternate),
        flagged("Popular Games", GameFlags::POPULAR),
        BranchSpec::group(
            "French Games",
            FRENCH_TYPES.iter().map(|&(label, ty)| of_type(label, ty)),
        )
        .expanded(true),
        BranchSpec::filter("Mahjongg Games", |game: &GameInfo| {
            game.game_type == GameType::Mahjongg
        }),
        BranchSpec::group(
            "Oriental Games",
            [
                of_type("Dashavatara Ganjifa type", GameType::DashavataraGanjifa),
                BranchSpec::filter("Ganjifa type", |game: &GameInfo| {
                    game.game_type.is_ganjifa()
                })
                .hide_when_empty(),
                of_type("Hanafuda type", GameType::Hanafuda),
                of_type("Mughal Ganjifa type", GameType::MughalGanjifa),
                of_type("Navagraha Ganjifa type", GameType::NavagrahaGanjifa),
            ],
        ),
        BranchSpec::group(
            "Special Games",
            SPECIAL_TYPES.iter().map(|&(label, ty)| of_type(label, ty)),
        ),
        BranchSpec::filter("Custom Games", |game: &GameInfo| {
            game.game_type == GameType::Custom
        }),
        skill_levels(),
        game_features(groups),
        BranchSpec::group(
            "by PySol version",
            groups
                .pysol_versions
                .iter()
                .map(|(version, ids)| listed(format!("New games in v. {version}"), ids)),
        ),
        BranchSpec::group(
            "by Inventors",
            groups
                .inventors
                .iter()
                .map(|(name, ids)| listed(name.clone(), ids)),
        ),
        other_categories(),
        BranchSpec::group(
            "Original Games",
            [
                original("French type", |ty| !ty.is_non_french()),
                original("Ganjifa type", GameType::is_ganjifa),
                original("Hanafuda type", |ty| ty == GameType::Hanafuda),
                original("Hex A Deck type", |ty| ty == GameType::HexADeck),
                original("Tarock type", |ty| ty == GameType::Tarock),
            ],
        ),
    ];
    SelectTree::build(catalog, specs, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeModel;

    fn games() -> Vec<GameInfo> {
        vec![
            GameInfo::new(2, "Klondike", GameType::Klondike)
                .with_alt_names(["Patience", "Demon Patience"])
                .with_flags(GameFlags::POPULAR)
                .with_skill(SkillLevel::MostlyLuck)
                .with_redeals(UNLIMITED_REDEALS),
            GameInfo::new(8, "FreeCell", GameType::FreeCell)
                .with_flags(GameFlags::OPEN | GameFlags::POPULAR)
                .with_skill(SkillLevel::MostlySkill),
            GameInfo::new(11, "Spider", GameType::Spider).with_decks(2, 104),
            GameInfo::new(900, "Debug deal", GameType::Simple).with_flags(GameFlags::HIDDEN),
            GameInfo::new(22, "Wizard", GameType::Tarock)
                .with_category(GameCategory::Tarock)
                .with_decks(1, 78)
                .with_flags(GameFlags::ORIGINAL),
        ]
    }

    fn labels(tree: &SelectTree<GameInfo>, ids: &[crate::NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| tree.text(id))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn catalog_hides_and_sorts() {
        let catalog = game_catalog(games());

        let names: Vec<_> = catalog.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["FreeCell", "Klondike", "Spider", "Wizard"]);
        assert_eq!(
            alternate_names(&catalog),
            vec![(2, "Demon Patience".to_owned()), (2, "Patience".to_owned())]
        );
    }

    #[test]
    fn search_finds_games_by_alternate_name() {
        let catalog = game_catalog(games());

        assert_eq!(crate::search_catalog(&catalog, "Patience"), vec![2]);
    }

    #[test]
    fn blank_alternate_names_do_not_create_a_category() {
        let games = [GameInfo::new(5, "Golf", GameType::Golf).with_alt_names([""])];
        let tree = game_tree(
            game_catalog(games),
            &GameGroups::default(),
            &SelectTreeConfig::default(),
        );

        assert!(tree.find_branch(&["Alternate Names"]).is_none());
        assert!(tree.find_branch(&["All Games"]).is_some());
    }

    #[test]
    fn empty_categories_are_left_out() {
        let groups = GameGroups {
            inventors: vec![("Nobody".to_owned(), vec![404])],
            ..GameGroups::default()
        };
        let tree = game_tree(game_catalog(games()), &groups, &SelectTreeConfig::default());

        assert_eq!(
            labels(&tree, tree.roots()),
            vec![
                "All Games",
                "Alternate Names",
                "Popular Games",
                "French Games",
                "Special Games",
                "by Skill Level",
                "by Game Feature",
                "Other Categories",
                "Original Games",
            ]
        );
        let french = tree.find_branch(&["French Games"]).unwrap();
        assert!(tree.is_expanded(french));
        assert_eq!(
            labels(&tree, tree.children(french)),
            vec!["FreeCell type", "Klondike type", "Spider type"]
        );
        let original = tree.find_branch(&["Original Games"]).unwrap();
        assert_eq!(labels(&tree, tree.children(original)), vec!["Tarock type"]);
        assert!(tree.find_branch(&["by Game Feature", "by Compatibility"]).is_none());
    }

    #[test]
    fn feature_branches_keep_placeholders() {
        let tree = game_tree(
            game_catalog(games()),
            &GameGroups::default(),
            &SelectTreeConfig::default().with_no_items_label("(no games)"),
        );
        let three_decks = tree
            .find_branch(&["by Game Feature", "by Number of Decks", "3 deck games"])
            .unwrap();
        let unlimited = tree
            .find_branch(&["by Game Feature", "by Number of Redeals", "Unlimited redeals"])
            .unwrap();

        assert_eq!(labels(&tree, tree.children(three_decks)), vec!["(no games)"]);
        assert_eq!(labels(&tree, tree.children(unlimited)), vec!["Klondike"]);
    }

    #[test]
    fn all_games_is_paged() {
        let tree = game_tree(
            game_catalog(games()),
            &GameGroups::default(),
            &SelectTreeConfig::default().with_chunk_size(3),
        );
        let all = tree.find_branch(&["All Games"]).unwrap();

        assert_eq!(
            labels(&tree, tree.children(all)),
            vec!["Free - Spid", "Wiza - Wiza"]
        );
    }
}
