use crate::catalog::{Catalog, CatalogItem};
use crate::config::SelectTreeConfig;
use crate::node::BranchSpec;
use crate::tree::SelectTree;

/// "All Cardsets" starts open when the catalog has at most this many entries.
pub const EXPANDED_ALL_LIMIT: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardsetSize {
    Tiny,
    Small,
    Medium,
    Large,
    ExtraLarge,
    HiRes,
}

impl CardsetSize {
    pub const ALL: [Self; 6] = [
        Self::Tiny,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::ExtraLarge,
        Self::HiRes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tiny => "Tiny cardsets",
            Self::Small => "Small cardsets",
            Self::Medium => "Medium cardsets",
            Self::Large => "Large cardsets",
            Self::ExtraLarge => "Extra Large cardsets",
            Self::HiRes => "Hi-Res cardsets",
        }
    }
}

/// Deck layout a cardset provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardsetType {
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

impl CardsetType {
    pub const ALL: [Self; 12] = [
        Self::French,
        Self::Hanafuda,
        Self::Tarock,
        Self::Mahjongg,
        Self::HexADeck,
        Self::MughalGanjifa,
        Self::NavagrahaGanjifa,
        Self::DashavataraGanjifa,
        Self::TrumpOnly,
        Self::Matching,
        Self::Puzzle,
        Self::Ishido,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::French => "French type (52-54 cards)",
            Self::Hanafuda => "Hanafuda type (48 cards)",
            Self::Tarock => "Tarock type (78 cards)",
            Self::Mahjongg => "Mahjongg type (42 tiles)",
            Self::HexADeck => "Hex A Deck type (68 cards)",
            Self::MughalGanjifa => "Mughal Ganjifa type (96 cards)",
            Self::NavagrahaGanjifa => "Navagraha Ganjifa type (108 cards)",
            Self::DashavataraGanjifa => "Dashavatara Ganjifa type (120 cards)",
            Self::TrumpOnly => "Trumps only type (variable cards)",
            Self::Matching => "Matching type (variable cards)",
            Self::Puzzle => "Puzzle type (variable pieces)",
            Self::Ishido => "Ishido type (36 tiles)",
        }
    }
}

/// Catalog entry of the cardset manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardsetInfo {
    pub index: usize,
    pub name: String,
    pub size: CardsetSize,
    pub cardset_type: CardsetType,
    pub styles: Vec<u16>,
    pub nationalities: Vec<u16>,
    /// Centuries of the original decks, e.g. `18` for 1800 - 1899.
    pub dates: Vec<u16>,
    /// The cardset failed to load.
    pub error: bool,
}

impl CardsetInfo {
    pub fn new(index: usize, name: impl Into<String>, size: CardsetSize) -> Self {
        Self {
            index,
            name: name.into(),
            size,
            cardset_type: CardsetType::French,
            styles: Vec::new(),
            nationalities: Vec::new(),
            dates: Vec::new(),
            error: false,
        }
    }

    #[must_use]
    pub const fn with_type(mut self, cardset_type: CardsetType) -> Self {
        self.cardset_type = cardset_type;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: impl IntoIterator<Item = u16>) -> Self {
        self.styles = styles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_nationalities(mut self, nationalities: impl IntoIterator<Item = u16>) -> Self {
        self.nationalities = nationalities.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_dates(mut self, dates: impl IntoIterator<Item = u16>) -> Self {
        self.dates = dates.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn with_error(mut self) -> Self {
        self.error = true;
        self
    }
}

impl CatalogItem for CardsetInfo {
    type Key = usize;

    fn key(&self) -> usize {
        self.index
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Display names of style and nationality ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardsetAttributeNames {
    pub styles: Vec<(u16, String)>,
    pub nationalities: Vec<(u16, String)>,
}

/// Builds the cardset catalog: cardsets that failed to load are dropped, the
/// rest sorted by name.
pub fn cardset_catalog(cardsets: impl IntoIterator<Item = CardsetInfo>) -> Catalog<CardsetInfo> {
    let mut cardsets: Vec<_> = cardsets.into_iter().filter(|cs| !cs.error).collect();
    cardsets.sort_by_cached_key(|cs| (cs.name.to_lowercase(), cs.index));
    Catalog::new(cardsets)
}

fn by_type(catalog: &Catalog<CardsetInfo>) -> BranchSpec<CardsetInfo> {
    let mut types: Vec<_> = CardsetType::ALL
        .into_iter()
        .filter(|&ty| catalog.iter().any(|cs| cs.cardset_type == ty))
        .collect();
    types.sort_by_key(|ty| ty.label());
    BranchSpec::group(
        "by Type",
        types.into_iter().map(|ty| {
            BranchSpec::filter(ty.label(), move |cs: &CardsetInfo| cs.cardset_type == ty)
        }),
    )
    .expanded(true)
}

/// A group with one entry per attribute value in use, sorted by name, plus
/// "Uncategorized" when some cardset has no value at all.
fn by_attribute(
    label: &str,
    catalog: &Catalog<CardsetInfo>,
    names: &[(u16, String)],
    values: fn(&CardsetInfo) -> &[u16],
) -> BranchSpec<CardsetInfo> {
    let mut used: Vec<_> = names
        .iter()
        .filter(|(id, _)| catalog.iter().any(|cs| values(cs).contains(id)))
        .collect();
    used.sort_by(|a, b| a.1.cmp(&b.1));
    let mut entries: Vec<_> = used
        .into_iter()
        .map(|(id, name)| {
            let id = *id;
            BranchSpec::filter(name.as_str(), move |cs: &CardsetInfo| values(cs).contains(&id))
        })
        .collect();
    if !entries.is_empty() && catalog.iter().any(|cs| values(cs).is_empty()) {
        entries.push(BranchSpec::filter("Uncategorized", move |cs: &CardsetInfo| {
            values(cs).is_empty()
        }));
    }
    BranchSpec::group(label, entries)
}

fn date_names(catalog: &Catalog<CardsetInfo>) -> Vec<(u16, String)> {
    let mut centuries: Vec<u16> = catalog.iter().flat_map(|cs| cs.dates.iter().copied()).collect();
    centuries.sort_unstable();
    centuries.dedup();
    centuries
        .into_iter()
        .map(|century| (century, format!("{century}00 - {century}99")))
        .collect()
}

/// Builds the category hierarchy of the cardset selection dialog.
pub fn cardset_tree(
    catalog: Catalog<CardsetInfo>,
    names: &CardsetAttributeNames,
    config: &SelectTreeConfig,
) -> SelectTree<CardsetInfo> {
    let sizes = CardsetSize::ALL.into_iter().map(|size| {
        BranchSpec::filter(size.label(), move |cs: &CardsetInfo| cs.size == size)
    });
    let dates = date_names(&catalog);
    let specs = [
        BranchSpec::all("All Cardsets").expanded(catalog.len() <= EXPANDED_ALL_LIMIT),
        BranchSpec::group("by Size", sizes).expanded(true),
        by_type(&catalog),
        by_attribute("by Style", &catalog, &names.styles, |cs| cs.styles.as_slice()),
        by_attribute("by Date", &catalog, &dates, |cs| cs.dates.as_slice()),
        by_attribute(
            "by Nationality",
            &catalog,
            &names.nationalities,
            |cs| cs.nationalities.as_slice(),
        ),
    ];
    SelectTree::build(catalog, specs, config)
}

/// Builds the reduced tree used when only the deck type matters.
pub fn cardset_by_type_tree(
    catalog: Catalog<CardsetInfo>,
    config: &SelectTreeConfig,
) -> SelectTree<CardsetInfo> {
    let spec = by_type(&catalog);
    SelectTree::build(catalog, [spec], config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeModel;

    const ABSTRACT: u16 = 35;
    const CLASSIC: u16 = 7;
    const FRANCE: u16 = 1004;

    fn cardsets() -> Vec<CardsetInfo> {
        vec![
            CardsetInfo::new(3, "Standard", CardsetSize::Medium)
                .with_styles([CLASSIC])
                .with_nationalities([FRANCE])
                .with_dates([19]),
            CardsetInfo::new(5, "Dondorf", CardsetSize::Large)
                .with_styles([CLASSIC, ABSTRACT])
                .with_dates([18]),
            CardsetInfo::new(7, "Kintengu", CardsetSize::Small).with_type(CardsetType::Hanafuda),
            CardsetInfo::new(9, "Broken", CardsetSize::Tiny).with_error(),
        ]
    }

    fn names() -> CardsetAttributeNames {
        CardsetAttributeNames {
            styles: vec![
                (CLASSIC, "Classic Look".to_owned()),
                (ABSTRACT, "Abstract".to_owned()),
                (1, "Adult".to_owned()),
            ],
            nationalities: vec![(FRANCE, "France".to_owned())],
        }
    }

    fn labels(tree: &SelectTree<CardsetInfo>, ids: &[crate::NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| tree.text(id))
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn errored_cardsets_are_not_listed() {
        let catalog = cardset_catalog(cardsets());

        let names: Vec<_> = catalog.iter().map(|cs| cs.name.as_str()).collect();
        assert_eq!(names, vec!["Dondorf", "Kintengu", "Standard"]);
        assert!(!catalog.contains(&9));
    }

    #[test]
    fn groups_list_used_values_and_uncategorized() {
        let tree = cardset_tree(cardset_catalog(cardsets()), &names(), &SelectTreeConfig::default());

        let all = tree.find_branch(&["All Cardsets"]).unwrap();
        assert!(tree.is_expanded(all));
        let style = tree.find_branch(&["by Style"]).unwrap();
        assert_eq!(
            labels(&tree, tree.children(style)),
            vec!["Abstract", "Classic Look", "Uncategorized"]
        );
        let date = tree.find_branch(&["by Date"]).unwrap();
        assert_eq!(
            labels(&tree, tree.children(date)),
            vec!["1800 - 1899", "1900 - 1999", "Uncategorized"]
        );
        let kind = tree.find_branch(&["by Type"]).unwrap();
        assert!(tree.is_expanded(kind));
        assert_eq!(
            labels(&tree, tree.children(kind)),
            vec!["French type (52-54 cards)", "Hanafuda type (48 cards)"]
        );
        let uncategorized = tree.find_branch(&["by Nationality", "Uncategorized"]).unwrap();
        assert_eq!(
            labels(&tree, tree.children(uncategorized)),
            vec!["Dondorf", "Kintengu"]
        );
    }

    #[test]
    fn empty_size_shows_placeholder() {
        let config = SelectTreeConfig::default().with_no_items_label("(no cardsets)");
        let tree = cardset_tree(cardset_catalog(cardsets()), &names(), &config);
        let tiny = tree.find_branch(&["by Size", "Tiny cardsets"]).unwrap();

        assert_eq!(labels(&tree, tree.children(tiny)), vec!["(no cardsets)"]);
    }

    #[test]
    fn by_type_tree_has_a_single_root() {
        let tree = cardset_by_type_tree(cardset_catalog(cardsets()), &SelectTreeConfig::default());

        assert_eq!(labels(&tree, tree.roots()), vec!["by Type"]);
    }
}
