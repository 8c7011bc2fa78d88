//! Kerning pair generation from side-tagged groups.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::entities::Identifier;

/// One generated kerning pair. Ordering is lexicographic on (first, second).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KernPair {
    pub first: Identifier,
    pub second: Identifier,
}

impl KernPair {
    pub fn new(first: Identifier, second: Identifier) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for KernPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.second)
    }
}

/// Resolved group entry: the glyphs it stands for and the sides it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMember {
    pub identifier_sequence: Vec<Identifier>,
    pub include_as_first: bool,
    pub include_as_second: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairGroup {
    pub name: String,
    pub entries: Vec<PairMember>,
}

/// Expand groups into kerning pairs.
///
/// Per group, every distinct first-side glyph is paired with every distinct
/// second-side glyph. Groups are concatenated in order and duplicates across
/// groups are kept; see [`dedup_pairs`] for the opposite policy.
#[instrument(level = "debug", skip(groups), fields(groups = groups.len()))]
pub fn generate(groups: &[PairGroup]) -> Vec<KernPair> {
    let mut pairs = Vec::new();
    for group in groups {
        let first = side_tokens(group.entries.iter().filter(|e| e.include_as_first));
        let second = side_tokens(group.entries.iter().filter(|e| e.include_as_second));
        let before = pairs.len();
        pairs.extend(
            first
                .iter()
                .cartesian_product(second.iter())
                .map(|(a, b)| KernPair::new((*a).clone(), (*b).clone())),
        );
        debug!(
            "group {}: {} x {} -> {} pairs",
            group.name,
            first.len(),
            second.len(),
            pairs.len() - before
        );
    }
    pairs
}

/// Entries sorted by their token sequence, flattened, collapsed into a set.
fn side_tokens<'a>(entries: impl Iterator<Item = &'a PairMember>) -> BTreeSet<&'a Identifier> {
    entries
        .map(|entry| entry.identifier_sequence.as_slice())
        .sorted()
        .flatten()
        .collect()
}

/// Presentation order applied before persisting.
pub fn sort_pairs(pairs: &mut [KernPair]) {
    pairs.sort();
}

/// Drop repeated pairs, keeping the first occurrence of each.
pub fn dedup_pairs(pairs: Vec<KernPair>) -> Vec<KernPair> {
    pairs.into_iter().unique().collect()
}
