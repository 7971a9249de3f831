//! The five swept axes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    DictionarySize,
    GridSize,
    WordLength,
    GridWordLength,
    BlankProbability,
}

impl DimensionKind {
    /// Manifest order. Results are re-segmented in this same order.
    pub const ALL: [DimensionKind; 5] = [
        DimensionKind::DictionarySize,
        DimensionKind::GridSize,
        DimensionKind::WordLength,
        DimensionKind::GridWordLength,
        DimensionKind::BlankProbability,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DimensionKind::DictionarySize => "dictionary_size",
            DimensionKind::GridSize => "grid_size",
            DimensionKind::WordLength => "word_length",
            DimensionKind::GridWordLength => "grid_word_length",
            DimensionKind::BlankProbability => "blank_probability",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            DimensionKind::DictionarySize => "Dictionary size",
            DimensionKind::GridSize => "Grid size",
            DimensionKind::WordLength => "Dictionary word length",
            DimensionKind::GridWordLength => "Grid word length",
            DimensionKind::BlankProbability => "Blank symbol probability",
        }
    }

    /// Whether charts of this axis start from a synthetic (0, 0) point.
    pub fn anchored_at_origin(&self) -> bool {
        matches!(
            self,
            DimensionKind::DictionarySize | DimensionKind::GridSize
        )
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for kind in DimensionKind::ALL {
            assert_eq!(DimensionKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(DimensionKind::from_slug("nope"), None);
    }

    #[test]
    fn only_size_axes_are_anchored() {
        let anchored: Vec<_> = DimensionKind::ALL
            .into_iter()
            .filter(DimensionKind::anchored_at_origin)
            .collect();
        assert_eq!(
            anchored,
            vec![DimensionKind::DictionarySize, DimensionKind::GridSize]
        );
    }
}
