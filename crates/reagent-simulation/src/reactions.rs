//! Pairwise reaction rules

use serde::{Deserialize, Serialize};

/// Upper bound on reactions a single substance may define
pub const MAX_REACTIONS: usize = 3;

/// A reaction owned by a substance
///
/// When a vertical neighbor holds `reactant`, the owning cell becomes
/// `product` and the neighbor becomes `by_product`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub reactant: u16,
    pub product: u16,
    pub by_product: u16,
}

impl Reaction {
    pub const fn new(reactant: u16, product: u16, by_product: u16) -> Self {
        Self {
            reactant,
            product,
            by_product,
        }
    }

    /// All substance ids this reaction refers to
    pub fn referenced_ids(&self) -> [u16; 3] {
        [self.reactant, self.product, self.by_product]
    }
}
