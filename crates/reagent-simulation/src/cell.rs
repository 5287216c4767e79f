//! Cell type stored in every grid position

use crate::SubstanceId;
use serde::{Deserialize, Serialize};

/// A single grid cell
///
/// Only the substance id is stored; density, spread rate and reactions are
/// looked up in [`crate::Substances`].
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Substance id (0 = air)
    pub substance: u16,
    /// Per-tick state flags
    pub flags: u16,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        substance: SubstanceId::AIR,
        flags: 0,
    };

    pub fn new(substance: u16) -> Self {
        Self {
            substance,
            flags: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.substance == SubstanceId::AIR
    }

    pub fn has_moved(&self) -> bool {
        self.flags & cell_flags::MOVED != 0
    }
}

/// Flag bits for cell state
pub mod cell_flags {
    pub const MOVED: u16 = 1 << 0; // Already moved this tick
}
