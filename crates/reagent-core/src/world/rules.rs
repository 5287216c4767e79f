//! Per-cell rule evaluation: react, else fall, else spread

use crate::simulation::Substances;
use crate::world::{SimStats, WorldRng};

use super::ca_update::CellularAutomataUpdater;
use super::chemistry_system::ChemistrySystem;
use super::grid::Grid;

/// One directional sweep of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Rows visited bottom to top; evaluates sinking (positive density) substances
    Upward,
    /// Rows visited top to bottom; evaluates rising (negative density) substances
    Downward,
}

impl Pass {
    /// Whether a substance of `density` is evaluated during this pass.
    /// Density zero is never evaluated.
    pub fn evaluates(self, density: i32) -> bool {
        match self {
            Pass::Upward => density > 0,
            Pass::Downward => density < 0,
        }
    }
}

/// Cell rule evaluator
pub struct CellRules;

impl CellRules {
    /// Evaluate the cell at (x, y) for `pass`.
    ///
    /// Returns true when the cell was handled: a reaction fired or a swap was
    /// requested (including one refused by move tracking).
    #[allow(clippy::too_many_arguments)]
    pub fn update_cell<R: WorldRng>(
        grid: &mut Grid,
        substances: &Substances,
        x: i32,
        y: i32,
        pass: Pass,
        gravity: u32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let cell = grid.get(x, y);
        if cell.is_empty() {
            return false;
        }

        let def = substances.get(cell.substance);
        if !pass.evaluates(def.density) {
            return false;
        }

        if ChemistrySystem::check_cell_reactions(grid, substances, x, y, stats) {
            return true;
        }

        if CellularAutomataUpdater::fall(grid, substances, x, y, gravity, stats) {
            return true;
        }

        CellularAutomataUpdater::spread(grid, substances, x, y, def.spread_rate, stats, rng)
    }
}
