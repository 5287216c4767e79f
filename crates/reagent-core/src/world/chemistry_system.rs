//! Chemistry system - pairwise reactions between vertical neighbors

use crate::simulation::{Reaction, Substances};
use crate::world::SimStats;

use super::grid::Grid;

/// Handles chemistry simulation: reactions triggered by vertical adjacency
pub struct ChemistrySystem;

impl ChemistrySystem {
    /// Fire `reaction` for the cell at (x, y) if its reactant sits directly
    /// below, or failing that directly above.
    ///
    /// The reacting cell becomes `product`, the matched neighbor becomes
    /// `by_product`. Returns true if the reaction fired.
    pub fn react(
        grid: &mut Grid,
        x: i32,
        y: i32,
        reaction: &Reaction,
        stats: &mut dyn SimStats,
    ) -> bool {
        for neighbor_y in [y + 1, y - 1] {
            if !grid.in_bounds(x, neighbor_y) {
                continue;
            }

            if grid.substance(x, neighbor_y) == reaction.reactant {
                log::trace!(
                    "Reaction at ({}, {}): {} + {} -> {} + {}",
                    x,
                    y,
                    grid.substance(x, y),
                    reaction.reactant,
                    reaction.product,
                    reaction.by_product
                );
                grid.set_substance(x, y, reaction.product);
                grid.set_substance(x, neighbor_y, reaction.by_product);
                stats.record_reaction();
                return true;
            }
        }

        false
    }

    /// Try every reaction of the cell's substance in table order, first match wins
    pub fn check_cell_reactions(
        grid: &mut Grid,
        substances: &Substances,
        x: i32,
        y: i32,
        stats: &mut dyn SimStats,
    ) -> bool {
        let substance = grid.substance(x, y);

        substances
            .reactions(substance)
            .iter()
            .any(|reaction| Self::react(grid, x, y, reaction, stats))
    }
}
