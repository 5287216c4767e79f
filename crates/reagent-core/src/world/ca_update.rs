//! Cellular automata update logic - density-driven fall and spread

use glam::IVec2;

use super::grid::{Grid, SwapOutcome};
use crate::simulation::Substances;
use crate::world::{SimStats, WorldRng};

/// Cellular automata updater - finds swap targets for a single cell
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Move a cell along its density bias (down when positive, up when negative).
    ///
    /// Distances are tried from `gravity` down to 1; at each distance the
    /// straight target comes first, then the +x diagonal, then the -x diagonal.
    /// Returns true if a swap was performed.
    pub fn fall(
        grid: &mut Grid,
        substances: &Substances,
        x: i32,
        y: i32,
        gravity: u32,
        stats: &mut dyn SimStats,
    ) -> bool {
        let density = substances.density(grid.substance(x, y));
        let dy = if density < 0 { -1 } else { 1 };

        for distance in (1..=reach(gravity, grid.height())).rev() {
            let Some(target_y) = y.checked_add(dy * distance) else {
                continue;
            };

            for dx in [0, distance, -distance] {
                let Some(target_x) = x.checked_add(dx) else {
                    continue;
                };
                if grid.in_bounds(target_x, target_y)
                    && Self::can_displace(
                        density,
                        substances.density(grid.substance(target_x, target_y)),
                    )
                {
                    return Self::try_move(grid, x, y, target_x, target_y, stats);
                }
            }
        }

        false
    }

    /// Move a cell sideways within its own row.
    ///
    /// One random direction is chosen per call. Distances are tried from
    /// `spread_rate` down to 1, the chosen side before the mirrored one.
    /// Returns true if a swap was performed.
    pub fn spread<R: WorldRng>(
        grid: &mut Grid,
        substances: &Substances,
        x: i32,
        y: i32,
        spread_rate: u32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> bool {
        let density = substances.density(grid.substance(x, y));
        if density == 0 {
            return false;
        }

        let direction = rng.gen_direction();

        for distance in (1..=reach(spread_rate, grid.width())).rev() {
            let offset = distance * direction;

            for target_x in [x.checked_add(offset), x.checked_sub(offset)]
                .into_iter()
                .flatten()
            {
                if grid.in_bounds(target_x, y)
                    && Self::can_displace(density, substances.density(grid.substance(target_x, y)))
                {
                    return Self::try_move(grid, x, y, target_x, y, stats);
                }
            }
        }

        false
    }

    /// Whether a substance of `density` may trade places with one of `target_density`
    ///
    /// Sinking substances displace anything strictly lighter, rising substances
    /// anything strictly heavier.
    pub fn can_displace(density: i32, target_density: i32) -> bool {
        if density < 0 {
            target_density > density
        } else {
            target_density < density
        }
    }

    /// Swap a cell into its target. Reports true even when move tracking
    /// refuses the swap, so the caller stops looking for another target.
    fn try_move(
        grid: &mut Grid,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        stats: &mut dyn SimStats,
    ) -> bool {
        match grid.try_swap(IVec2::new(from_x, from_y), IVec2::new(to_x, to_y)) {
            SwapOutcome::Swapped => stats.record_cell_moved(),
            SwapOutcome::Blocked => stats.record_blocked_swap(),
        }
        true
    }
}

/// Farthest offset worth searching along an axis of `extent` cells
fn reach(limit: u32, extent: usize) -> i32 {
    let limit = i32::try_from(limit).unwrap_or(i32::MAX);
    limit.min(i32::try_from(extent).unwrap_or(i32::MAX))
}
