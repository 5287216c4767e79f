//! Update scheduler - two directional sweeps per tick with alternating scan direction

use crate::simulation::Substances;
use crate::world::{SimStats, WorldRng};

use super::grid::Grid;
use super::rules::{CellRules, Pass};

/// Drives full-grid sweeps and remembers the horizontal scan direction
#[derive(Debug, Clone)]
pub struct Scheduler {
    tick: u64,
    left_to_right: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tick: 0,
            left_to_right: true,
        }
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Horizontal direction of the next tick's rows
    pub fn left_to_right(&self) -> bool {
        self.left_to_right
    }

    /// Run one tick: the upward pass, then the downward pass.
    ///
    /// Coordinates are visited in a fixed order regardless of swaps made
    /// during the pass, so a moved substance may be evaluated again if it
    /// lands ahead of the cursor.
    pub fn run_tick<R: WorldRng>(
        &mut self,
        grid: &mut Grid,
        substances: &Substances,
        gravity: u32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        if grid.tracks_moved() {
            grid.clear_moved();
        }

        for pass in [Pass::Upward, Pass::Downward] {
            let positions =
                scan_positions(pass, self.left_to_right, grid.width(), grid.height());
            for (x, y) in positions {
                CellRules::update_cell(grid, substances, x, y, pass, gravity, stats, rng);
            }
        }

        self.left_to_right = !self.left_to_right;
        self.tick += 1;
    }
}

/// Visit order for one pass: rows bottom to top for [`Pass::Upward`] and top
/// to bottom for [`Pass::Downward`], each row in the given horizontal direction
pub fn scan_positions(
    pass: Pass,
    left_to_right: bool,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (i32, i32)> {
    (0..height).flat_map(move |row| {
        let y = match pass {
            Pass::Upward => height - 1 - row,
            Pass::Downward => row,
        };

        (0..width).map(move |column| {
            let x = if left_to_right {
                column
            } else {
                width - 1 - column
            };
            (x as i32, y as i32)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SubstanceId;
    use crate::world::test_rng::TestRng;
    use crate::world::{GridSize, NoopStats, TickStats};

    #[test]
    fn test_upward_scan_order() {
        let positions: Vec<_> = scan_positions(Pass::Upward, true, 2, 2).collect();
        assert_eq!(positions, vec![(0, 1), (1, 1), (0, 0), (1, 0)]);
    }

    #[test]
    fn test_downward_scan_order_right_to_left() {
        let positions: Vec<_> = scan_positions(Pass::Downward, false, 3, 2).collect();
        assert_eq!(
            positions,
            vec![(2, 0), (1, 0), (0, 0), (2, 1), (1, 1), (0, 1)]
        );
    }

    #[test]
    fn test_empty_grid_scan() {
        assert_eq!(scan_positions(Pass::Upward, true, 0, 5).count(), 0);
        assert_eq!(scan_positions(Pass::Downward, true, 5, 0).count(), 0);
    }

    #[test]
    fn test_tick_flips_direction() {
        let substances = Substances::new();
        let mut grid = Grid::new(GridSize::new(4, 4));
        let mut scheduler = Scheduler::new();
        let mut rng = TestRng::new(true);

        assert!(scheduler.left_to_right());
        scheduler.run_tick(&mut grid, &substances, 3, &mut NoopStats, &mut rng);
        assert!(!scheduler.left_to_right());
        assert_eq!(scheduler.tick(), 1);
        scheduler.run_tick(&mut grid, &substances, 3, &mut NoopStats, &mut rng);
        assert!(scheduler.left_to_right());
        assert_eq!(scheduler.tick(), 2);
    }

    #[test]
    fn test_falling_cell_moves_once_per_tick() {
        // Bottom-to-top sweep: a falling cell lands on a row already visited
        let substances = Substances::new();
        let mut grid = Grid::new(GridSize::new(1, 5));
        let mut scheduler = Scheduler::new();
        let mut rng = TestRng::new(true);
        let mut stats = TickStats::default();
        grid.set_substance(0, 0, SubstanceId::SALT);

        scheduler.run_tick(&mut grid, &substances, 1, &mut stats, &mut rng);

        assert_eq!(grid.substance(0, 1), SubstanceId::SALT);
        assert_eq!(stats.cells_moved, 1);
    }

    #[test]
    fn test_rising_cell_moves_once_per_tick() {
        let substances = Substances::new();
        let mut grid = Grid::new(GridSize::new(1, 5));
        let mut scheduler = Scheduler::new();
        let mut rng = TestRng::new(true);
        let mut stats = TickStats::default();
        grid.set_substance(0, 4, SubstanceId::HYDROGEN);

        scheduler.run_tick(&mut grid, &substances, 1, &mut stats, &mut rng);

        assert_eq!(grid.substance(0, 3), SubstanceId::HYDROGEN);
        assert_eq!(stats.cells_moved, 1);
    }

    #[test]
    fn test_move_tracking_cleared_each_tick() {
        let substances = Substances::new();
        let mut grid = Grid::new(GridSize::new(1, 4)).with_move_tracking(true);
        let mut scheduler = Scheduler::new();
        let mut rng = TestRng::new(true);
        grid.set_substance(0, 0, SubstanceId::SALT);

        scheduler.run_tick(&mut grid, &substances, 1, &mut NoopStats, &mut rng);
        assert_eq!(grid.substance(0, 1), SubstanceId::SALT);

        scheduler.run_tick(&mut grid, &substances, 1, &mut NoopStats, &mut rng);
        assert_eq!(grid.substance(0, 2), SubstanceId::SALT);
    }
}
