//! World - owns the grid, registry, scheduler and brush

use anyhow::{Result, ensure};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::entity::{Brush, InputIntent};
use crate::simulation::{SubstanceId, Substances};
use crate::world::{SimStats, WorldRng};

use super::frame::{Frame, Overlay};
use super::grid::{Grid, GridSize};
use super::scheduler::Scheduler;

/// Cells searched per fall
pub const DEFAULT_GRAVITY: u32 = 3;

/// Largest accepted gravity
pub const MAX_GRAVITY: u32 = 64;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: u32,
    /// Refuse swaps involving a cell that already moved this tick
    pub track_moved: bool,
    /// Fixed seed for reproducible spread directions
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            track_moved: false,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.gravity <= MAX_GRAVITY,
            "gravity {} is out of range, at most {} allowed",
            self.gravity,
            MAX_GRAVITY
        );
        Ok(())
    }
}

/// The whole simulation state
pub struct World {
    grid: Grid,
    substances: Substances,
    scheduler: Scheduler,
    brush: Brush,
    config: SimulationConfig,
    /// Last known cursor position in cell coordinates
    cursor: Option<(i32, i32)>,
    rng: Xoshiro256StarStar,
}

impl World {
    pub fn new(size: GridSize, substances: Substances, mut config: SimulationConfig) -> Self {
        if config.gravity > MAX_GRAVITY {
            log::warn!("Gravity {} clamped to {}", config.gravity, MAX_GRAVITY);
            config.gravity = MAX_GRAVITY;
        }

        let mut brush = Brush::default();
        if !substances.contains(brush.selected) {
            brush.cycle(1, substances.len());
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "World {}x{} with {} substances (gravity {}, seed {})",
            size.width,
            size.height,
            substances.len(),
            config.gravity,
            seed
        );

        Self {
            grid: Grid::new(size).with_move_tracking(config.track_moved),
            substances,
            scheduler: Scheduler::new(),
            brush,
            config,
            cursor: None,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Run one tick using the world's own RNG
    pub fn step(&mut self, stats: &mut dyn SimStats) {
        self.scheduler.run_tick(
            &mut self.grid,
            &self.substances,
            self.config.gravity,
            stats,
            &mut self.rng,
        );
    }

    /// Run one tick with an external RNG
    pub fn step_with_rng<R: WorldRng>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        self.scheduler.run_tick(
            &mut self.grid,
            &self.substances,
            self.config.gravity,
            stats,
            rng,
        );
    }

    /// Apply one tick's input: selection, then brush size, then at most one
    /// of paint, erase or reset
    pub fn apply_input(&mut self, intent: &InputIntent) {
        if intent.cursor.is_some() {
            self.cursor = intent.cursor;
        }

        if let Some(id) = intent.select {
            self.brush.select(id, &self.substances);
        }
        if intent.cycle != 0 {
            self.brush.cycle(intent.cycle, self.substances.len());
        }
        if intent.brush_delta != 0 {
            self.brush.resize(intent.brush_delta);
        }

        if intent.paint {
            if let Some((x, y)) = self.cursor {
                self.paint(x, y, self.brush.selected);
            }
        } else if intent.erase {
            if let Some((x, y)) = self.cursor {
                self.paint(x, y, SubstanceId::AIR);
            }
        } else if intent.reset {
            self.reset();
        }
    }

    /// Fill the brush square around (x, y); parts outside the grid are dropped.
    /// Ids missing from the registry are ignored.
    pub fn paint(&mut self, x: i32, y: i32, substance: u16) {
        if !self.substances.contains(substance) {
            log::warn!("Ignoring paint with unknown substance {}", substance);
            return;
        }
        self.grid.fill_region(x, y, self.brush.radius, substance);
    }

    /// Clear the grid back to air
    pub fn reset(&mut self) {
        log::info!("Resetting grid at tick {}", self.scheduler.tick());
        self.grid.reset_all(SubstanceId::AIR);
    }

    /// Display color at (x, y), `None` outside the grid
    pub fn color_at(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.grid
            .in_bounds(x, y)
            .then(|| self.grid.color_at(x, y, &self.substances))
    }

    /// Substance at (x, y), `None` outside the grid
    pub fn substance_at(&self, x: i32, y: i32) -> Option<u16> {
        self.grid
            .in_bounds(x, y)
            .then(|| self.grid.substance(x, y))
    }

    pub fn overlay(&self) -> Overlay {
        let hovered = self
            .cursor
            .and_then(|(x, y)| self.substance_at(x, y));

        Overlay {
            tick: self.scheduler.tick(),
            selected: self.brush.selected,
            selected_name: self.substances.name(self.brush.selected).to_string(),
            hovered,
            hovered_name: hovered.map(|id| self.substances.name(id).to_string()),
            brush_radius: self.brush.radius,
        }
    }

    /// Read-only snapshot for renderers
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            grid: &self.grid,
            substances: &self.substances,
            overlay: self.overlay(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.scheduler.tick()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn substances(&self) -> &Substances {
        &self.substances
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
