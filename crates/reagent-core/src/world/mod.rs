//! World management - grid, update rules, scheduling

mod ca_update;
mod chemistry_system;
mod frame;
mod grid;
pub mod rng_trait;
mod rules;
mod scheduler;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use ca_update::CellularAutomataUpdater;
pub use chemistry_system::ChemistrySystem;
pub use frame::{Frame, FrameSink, Overlay};
pub use grid::{Grid, GridSize, SwapOutcome};
pub use rng_trait::WorldRng;
pub use rules::{CellRules, Pass};
pub use scheduler::{Scheduler, scan_positions};
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::{DEFAULT_GRAVITY, MAX_GRAVITY, SimulationConfig, World};
