//! Scripted input and post-run verification loaded from RON files

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::entity::{InputIntent, InputSource};
use crate::simulation::SubstanceId;
use crate::world::World;

/// Top-level scenario definition loaded from RON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Actions turned into per-tick input
    pub actions: Vec<ScenarioAction>,

    /// Verification checks to run after the scenario
    #[serde(default)]
    pub verify: Vec<VerificationCondition>,
}

impl ScenarioDefinition {
    /// Load scenario from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let scenario = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON scenario: {}", path.display()))?;

        Ok(scenario)
    }

    /// Save scenario to RON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize scenario to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write scenario file: {}", path.as_ref().display())
        })?;

        Ok(())
    }

    /// Ticks of input the actions produce
    pub fn duration(&self) -> usize {
        ScriptedInput::new(&self.actions).remaining()
    }

    /// Evaluate every verification condition against the world
    pub fn verify(&self, world: &World) -> Vec<VerificationResult> {
        self.verify
            .iter()
            .map(|condition| condition.evaluate(world))
            .collect()
    }
}

fn one_tick() -> u32 {
    1
}

/// A scripted input step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioAction {
    /// Select a substance by id
    Select { substance: u16 },

    /// Cycle the selection like a mouse wheel
    Cycle { steps: i32 },

    /// Grow or shrink the brush
    Brush { delta: i32 },

    /// Paint the selected substance at a cell for a number of ticks
    Paint {
        x: i32,
        y: i32,
        #[serde(default = "one_tick")]
        ticks: u32,
    },

    /// Erase around a cell for a number of ticks
    Erase {
        x: i32,
        y: i32,
        #[serde(default = "one_tick")]
        ticks: u32,
    },

    /// Clear the grid
    Reset,

    /// Let the simulation run without input
    Wait { ticks: u32 },

    /// Stop the run
    Quit,
}

/// Input source replaying scenario actions, one intent per tick
///
/// Selection, cycling and brush changes take no tick of their own; they are
/// folded into the next intent.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<InputIntent>,
}

impl ScriptedInput {
    pub fn new(actions: &[ScenarioAction]) -> Self {
        let mut queue = VecDeque::new();
        let mut pending = InputIntent::default();

        for action in actions {
            match action {
                ScenarioAction::Select { substance } => pending.select = Some(*substance),
                ScenarioAction::Cycle { steps } => pending.cycle += steps,
                ScenarioAction::Brush { delta } => pending.brush_delta += delta,
                ScenarioAction::Paint { x, y, ticks } => {
                    for _ in 0..*ticks {
                        let intent = InputIntent {
                            paint: true,
                            ..InputIntent::at(*x, *y)
                        };
                        queue.push_back(merge(std::mem::take(&mut pending), intent));
                    }
                }
                ScenarioAction::Erase { x, y, ticks } => {
                    for _ in 0..*ticks {
                        let intent = InputIntent {
                            erase: true,
                            ..InputIntent::at(*x, *y)
                        };
                        queue.push_back(merge(std::mem::take(&mut pending), intent));
                    }
                }
                ScenarioAction::Reset => {
                    let intent = InputIntent {
                        reset: true,
                        ..Default::default()
                    };
                    queue.push_back(merge(std::mem::take(&mut pending), intent));
                }
                ScenarioAction::Wait { ticks } => {
                    for _ in 0..*ticks {
                        queue.push_back(merge(std::mem::take(&mut pending), InputIntent::default()));
                    }
                }
                ScenarioAction::Quit => {
                    // Pending changes get their own tick, quit stops before the sweep
                    if !pending.is_idle() {
                        queue.push_back(std::mem::take(&mut pending));
                    }
                    queue.push_back(InputIntent {
                        quit: true,
                        ..Default::default()
                    });
                }
            }
        }

        if !pending.is_idle() {
            queue.push_back(pending);
        }

        Self { queue }
    }

    /// Intents left to replay
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Combine selection changes with an action intent
fn merge(pending: InputIntent, action: InputIntent) -> InputIntent {
    InputIntent {
        select: pending.select,
        cycle: pending.cycle,
        brush_delta: pending.brush_delta,
        ..action
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _tick: u64) -> InputIntent {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Region {
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
    }
}

/// Conditions that can be verified against world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationCondition {
    /// Assert the substance at a cell
    CellIs { x: i32, y: i32, expected: u16 },

    /// Assert how many cells hold a substance
    SubstanceCount {
        substance: u16,
        expected: usize,
        #[serde(default)]
        tolerance: usize, // Allow ±N variance
    },

    /// Assert a region (or the whole grid) holds only air
    Empty {
        #[serde(default)]
        region: Option<Region>,
    },
}

/// Result of a verification check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
}

impl VerificationCondition {
    /// Evaluate condition against world state
    pub fn evaluate(&self, world: &World) -> VerificationResult {
        let substances = world.substances();

        match self {
            VerificationCondition::CellIs { x, y, expected } => match world.substance_at(*x, *y) {
                Some(actual) => VerificationResult {
                    passed: actual == *expected,
                    message: format!(
                        "Cell ({}, {}): expected {}, got {}",
                        x,
                        y,
                        substances.name(*expected),
                        substances.name(actual)
                    ),
                },
                None => VerificationResult {
                    passed: false,
                    message: format!("Cell ({}, {}) is outside the grid", x, y),
                },
            },

            VerificationCondition::SubstanceCount {
                substance,
                expected,
                tolerance,
            } => {
                let actual = world.grid().count(*substance);
                let passed = actual >= expected.saturating_sub(*tolerance)
                    && actual <= expected.saturating_add(*tolerance);

                VerificationResult {
                    passed,
                    message: format!(
                        "{} count: expected {}±{}, got {}",
                        substances.name(*substance),
                        expected,
                        tolerance,
                        actual
                    ),
                }
            }

            VerificationCondition::Empty { region } => {
                let occupied = match region {
                    Some(region) => region
                        .cells()
                        .filter_map(|(x, y)| world.substance_at(x, y))
                        .filter(|id| *id != SubstanceId::AIR)
                        .count(),
                    None => world
                        .grid()
                        .cells()
                        .iter()
                        .filter(|cell| !cell.is_empty())
                        .count(),
                };

                VerificationResult {
                    passed: occupied == 0,
                    message: format!("Empty check: {} occupied cells", occupied),
                }
            }
        }
    }
}
