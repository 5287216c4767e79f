//! Per-tick input intents

use serde::{Deserialize, Serialize};

/// Everything the input collaborator asks for during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputIntent {
    // Pointer position in cell coordinates, may lie outside the grid
    pub cursor: Option<(i32, i32)>,

    // Substance selection
    pub select: Option<u16>,
    pub cycle: i32, // Wheel steps, positive moves to higher ids

    // Brush size change, clamped by the brush
    pub brush_delta: i32,

    // Actions (paint wins over erase, erase wins over reset)
    pub paint: bool,
    pub erase: bool,
    pub reset: bool,

    /// Stop after this tick
    pub quit: bool,
}

impl InputIntent {
    /// Intent with only a cursor position
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            cursor: Some((x, y)),
            ..Default::default()
        }
    }

    /// True if nothing but the cursor is set
    pub fn is_idle(&self) -> bool {
        self.select.is_none()
            && self.cycle == 0
            && self.brush_delta == 0
            && !self.paint
            && !self.erase
            && !self.reset
            && !self.quit
    }
}

/// Supplies one intent per tick, sampled at tick start
pub trait InputSource {
    fn poll(&mut self, tick: u64) -> InputIntent;
}

/// Input source that never asks for anything
#[derive(Debug, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _tick: u64) -> InputIntent {
        InputIntent::default()
    }
}
