//! Read-only frame handed to renderers once per tick

use crate::simulation::Substances;

use super::grid::Grid;

/// UI overlay values shown next to the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub tick: u64,
    pub selected: u16,
    pub selected_name: String,
    /// Substance under the cursor, if the cursor is over the grid
    pub hovered: Option<u16>,
    pub hovered_name: Option<String>,
    pub brush_radius: u32,
}

impl Overlay {
    /// Single status line, e.g. `tick 12 | selected H2O (l) | hovered Air (g) | brush 3`
    pub fn status_line(&self) -> String {
        let hovered = self.hovered_name.as_deref().unwrap_or("-");
        format!(
            "tick {} | selected {} | hovered {} | brush {}",
            self.tick, self.selected_name, hovered, self.brush_radius
        )
    }
}

/// Snapshot of the world after a sweep
pub struct Frame<'a> {
    pub grid: &'a Grid,
    pub substances: &'a Substances,
    pub overlay: Overlay,
}

impl Frame<'_> {
    /// Display color of the cell at (x, y)
    pub fn color_at(&self, x: i32, y: i32) -> [u8; 4] {
        self.grid.color_at(x, y, self.substances)
    }
}

/// Render collaborator, called once per tick after the sweep
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> anyhow::Result<()>;

    /// Called once after the last frame
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
