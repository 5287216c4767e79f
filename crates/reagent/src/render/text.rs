//! Text renderer - one glyph per cell plus an overlay line

use std::io::Write;

use anyhow::{Context, Result};
use reagent_core::simulation::{SubstanceId, Substances};
use reagent_core::world::{Frame, FrameSink};

/// Renders frames as plain text
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Glyph for a substance: `.` for air, otherwise the first letter of its name
    pub fn glyph(substances: &Substances, id: u16) -> char {
        if id == SubstanceId::AIR {
            return '.';
        }

        substances
            .name(id)
            .chars()
            .find(|c| c.is_ascii_alphanumeric())
            .unwrap_or('?')
    }

    /// Grid rows followed by the overlay status line
    pub fn render(&self, frame: &Frame<'_>) -> String {
        let grid = frame.grid;
        let mut out = String::with_capacity((grid.width() + 1) * grid.height() + 64);

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                out.push(Self::glyph(frame.substances, grid.substance(x, y)));
            }
            out.push('\n');
        }
        out.push_str(&frame.overlay.status_line());
        out.push('\n');
        out
    }
}

/// Writes text frames to any writer
pub struct TextSink<W: Write> {
    renderer: TextRenderer,
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            renderer: TextRenderer,
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for TextSink<W> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let text = self.renderer.render(frame);
        self.writer
            .write_all(text.as_bytes())
            .context("Failed to write text frame")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush text frames")
    }
}
