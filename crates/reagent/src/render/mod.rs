//! Headless renderers for the once-per-tick frame

mod pixel;
mod text;

pub use pixel::{PixelRenderer, PngSequence};
pub use text::{TextRenderer, TextSink};

use std::path::Path;

use anyhow::Result;
use reagent_core::world::{Frame, FrameSink};

use crate::config::OutputFormat;

/// Sink that drops every frame
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}

/// Build the sink for an output format
pub fn create_sink(
    format: OutputFormat,
    directory: &Path,
    cell_size: u32,
) -> Result<Box<dyn FrameSink>> {
    Ok(match format {
        OutputFormat::Png => Box::new(PngSequence::new(directory, cell_size)?),
        OutputFormat::Text => Box::new(TextSink::new(std::io::stdout())),
        OutputFormat::None => Box::new(NullSink),
    })
}
