//! CPU-based pixel buffer renderer for PNG frame capture
//!
//! Renders the grid to an RGBA buffer, one `cell_size` square per cell.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};
use reagent_core::world::{Frame, FrameSink};

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixels per cell side
    pub cell_size: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a renderer for a grid of `grid_width` x `grid_height` cells
    pub fn new(grid_width: usize, grid_height: usize, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1) as usize;
        let width = grid_width * cell_size;
        let height = grid_height * cell_size;

        Self {
            width,
            height,
            cell_size,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// Paint every cell of the frame into the buffer
    pub fn render(&mut self, frame: &Frame<'_>) {
        let grid_width = self.width / self.cell_size;
        let grid_height = self.height / self.cell_size;

        for cell_y in 0..grid_height.min(frame.grid.height()) {
            for cell_x in 0..grid_width.min(frame.grid.width()) {
                let color = frame.color_at(cell_x as i32, cell_y as i32);
                self.fill_cell(cell_x, cell_y, color);
            }
        }
    }

    fn fill_cell(&mut self, cell_x: usize, cell_y: usize, color: [u8; 4]) {
        for dy in 0..self.cell_size {
            let y = cell_y * self.cell_size + dy;
            let row_start = (y * self.width + cell_x * self.cell_size) * 4;

            for pixel in self.buffer[row_start..row_start + self.cell_size * 4].chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }

    /// RGBA color at an image pixel
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.buffer[idx],
            self.buffer[idx + 1],
            self.buffer[idx + 2],
            self.buffer[idx + 3],
        ]
    }

    /// Save the buffer as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;

        img.save(path)
            .with_context(|| format!("Failed to write frame: {}", path.display()))?;
        Ok(())
    }
}

/// Writes each presented frame as `frame_NNNNNN.png` into a directory
pub struct PngSequence {
    directory: PathBuf,
    cell_size: u32,
    renderer: Option<PixelRenderer>,
    frames_written: usize,
}

impl PngSequence {
    pub fn new(directory: impl AsRef<Path>, cell_size: u32) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create frame directory: {}", directory.display())
        })?;

        Ok(Self {
            directory,
            cell_size,
            renderer: None,
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl FrameSink for PngSequence {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let cell_size = self.cell_size;
        let renderer = self.renderer.get_or_insert_with(|| {
            PixelRenderer::new(frame.grid.width(), frame.grid.height(), cell_size)
        });
        renderer.render(frame);

        let path = self
            .directory
            .join(format!("frame_{:06}.png", frame.overlay.tick));
        renderer.save_png(&path)?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::info!(
            "Wrote {} frames to {}",
            self.frames_written,
            self.directory.display()
        );
        Ok(())
    }
}
