//! # RGB Framebuffer Canvas
//!
//! An owned RGB888 framebuffer that implements the embedded-graphics
//! [`DrawTarget`] contract, so panels are drawn with the same primitives
//! (rectangles, lines, mono-font text) regardless of where the pixels end
//! up. The finished buffer is persisted as a PNG for the display host to
//! pick up.
//!
//! Out-of-bounds pixels are silently clipped; drawing never fails.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;
use std::convert::Infallible;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failures while persisting the finished framebuffer.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Output directory could not be created
    #[error("could not create output directory: {0}")]
    Dir(#[from] std::io::Error),

    /// PNG encoding or writing failed
    #[error("PNG write failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Fixed-size RGB888 framebuffer. 3 bytes per pixel, row-major.
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[background.r(), background.g(), background.b()]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write the framebuffer as a PNG, creating the parent directory if
    /// needed. Writing is atomic from the display host's point of view only
    /// insofar as a failure here leaves any previous file untouched.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), CanvasError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = ((point.y as u32 * self.width + point.x as u32) * 3) as usize;
                self.data[index] = color.r();
                self.data[index + 1] = color.g();
                self.data[index + 2] = color.b();
            }
        }
        Ok(())
    }
}
