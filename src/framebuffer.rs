//! Shared output buffer for render workers.
//!
//! Pixels are RGBA8 packed into one `AtomicU32` each, row-major with row 0
//! at the top. Workers store finished pixels with relaxed ordering while a
//! display layer may concurrently read individual pixels or snapshot the
//! whole frame; per-pixel tearing is impossible because a pixel is a single
//! atomic word.

use std::sync::atomic::{AtomicU32, Ordering};

/// Opaque black, the state of every pixel before rendering.
const CLEAR: u32 = pack([0, 0, 0, 255]);

/// Pack RGBA bytes into a u32 so that little-endian byte order is R,G,B,A.
const fn pack(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Caller-owned RGBA8 pixel buffer filled in place by render workers.
#[derive(Debug)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl Framebuffer {
    /// Allocate a buffer of opaque black pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "framebuffer dimensions must be nonzero, got {width}x{height}"
        );
        let pixels = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(CLEAR))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Store one pixel. Row 0 is the top of the image.
    pub fn store(&self, x: u32, y: u32, rgba: [u8; 4]) {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index].store(pack(rgba), Ordering::Relaxed);
    }

    /// Read one pixel as it currently stands.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index].load(Ordering::Relaxed).to_le_bytes()
    }

    /// Reset every pixel to opaque black.
    pub fn clear(&self) {
        for pixel in &self.pixels {
            pixel.store(CLEAR, Ordering::Relaxed);
        }
    }

    /// Copy the current contents into a flat `R,G,B,A` byte vector,
    /// suitable for texture upload or image encoding.
    pub fn snapshot(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.load(Ordering::Relaxed).to_le_bytes());
        }
        bytes
    }
}
