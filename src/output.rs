//! PNG export for finished renders.
//!
//! The framebuffer already holds display-ready RGBA8 (gamma-corrected and
//! quantized by the renderer), so saving is a straight byte copy into a
//! PNG encoder.

use emberpath::framebuffer::Framebuffer;
use image::RgbaImage;
use log::{info, warn};

/// Save the current framebuffer contents as a PNG file.
///
/// Returns false (after logging a warning) if encoding or file I/O fails.
pub fn save_framebuffer_as_png(frame: &Framebuffer, output_path: &str) -> bool {
    let image = RgbaImage::from_raw(frame.width(), frame.height(), frame.snapshot())
        .expect("framebuffer snapshot is exactly width * height * 4 bytes");

    match image.save(output_path) {
        Ok(()) => {
            info!("Image saved as {}", output_path);
            true
        }
        Err(e) => {
            warn!("Failed to save image: {}", e);
            false
        }
    }
}
