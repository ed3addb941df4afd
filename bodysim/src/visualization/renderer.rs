//! Rasterize snapshots into frame images
//!
//! `FrameRenderer` is the seam the render dispatcher calls. `PngRenderer` is
//! the stock implementation: a black background with one filled circle per
//! body, written as `<dir>/<frame:05>.png`.

use std::fs;
use std::path::PathBuf;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::simulation::frame::Frame;
use crate::simulation::states::Snapshot;

/// Turns one snapshot into one stored frame
///
/// Called from worker threads, each call with its own snapshot.
pub trait FrameRenderer: Send + Sync {
    fn render(&self, snapshot: &Snapshot) -> Result<PathBuf>;
}

/// File name for a frame index, zero-padded so a glob sorts in order
pub fn frame_file_name(frame: usize) -> String {
    format!("{frame:05}.png")
}

pub struct PngRenderer {
    pub frame: Frame,
    pub out_dir: PathBuf,
}

impl PngRenderer {
    /// Create the renderer and its output directory
    pub fn new(frame: Frame, out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(Self { frame, out_dir })
    }

    /// Draw a snapshot in memory
    pub fn rasterize(&self, snapshot: &Snapshot) -> RgbImage {
        let mut img = RgbImage::new(self.frame.image_width, self.frame.image_height);
        for body in &snapshot.bodies {
            let c = self.frame.to_pixel(&body.x);
            let r = self.frame.len_to_pixel(body.radius);
            fill_circle(&mut img, c.x, c.y, r, Rgb(body.color));
        }
        img
    }
}

impl FrameRenderer for PngRenderer {
    fn render(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let img = self.rasterize(snapshot);
        let path = self.out_dir.join(frame_file_name(snapshot.frame));
        img.save(&path).map_err(|e| Error::Render {
            frame: snapshot.frame,
            message: e.to_string(),
        })?;
        Ok(path)
    }
}

/// Fill every pixel whose center lies within `r` of (cx, cy), clipped to the image
fn fill_circle(img: &mut RgbImage, cx: f64, cy: f64, r: f64, color: Rgb<u8>) {
    if !(cx.is_finite() && cy.is_finite() && r.is_finite()) || r <= 0.0 {
        return;
    }
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x0 = ((cx - r).floor() as i64).max(0);
    let x1 = ((cx + r).ceil() as i64).min(w - 1);
    let y0 = ((cy - r).floor() as i64).max(0);
    let y1 = ((cy + r).ceil() as i64).min(h - 1);
    if x0 > x1 || y0 > y1 {
        return; // fully off-frame
    }

    let r2 = r * r;
    for py in y0..=y1 {
        let dy = py as f64 + 0.5 - cy;
        for px in x0..=x1 {
            let dx = px as f64 + 0.5 - cx;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_are_zero_padded() {
        assert_eq!(frame_file_name(0), "00000.png");
        assert_eq!(frame_file_name(1234), "01234.png");
        assert_eq!(frame_file_name(123456), "123456.png");
    }

    #[test]
    fn circle_is_clipped_at_edges() {
        let mut img = RgbImage::new(10, 10);
        fill_circle(&mut img, 0.0, 0.0, 3.0, Rgb([9, 9, 9]));
        assert_eq!(img.get_pixel(0, 0), &Rgb([9, 9, 9]));
        assert_eq!(img.get_pixel(9, 9), &Rgb([0, 0, 0]));
    }

    #[test]
    fn off_frame_circle_draws_nothing() {
        let mut img = RgbImage::new(10, 10);
        fill_circle(&mut img, -50.0, 500.0, 3.0, Rgb([9, 9, 9]));
        fill_circle(&mut img, f64::NAN, 5.0, 3.0, Rgb([9, 9, 9]));
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
