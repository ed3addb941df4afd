//! Physical-to-pixel mapping and the frame boundary
//!
//! The rendered image is centered on the physical origin with +y pointing up,
//! so pixel coordinates are
//!   px = x * s + W / 2
//!   py = -y * s + H / 2
//! with `s = image_width / world_width`. The image edges double as the walls
//! bodies bounce off during the wall pass.

use super::states::Body;
use super::vector::{vec2, NVec3, VectorExt};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub image_width: u32,  // pixels
    pub image_height: u32, // pixels
    pub world_width: f64,  // physical width visible across the image
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            image_width: 1920,
            image_height: 1080,
            world_width: 200.0,
        }
    }
}

impl Frame {
    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(Error::config("frame dimensions must be > 0"));
        }
        if !self.world_width.is_finite() || self.world_width <= 0.0 {
            return Err(Error::config("world_width must be finite and > 0"));
        }
        Ok(())
    }

    /// Pixels per physical unit
    #[inline]
    pub fn scale(&self) -> f64 {
        self.image_width as f64 / self.world_width
    }

    /// Physical height that keeps the image aspect ratio
    pub fn world_height(&self) -> f64 {
        self.world_width / self.image_width as f64 * self.image_height as f64
    }

    pub fn width_px(&self) -> f64 {
        self.image_width as f64
    }

    pub fn height_px(&self) -> f64 {
        self.image_height as f64
    }

    /// Physical position to pixel position (z dropped)
    pub fn to_pixel(&self, x: &NVec3) -> NVec3 {
        let a = x * self.scale();
        vec2(a.x + self.width_px() / 2.0, -a.y + self.height_px() / 2.0)
    }

    /// Physical length to pixels
    #[inline]
    pub fn len_to_pixel(&self, d: f64) -> f64 {
        d * self.scale()
    }

    /// Pixel length to physical length
    #[inline]
    pub fn len_to_world(&self, d: f64) -> f64 {
        d / self.scale()
    }

    /// Bounce `body` off any image edge it penetrates
    ///
    /// Each axis is checked on its own and both may fire in the same step.
    /// A hit flips that velocity component, scales the whole velocity by the
    /// body's elasticity and moves the body back so it touches the edge.
    /// Like the pairwise collision response this is planar: a bounce drops
    /// any z velocity.
    /// Returns the number of edges hit (0, 1 or 2).
    pub fn resolve_walls(&self, body: &mut Body) -> u32 {
        let p = self.to_pixel(&body.x);
        let r = self.len_to_pixel(body.radius);
        let (w, h) = (self.width_px(), self.height_px());
        let mut hits = 0;

        // left / right
        if p.x - r < 0.0 {
            body.v = body.v.element_product(&vec2(-1.0, 1.0)) * body.e;
            body.x.x += self.len_to_world(r - p.x);
            hits += 1;
        } else if p.x + r > w {
            body.v = body.v.element_product(&vec2(-1.0, 1.0)) * body.e;
            body.x.x -= self.len_to_world(p.x + r - w);
            hits += 1;
        }

        // top / bottom, pixel y grows downward
        if p.y - r < 0.0 {
            body.v = body.v.element_product(&vec2(1.0, -1.0)) * body.e;
            body.x.y -= self.len_to_world(r - p.y);
            hits += 1;
        } else if p.y + r > h {
            body.v = body.v.element_product(&vec2(1.0, -1.0)) * body.e;
            body.x.y += self.len_to_world(p.y + r - h);
            hits += 1;
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame { image_width: 200, image_height: 100, world_width: 20.0 }
    }

    #[test]
    fn origin_maps_to_image_center() {
        let p = frame().to_pixel(&NVec3::zeros());
        assert_eq!(p, vec2(100.0, 50.0));
    }

    #[test]
    fn y_axis_is_inverted() {
        let p = frame().to_pixel(&vec2(0.0, 1.0));
        assert!((p.y - 40.0).abs() < 1e-12);
    }

    #[test]
    fn world_height_keeps_aspect() {
        assert!((frame().world_height() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_frame_rejected() {
        assert!(Frame { image_width: 0, ..frame() }.validate().is_err());
        assert!(Frame { world_width: 0.0, ..frame() }.validate().is_err());
        assert!(frame().validate().is_ok());
    }
}
