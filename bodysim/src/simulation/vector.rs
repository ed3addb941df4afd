//! Vector type used for every physical quantity
//!
//! `NVec3` is an alias over nalgebra's `Vector3<f64>`, so `+`, `-`, scalar `*`,
//! `dot`, `cross` and `norm` all come from nalgebra and return new values.
//! This module adds the two operations nalgebra does not name the same way
//! (`element_product`, `normalize`) and gives normalization an explicit
//! degenerate case instead of dividing by zero

use nalgebra::Vector3;

pub type NVec3 = Vector3<f64>;

/// Build a vector from two components, z = 0
#[inline]
pub fn vec2(x: f64, y: f64) -> NVec3 {
    NVec3::new(x, y, 0.0)
}

/// Outcome of normalizing a vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeResult {
    Unit(NVec3), // unit vector in the same direction
    Degenerate,  // zero or non-finite length, no direction
}

impl NormalizeResult {
    /// The unit vector, if there is one
    pub fn unit(self) -> Option<NVec3> {
        match self {
            NormalizeResult::Unit(u) => Some(u),
            NormalizeResult::Degenerate => None,
        }
    }
}

/// Operations on top of nalgebra's vector API
pub trait VectorExt {
    /// Component-wise product
    fn element_product(&self, other: &NVec3) -> NVec3;

    /// Unit vector in the same direction, or `Degenerate` at zero length
    fn normalize_checked(&self) -> NormalizeResult;
}

impl VectorExt for NVec3 {
    #[inline]
    fn element_product(&self, other: &NVec3) -> NVec3 {
        self.component_mul(other)
    }

    fn normalize_checked(&self) -> NormalizeResult {
        let mag = self.norm();
        if mag == 0.0 || !mag.is_finite() {
            return NormalizeResult::Degenerate;
        }
        NormalizeResult::Unit(self / mag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_sets_z_to_zero() {
        let v = vec2(1.5, -2.0);
        assert_eq!(v, NVec3::new(1.5, -2.0, 0.0));
    }

    #[test]
    fn cross_of_planar_vectors_is_along_z() {
        let c = vec2(1.0, 0.0).cross(&vec2(0.0, 1.0));
        assert_eq!(c, NVec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn element_product_is_component_wise() {
        let v = NVec3::new(2.0, 3.0, 4.0).element_product(&NVec3::new(-1.0, 1.0, 0.5));
        assert_eq!(v, NVec3::new(-2.0, 3.0, 2.0));
    }

    #[test]
    fn normalize_zero_is_degenerate() {
        assert_eq!(NVec3::zeros().normalize_checked(), NormalizeResult::Degenerate);
        let inf = NVec3::new(f64::INFINITY, 0.0, 0.0);
        assert_eq!(inf.normalize_checked(), NormalizeResult::Degenerate);
    }

    #[test]
    fn normalize_has_unit_length() {
        let u = NVec3::new(3.0, 4.0, 0.0).normalize_checked().unit().unwrap();
        assert!((u.norm() - 1.0).abs() < 1e-12);
        assert!((u.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn arithmetic_leaves_operands_untouched() {
        let a = vec2(1.0, 2.0);
        let b = vec2(3.0, 5.0);
        let _ = a + b;
        let _ = a - b;
        let _ = a * 2.0;
        assert_eq!(a, vec2(1.0, 2.0));
        assert_eq!(b, vec2(3.0, 5.0));
    }
}
