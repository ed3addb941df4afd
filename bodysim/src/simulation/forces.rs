//! External field accelerations
//!
//! Pairwise forces come from `Body::force_from` during the force pass. The
//! fields here act on each body on its own and are added during integration,
//! after every force and collision in the step is final.

use super::params::Fields;
use super::states::Body;
use super::vector::NVec3;

/// Field terms applied to every body during integration
///
/// Terms are summed in the order they were added; an empty set adds nothing.
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: append `term` and hand the set back
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Set holding the uniform field and the magnetic field from `fields`
    pub fn from_fields(fields: &Fields) -> Self {
        Self::new()
            .with(UniformField { g: fields.gravity_vec() })
            .with(MagneticField { b: fields.magnetic_vec() })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum of all field accelerations acting on `body`
    pub fn accumulate(&self, body: &Body) -> NVec3 {
        self.terms
            .iter()
            .fold(NVec3::zeros(), |acc, term| acc + term.acceleration(body))
    }
}

/// A field term: acceleration it imparts on one body at its current state
pub trait Acceleration {
    fn acceleration(&self, body: &Body) -> NVec3;
}

/// Same acceleration for every body, independent of mass
pub struct UniformField {
    pub g: NVec3,
}

impl Acceleration for UniformField {
    fn acceleration(&self, _body: &Body) -> NVec3 {
        self.g
    }
}

/// Lorentz acceleration from a fixed magnetic field: (q/m) (v × B)
pub struct MagneticField {
    pub b: NVec3,
}

impl Acceleration for MagneticField {
    fn acceleration(&self, body: &Body) -> NVec3 {
        body.v.cross(&self.b) * (body.q / body.m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::vector::vec2;

    fn charged(q: f64, v: NVec3) -> Body {
        Body::new("p", 2.0, q, 1.0, 0.1, NVec3::zeros(), v, [255, 255, 255])
    }

    #[test]
    fn uniform_field_ignores_mass() {
        let set = AccelSet::new().with(UniformField { g: vec2(0.0, -9.8) });
        let a = set.accumulate(&charged(0.0, NVec3::zeros()));
        assert_eq!(a, vec2(0.0, -9.8));
    }

    #[test]
    fn magnetic_field_is_perpendicular_to_velocity() {
        let set = AccelSet::new().with(MagneticField { b: NVec3::new(0.0, 0.0, 10.0) });
        let b = charged(1.0, vec2(1.0, 0.0));
        let a = set.accumulate(&b);
        // (1,0,0) x (0,0,10) = (0,-10,0), times q/m = 0.5
        assert!((a - vec2(0.0, -5.0)).norm() < 1e-12);
        assert!(a.dot(&b.v).abs() < 1e-12);
    }

    #[test]
    fn empty_set_adds_nothing() {
        let set = AccelSet::new();
        assert!(set.is_empty());
        assert_eq!(set.accumulate(&charged(1.0, vec2(2.0, 2.0))), NVec3::zeros());
    }

    #[test]
    fn neutral_body_feels_no_magnetism() {
        let set = AccelSet::from_fields(&Fields { gravity: 0.0, magnetic: 10.0 });
        assert_eq!(set.len(), 2);
        assert_eq!(set.accumulate(&charged(0.0, vec2(3.0, 1.0))), NVec3::zeros());
    }
}
