//! Core state types for the simulation
//!
//! - `Body`     one point-like body with mass, charge, elasticity and radius
//! - `World`    the ordered body list owned by the physics thread
//! - `Snapshot` an owned deep copy of the world, handed to renderers
//!
//! Bodies interact pairwise through `force_from` and `collide_with`.

use tracing::trace;

use super::params::Constants;
use super::vector::{NVec3, VectorExt};

pub type Rgb = [u8; 3];

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,    // display label only
    pub m: f64,          // mass (> 0)
    pub q: f64,          // charge
    pub e: f64,          // elasticity, expected in [0, 1]
    pub radius: f64,     // collision and drawing radius
    pub x: NVec3,        // position
    pub v: NVec3,        // velocity
    pub color: Rgb,      // render color
}

impl Body {
    #[allow(clippy::too_many_arguments)]
    pub fn new(name: impl Into<String>, m: f64, q: f64, e: f64, radius: f64, x: NVec3, v: NVec3, color: Rgb) -> Self {
        Self {
            name: name.into(),
            m,
            q,
            e,
            radius,
            x,
            v,
            color,
        }
    }

    /// Force exerted by `other` on `self`: gravity plus Coulomb along the
    /// separation unit vector r̂ = (x_self - x_other) / |r|
    ///
    /// Coincident bodies have no separation direction and exert zero force.
    pub fn force_from(&self, other: &Body, c: &Constants) -> NVec3 {
        let r = self.x - other.x;
        let Some(r_hat) = r.normalize_checked().unit() else {
            trace!(a = %self.name, b = %other.name, "coincident bodies, force skipped");
            return NVec3::zeros();
        };
        let r2 = r.norm_squared();

        // negative: pulls self back toward other
        let gravity = -c.g * self.m * other.m / r2;
        // like charges push apart
        let electrostatic = c.k * self.q * other.q / r2;

        r_hat * gravity + r_hat * electrostatic
    }

    /// Resolve an elastic contact between `self` and `other`
    ///
    /// The response works in the plane: the tangent is (-n.y, n.x), so any z
    /// velocity is dropped for colliding bodies. After the velocity exchange
    /// each body's whole velocity is scaled by its own elasticity, and the two
    /// bodies are pushed apart so their centers end exactly `r1 + r2` apart.
    ///
    /// Returns `true` if a contact was resolved. Coincident centers have no
    /// normal and are left untouched.
    pub fn collide_with(&mut self, other: &mut Body) -> bool {
        let d = self.x - other.x;
        let dist = d.norm();
        if dist >= self.radius + other.radius {
            return false;
        }
        let Some(normal) = d.normalize_checked().unit() else {
            trace!(a = %self.name, b = %other.name, "coincident bodies, collision skipped");
            return false;
        };
        let tangent = NVec3::new(-normal.y, normal.x, 0.0);

        // Project onto the collision basis
        let v1n = normal.dot(&self.v);
        let v1t = tangent.dot(&self.v);
        let v2n = normal.dot(&other.v);
        let v2t = tangent.dot(&other.v);

        // 1-D elastic exchange along the normal, tangential parts unchanged
        let (m1, m2) = (self.m, other.m);
        let v1n_new = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / (m1 + m2);
        let v2n_new = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / (m1 + m2);

        self.v = (normal * v1n_new + tangent * v1t) * self.e;
        other.v = (normal * v2n_new + tangent * v2t) * other.e;

        // Half the overlap each, along the normal
        let overlap = self.radius + other.radius - dist;
        let separation = normal * (overlap / 2.0);
        self.x += separation;
        other.x -= separation;

        true
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub bodies: Vec<Body>, // ordered, fixed for the run
    pub t: f64,            // simulated time
}

impl World {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Deep copy of the current state tagged with `frame`
    pub fn snapshot(&self, frame: usize) -> Snapshot {
        Snapshot {
            frame,
            t: self.t,
            bodies: self.bodies.clone(),
        }
    }
}

/// Owned, frame-consistent copy of a world
///
/// Holds no references into live state, so it can be moved into a render task
/// while the physics thread keeps mutating the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub frame: usize,      // step index the copy was taken at
    pub t: f64,            // simulated time at that step
    pub bodies: Vec<Body>,
}

/// Two distinct mutable bodies out of one slice, `j < k`
pub(crate) fn pair_mut(bodies: &mut [Body], j: usize, k: usize) -> (&mut Body, &mut Body) {
    debug_assert!(j < k);
    let (left, right) = bodies.split_at_mut(k);
    (&mut left[j], &mut right[0])
}
