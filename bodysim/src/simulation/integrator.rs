//! Fixed-step semi-implicit Euler integrator
//!
//! One step is four passes, always in this order:
//! 1. force + collision pass (with the wall pass folded in per body)
//! 2. field + integration pass: v += a dt, then x += v dt
//! 3. optional recentering on a reference body
//!
//! The force pass is interleaved on purpose: body j accumulates the force of
//! every other body k, and the pair (j, k) with k > j is collided right after
//! its force term. A collision therefore moves bodies before later force
//! terms in the same step see them. Body j then hits the walls before body
//! j + 1 starts.

use super::forces::AccelSet;
use super::frame::Frame;
use super::params::Constants;
use super::states::{pair_mut, World};
use super::vector::NVec3;

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub collisions: usize, // body-body contacts resolved
    pub wall_hits: usize,  // body-edge contacts resolved
}

/// Immutable per-run integration settings
pub struct Integrator {
    pub constants: Constants,
    pub fields: AccelSet,
    pub frame: Frame,
    pub dt: f64,               // time step
    pub center: Option<usize>, // body pinned at the origin after each step
}

impl Integrator {
    /// Advance `world` by one step of `dt`
    pub fn step(&self, world: &mut World) -> StepStats {
        if world.is_empty() {
            return StepStats::default();
        }

        let (net, stats) = force_pass(world, &self.constants, &self.frame);
        semi_implicit_euler(world, &net, &self.fields, self.dt);

        if let Some(c) = self.center {
            recenter(world, c);
        }

        stats
    }
}

/// Net pairwise force on every body, resolving body and wall contacts on the way
pub fn force_pass(world: &mut World, constants: &Constants, frame: &Frame) -> (Vec<NVec3>, StepStats) {
    let n = world.bodies.len();
    let mut net = vec![NVec3::zeros(); n];
    let mut stats = StepStats::default();

    for j in 0..n {
        for k in 0..n {
            if k != j {
                net[j] += world.bodies[j].force_from(&world.bodies[k], constants);
            }

            // Each unordered pair collides once, from its lower index
            if k > j {
                let (a, b) = pair_mut(&mut world.bodies, j, k);
                if a.collide_with(b) {
                    stats.collisions += 1;
                }
            }
        }

        stats.wall_hits += frame.resolve_walls(&mut world.bodies[j]) as usize;
    }

    (net, stats)
}

/// Kick then drift: velocity is updated first and the new velocity moves the body
pub fn semi_implicit_euler(world: &mut World, net: &[NVec3], fields: &AccelSet, dt: f64) {
    for (b, f) in world.bodies.iter_mut().zip(net.iter()) {
        let a = f / b.m + fields.accumulate(b);
        b.v += a * dt;
        b.x += b.v * dt;
    }
    world.t += dt;
}

/// Shift every body so `world.bodies[center]` sits at the origin
pub fn recenter(world: &mut World, center: usize) {
    let Some(offset) = world.bodies.get(center).map(|b| b.x) else {
        return;
    };
    for b in world.bodies.iter_mut() {
        b.x -= offset;
    }
}
