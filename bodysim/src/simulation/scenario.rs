//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - run parameters (`RunParameters`)
//! - force constants, fields and frame (`Constants`, `Fields`, `Frame`)
//! - world state (`World` with bodies at t = 0)
//! - active field set (`AccelSet`)
//!
//! Every check that would otherwise surface as NaNs mid-run happens here,
//! before the first step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::configuration::config::{BodyConfig, CloudConfig, OutputConfig, ScenarioConfig};
use crate::error::{Error, Result};
use crate::simulation::engine::Engine;
use crate::simulation::forces::AccelSet;
use crate::simulation::frame::Frame;
use crate::simulation::integrator::Integrator;
use crate::simulation::params::{Constants, Fields, RunParameters};
use crate::simulation::states::{Body, Rgb, World};
use crate::simulation::vector::{vec2, NVec3};

/// Fully-initialized, validated scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the run settings, constants, current world state and the set
/// of active field accelerations
pub struct Scenario {
    pub run: RunParameters,
    pub constants: Constants,
    pub fields: Fields,
    pub frame: Frame,
    pub output: OutputConfig,
    pub system: World,
    pub forces: AccelSet,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let frame = Frame {
            image_width: cfg.frame.image_width,
            image_height: cfg.frame.image_height,
            world_width: cfg.frame.world_width,
        };
        frame.validate()?;

        // Bodies: listed ones first, then generated clouds, in order
        let mut bodies = cfg
            .bodies
            .iter()
            .map(body_from_config)
            .collect::<Result<Vec<Body>>>()?;
        for cloud in &cfg.clouds {
            bodies.extend(generate_cloud(cloud, &frame));
        }
        validate_bodies(&bodies)?;

        // Reference body for recentering, looked up by name
        let center = match &cfg.run.stabilize {
            Some(name) => Some(
                bodies
                    .iter()
                    .position(|b| &b.name == name)
                    .ok_or_else(|| Error::config(format!("stabilize: no body named {name:?}")))?,
            ),
            None => None,
        };

        let run = RunParameters {
            duration: cfg.run.duration,
            physics_rate: cfg.run.physics_rate,
            render_rate: cfg.run.render_rate,
            center,
        };
        run.validate()?;

        let constants = Constants {
            g: cfg.constants.g,
            k: cfg.constants.k,
        };
        let fields = Fields {
            gravity: cfg.fields.gravity,
            magnetic: cfg.fields.magnetic,
        };
        if ![constants.g, constants.k, fields.gravity, fields.magnetic].iter().all(|c| c.is_finite()) {
            return Err(Error::config("constants and fields must be finite"));
        }

        Ok(Self {
            forces: AccelSet::from_fields(&fields),
            run,
            constants,
            fields,
            frame,
            output: cfg.output,
            system: World::new(bodies),
        })
    }

    /// Hand the world and parameters to a run loop
    pub fn into_engine(self) -> Result<(Engine, OutputConfig)> {
        let integrator = Integrator {
            constants: self.constants,
            fields: self.forces,
            frame: self.frame,
            dt: self.run.dt(),
            center: self.run.center,
        };
        Ok((Engine::new(self.system, integrator, self.run)?, self.output))
    }
}

/// Map a `BodyConfig` to a runtime `Body`
fn body_from_config(bc: &BodyConfig) -> Result<Body> {
    let x = vector_from(&bc.x, "x", &bc.name)?;
    let v = if bc.v.is_empty() {
        NVec3::zeros()
    } else {
        vector_from(&bc.v, "v", &bc.name)?
    };
    Ok(Body::new(bc.name.clone(), bc.m, bc.q, bc.e, bc.radius, x, v, bc.color))
}

/// 2 or 3 components, z = 0 when only two are given
fn vector_from(c: &[f64], field: &str, body: &str) -> Result<NVec3> {
    match c {
        [x, y] => Ok(vec2(*x, *y)),
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(Error::config(format!(
            "body {body:?}: {field} must have 2 or 3 components, got {}",
            c.len()
        ))),
    }
}

fn validate_bodies(bodies: &[Body]) -> Result<()> {
    if bodies.is_empty() {
        return Err(Error::config("scenario has no bodies"));
    }
    for b in bodies {
        if !b.m.is_finite() || b.m <= 0.0 {
            return Err(Error::config(format!("body {:?}: mass must be finite and > 0", b.name)));
        }
        if !b.radius.is_finite() || b.radius < 0.0 {
            return Err(Error::config(format!("body {:?}: radius must be finite and >= 0", b.name)));
        }
        if !(b.q.is_finite() && b.e.is_finite()) {
            return Err(Error::config(format!("body {:?}: charge and elasticity must be finite", b.name)));
        }
        if !(b.x.iter().all(|c| c.is_finite()) && b.v.iter().all(|c| c.is_finite())) {
            return Err(Error::config(format!("body {:?}: position and velocity must be finite", b.name)));
        }
        if !(0.0..=1.0).contains(&b.e) {
            warn!(body = %b.name, e = b.e, "elasticity outside [0, 1]");
        }
    }
    Ok(())
}

/// Color for a charge in [-1, 1]: red for positive, blue for negative
pub fn charge_color(q: f64) -> Rgb {
    let n = q.clamp(-1.0, 1.0) * 127.0;
    // truncated, not rounded
    [(127.0 + n) as u8, 0, (127.0 - n) as u8]
}

/// Seeded random cloud; the same config always yields the same bodies
pub fn generate_cloud(cfg: &CloudConfig, frame: &Frame) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let (w, h) = (frame.world_width, frame.world_height());
    let [fx0, fx1, fy0, fy1] = cfg.region;

    // Region fractions to physical bounds around the origin
    let (x0, x1) = (fx0 * w - w / 2.0, fx1 * w - w / 2.0);
    let (y0, y1) = (fy0 * h - h / 2.0, fy1 * h - h / 2.0);

    (0..cfg.count)
        .map(|_| {
            let x = sample(&mut rng, x0, x1);
            let y = sample(&mut rng, y0, y1);
            let vx = sample(&mut rng, -cfg.speed, cfg.speed);
            let vy = sample(&mut rng, -cfg.speed, cfg.speed);
            let q = sample(&mut rng, -cfg.charge, cfg.charge);
            Body::new(
                cfg.name.clone(),
                cfg.m,
                q,
                cfg.e,
                cfg.radius,
                vec2(x, y),
                vec2(vx, vy),
                charge_color(if cfg.charge > 0.0 { q / cfg.charge } else { 0.0 }),
            )
        })
        .collect()
}

/// Uniform in [lo, hi), `lo` for an empty or reversed range
fn sample(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_colors_span_red_to_blue() {
        assert_eq!(charge_color(1.0), [254, 0, 0]);
        assert_eq!(charge_color(-1.0), [0, 0, 254]);
        assert_eq!(charge_color(0.0), [127, 0, 127]);
    }

    #[test]
    fn charge_colors_truncate() {
        // 127 +/- 63.5
        assert_eq!(charge_color(0.5), [190, 0, 63]);
        assert_eq!(charge_color(-0.5), [63, 0, 190]);
    }

    #[test]
    fn vector_arity_checked() {
        assert_eq!(vector_from(&[1.0, 2.0], "x", "a").unwrap(), vec2(1.0, 2.0));
        assert_eq!(vector_from(&[1.0, 2.0, 3.0], "x", "a").unwrap(), NVec3::new(1.0, 2.0, 3.0));
        assert!(vector_from(&[1.0], "x", "a").is_err());
    }
}
