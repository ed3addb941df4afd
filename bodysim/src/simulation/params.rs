//! Numerical and physical parameters for a run
//!
//! All of these are built once from the scenario and passed into the engine.
//! Nothing here is process-global.
//! - `Constants`     coupling constants for pairwise forces (`G`, `K`)
//! - `Fields`        external uniform gravity and magnetic field strengths
//! - `RunParameters` duration, physics/render rates and recentering

use super::vector::NVec3;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    pub g: f64, // gravitational constant
    pub k: f64, // electrostatic constant
}

impl Default for Constants {
    fn default() -> Self {
        Self { g: 1.0, k: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fields {
    pub gravity: f64,  // uniform field along +y, acceleration units
    pub magnetic: f64, // field strength along +z
}

impl Fields {
    /// Uniform field acceleration, same for every body
    pub fn gravity_vec(&self) -> NVec3 {
        NVec3::new(0.0, self.gravity, 0.0)
    }

    pub fn magnetic_vec(&self) -> NVec3 {
        NVec3::new(0.0, 0.0, self.magnetic)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub duration: u32,          // seconds of simulated time
    pub physics_rate: u32,      // physics steps per second
    pub render_rate: u32,       // rendered frames per second
    pub center: Option<usize>,  // reference body pinned at the origin, if any
}

impl RunParameters {
    /// Check the rates before a run; see `stride` for the ratio rule
    pub fn validate(&self) -> Result<()> {
        if self.duration == 0 {
            return Err(Error::config("duration must be > 0"));
        }
        if self.physics_rate == 0 {
            return Err(Error::config("physics_rate must be > 0"));
        }
        if self.render_rate == 0 {
            return Err(Error::config("render_rate must be > 0"));
        }
        if self.render_rate > self.physics_rate {
            return Err(Error::config(format!(
                "render_rate ({}) cannot exceed physics_rate ({})",
                self.render_rate, self.physics_rate
            )));
        }
        if self.physics_rate % self.render_rate != 0 {
            return Err(Error::config(format!(
                "physics_rate ({}) must be a whole multiple of render_rate ({})",
                self.physics_rate, self.render_rate
            )));
        }
        Ok(())
    }

    /// Total number of physics steps
    pub fn steps(&self) -> usize {
        self.duration as usize * self.physics_rate as usize
    }

    /// Physics steps between two rendered frames
    pub fn stride(&self) -> usize {
        (self.physics_rate / self.render_rate) as usize
    }

    pub fn dt(&self) -> f64 {
        1.0 / self.physics_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(physics_rate: u32, render_rate: u32) -> RunParameters {
        RunParameters { duration: 2, physics_rate, render_rate, center: None }
    }

    #[test]
    fn stride_and_steps() {
        let p = run(100, 25);
        assert!(p.validate().is_ok());
        assert_eq!(p.steps(), 200);
        assert_eq!(p.stride(), 4);
        assert!((p.dt() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn non_divisible_rates_rejected() {
        let err = run(100, 30).validate().unwrap_err();
        assert!(err.to_string().contains("whole multiple"));
    }

    #[test]
    fn zero_rates_rejected() {
        assert!(run(0, 1).validate().is_err());
        assert!(run(10, 0).validate().is_err());
        assert!(run(10, 20).validate().is_err());
    }
}
