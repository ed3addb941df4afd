//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`RunConfig`]       – duration, physics/render rates, recentering
//! - [`ConstantsConfig`] – coupling constants for pairwise forces
//! - [`FieldsConfig`]    – external uniform gravity and magnetic field
//! - [`FrameConfig`]     – image size and the physical width it covers
//! - [`OutputConfig`]    – where frames and the video go
//! - [`BodyConfig`]      – initial state for each body
//! - [`CloudConfig`]     – seeded random particle clouds
//! - [`ScenarioConfig`]  – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! run:
//!   duration: 120          # seconds of simulated time
//!   physics_rate: 100      # steps per second
//!   render_rate: 25        # frames per second, must divide physics_rate
//!   stabilize: "Earth"     # optional, pin this body at the origin
//!
//! constants:
//!   G: 1.0
//!   K: 10.0
//!
//! fields:
//!   gravity: 0.0           # uniform acceleration along +y
//!   magnetic: 10.0         # field strength along +z
//!
//! frame:
//!   image_width: 1920
//!   image_height: 1080
//!   world_width: 200.0
//!
//! output:
//!   directory: "images"
//!   video: "out.mp4"
//!
//! bodies:
//!   - name: "Earth"
//!     m: 50.0
//!     e: 0.8
//!     radius: 5.0
//!     x: [0.0, 0.0]
//!     v: [0.0, 0.0]
//!     color: [0, 150, 250]
//! ```
//!
//! Everything except `run` and the bodies has a default. The engine maps this
//! configuration into its runtime types in `simulation::scenario`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Run length, step rates and the optional reference body
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub duration: u32, // seconds of simulated time
    pub physics_rate: u32, // physics steps per second
    pub render_rate: u32, // rendered frames per second
    #[serde(default)]
    pub stabilize: Option<String>, // name of the body kept at the origin
}

/// Pairwise force constants
#[derive(Deserialize, Debug, Clone)]
pub struct ConstantsConfig {
    #[serde(rename = "G", default = "default_g")]
    pub g: f64, // gravitational constant
    #[serde(rename = "K", default = "default_k")]
    pub k: f64, // electrostatic constant
}

fn default_g() -> f64 { 1.0 }
fn default_k() -> f64 { 10.0 }

impl Default for ConstantsConfig {
    fn default() -> Self {
        Self { g: default_g(), k: default_k() }
    }
}

/// External fields, both off by default
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FieldsConfig {
    #[serde(default)]
    pub gravity: f64, // uniform field along +y
    #[serde(default)]
    pub magnetic: f64, // field along +z
}

/// Output image and the physical area it shows
#[derive(Deserialize, Debug, Clone)]
pub struct FrameConfig {
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_world_width")]
    pub world_width: f64,
}

fn default_image_width() -> u32 { 1920 }
fn default_image_height() -> u32 { 1080 }
fn default_world_width() -> f64 { 200.0 }

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            image_width: default_image_width(),
            image_height: default_image_height(),
            world_width: default_world_width(),
        }
    }
}

/// Where rendered frames and the encoded video go
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf, // frame images
    #[serde(default = "default_video")]
    pub video: PathBuf, // encoded output
    #[serde(default = "default_true")]
    pub encode: bool, // run the video encoder after the simulation
    #[serde(default)]
    pub keep_frames: bool, // skip frame cleanup after encoding
    #[serde(default)]
    pub workers: Option<usize>, // render threads, hardware parallelism if unset
    #[serde(default)]
    pub max_in_flight: Option<usize>, // bound on queued + running render tasks
}

fn default_directory() -> PathBuf { PathBuf::from("images") }
fn default_video() -> PathBuf { PathBuf::from("out.mp4") }
fn default_true() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            video: default_video(),
            encode: true,
            keep_frames: false,
            workers: None,
            max_in_flight: None,
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String, // display label
    pub m: f64, // mass
    #[serde(default)]
    pub q: f64, // charge
    #[serde(default = "default_elasticity")]
    pub e: f64, // elasticity
    pub radius: f64, // collision and drawing radius
    pub x: Vec<f64>, // initial position, 2 or 3 components
    #[serde(default)]
    pub v: Vec<f64>, // initial velocity, 2 or 3 components, at rest if empty
    #[serde(default = "default_color")]
    pub color: [u8; 3], // RGB
}

fn default_elasticity() -> f64 { 1.0 }
fn default_color() -> [u8; 3] { [255, 255, 255] }

/// Seeded cloud of identical charged particles
///
/// `region` is given in fractions of the world extents: x in [0, 1] spans the
/// world from its left to right edge, y from bottom to top.
#[derive(Deserialize, Debug, Clone)]
pub struct CloudConfig {
    #[serde(default = "default_cloud_name")]
    pub name: String,
    pub count: usize,
    pub seed: u64,
    pub m: f64,
    pub radius: f64,
    #[serde(default = "default_elasticity")]
    pub e: f64,
    #[serde(default = "default_speed")]
    pub speed: f64, // velocity components uniform in [-speed, speed]
    #[serde(default = "default_charge")]
    pub charge: f64, // charges uniform in [-charge, charge]
    #[serde(default = "default_region")]
    pub region: [f64; 4], // [x_min, x_max, y_min, y_max] as fractions
}

fn default_cloud_name() -> String { "Particle".into() }
fn default_speed() -> f64 { 0.05 }
fn default_charge() -> f64 { 1.0 }
fn default_region() -> [f64; 4] { [0.0, 1.0, 0.0, 1.0] }

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub run: RunConfig,
    #[serde(default)]
    pub constants: ConstantsConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // listed bodies, in order
    #[serde(default)]
    pub clouds: Vec<CloudConfig>, // generated after the listed bodies
}

impl ScenarioConfig {
    /// Parse a scenario from YAML text
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| Error::config(format!("scenario yaml: {e}")))
    }

    /// Read and parse a scenario file
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
run:
  duration: 2
  physics_rate: 100
  render_rate: 25
bodies:
  - name: "A"
    m: 1.0
    radius: 0.5
    x: [1.0, 2.0]
"#;

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg = ScenarioConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(cfg.constants.g, 1.0);
        assert_eq!(cfg.constants.k, 10.0);
        assert_eq!(cfg.fields.magnetic, 0.0);
        assert_eq!(cfg.frame.image_width, 1920);
        assert_eq!(cfg.output.directory, PathBuf::from("images"));
        assert!(cfg.output.encode);
        assert!(cfg.run.stabilize.is_none());

        let b = &cfg.bodies[0];
        assert_eq!(b.e, 1.0);
        assert_eq!(b.q, 0.0);
        assert!(b.v.is_empty());
        assert_eq!(b.color, [255, 255, 255]);
    }

    #[test]
    fn constants_use_upper_case_keys() {
        let text = format!("{MINIMAL}\nconstants:\n  G: 2.5\n  K: 0.0\n");
        let cfg = ScenarioConfig::from_yaml_str(&text).unwrap();
        assert_eq!(cfg.constants.g, 2.5);
        assert_eq!(cfg.constants.k, 0.0);
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = ScenarioConfig::from_yaml_str("run: [").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
