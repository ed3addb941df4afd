pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod error;

pub use simulation::vector::{NVec3, NormalizeResult, VectorExt, vec2};
pub use simulation::states::{Body, World, Snapshot, Rgb};
pub use simulation::params::{Constants, Fields, RunParameters};
pub use simulation::frame::Frame;
pub use simulation::forces::{Acceleration, AccelSet, UniformField, MagneticField};
pub use simulation::integrator::{Integrator, StepStats};
pub use simulation::engine::{Engine, RunSummary};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, RunConfig, BodyConfig, CloudConfig, OutputConfig};

pub use visualization::renderer::{FrameRenderer, PngRenderer};
pub use visualization::dispatch::{RenderDispatcher, RenderReport};
pub use visualization::video::{VideoEncoder, clean_frames};

pub use error::{Error, Result};
