pub mod vector;
pub mod states;
pub mod params;
pub mod frame;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scenario;
