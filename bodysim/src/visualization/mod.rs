pub mod renderer;
pub mod dispatch;
pub mod video;
