pub mod engine;
pub mod filter_graph;
pub mod mixer;

pub use engine::{AudioEngine, EngineJob, FfmpegEngine};
pub use filter_graph::{DUCKING, FilterGraphSpec};
pub use mixer::Mixer;
