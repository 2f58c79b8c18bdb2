//! cardmix: voice-over-music mixing service for greeting cards
//!
//! Synthesizes a spoken greeting, lays it over a background track with a
//! fixed ffmpeg ducking graph and publishes the result to object storage.

pub mod commands;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod router;
pub mod services;
pub mod utils;

pub use commands::AppState;
pub use router::create_router;
