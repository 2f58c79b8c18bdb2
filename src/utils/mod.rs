pub mod ffmpeg;
pub mod logger;
pub mod temp;
