//! Frame sinks and the GIF/MP4 assembler.
//!
//! Sinks consume rendered frames in ascending year order.

pub mod assemble;
/// `ffmpeg`-based MP4 sink (system `ffmpeg`).
pub mod ffmpeg;
pub mod gif;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
