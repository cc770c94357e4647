//! mp3pa - a minimal MP3 player for ALSA
//!
//! Three ways to play one file: stream it frame by frame, decode it whole
//! and play the buffer, or play a `[start, end)` window via sample-accurate
//! seeking.

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod playback;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
