//! Command-line surface.
//!
//! `mp3pa <FILE>` streams, `mp3pa --buffered <FILE>` decodes the whole file
//! first, `mp3pa <FILE> <START> <END>` plays the window `[START, END)`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::Result;
use crate::playback::PlaybackMode;

#[derive(Parser, Debug)]
#[command(name = "mp3pa", version, about = "Play an MP3 file through ALSA")]
pub struct Args {
    /// MP3 file to play
    pub file: PathBuf,

    /// Start of the window to play, in seconds
    #[arg(requires = "end")]
    pub start: Option<f64>,

    /// End of the window to play (exclusive), in seconds
    #[arg(requires = "start")]
    pub end: Option<f64>,

    /// Decode the whole file before playing
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub buffered: bool,

    /// ALSA playback device
    #[arg(long, env = "MP3PA_DEVICE")]
    pub device: Option<String>,

    /// ALSA period size in frames, 0 lets ALSA decide
    #[arg(long)]
    pub period_size: Option<usize>,
}

impl Args {
    pub fn mode(&self) -> Result<PlaybackMode> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => PlaybackMode::windowed(start, end),
            _ if self.buffered => Ok(PlaybackMode::Buffered),
            _ => Ok(PlaybackMode::Streaming),
        }
    }

    /// Fold command-line overrides into the build-time config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(device) = &self.device {
            config.playback_device = device.clone();
        }
        if let Some(period_size) = self.period_size {
            config.playback_period_size = period_size;
        }
    }
}
