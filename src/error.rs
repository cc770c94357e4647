//! Error types for mp3pa.
//!
//! Every variant is terminal for the playback session that raised it.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed invocation, no session is started
    #[error("Invalid arguments: {0}")]
    Argument(String),

    #[error("Cannot open input '{}': {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stream holds no decodable audio frame, so it has no format
    #[error("No MPEG audio frames found in stream")]
    NoAudio,

    #[error("Couldn't open audio output: {0}")]
    SinkUnavailable(String),

    #[error("Unable to send data to audio output: {0}")]
    SinkWriteFailed(String),

    #[error("Unable to drain audio output: {0}")]
    SinkDrainFailed(String),

    #[error("Failed to allocate {requested} samples for PCM buffer")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Seek offset {offset} is outside the stream ({total} samples)")]
    SeekOutOfRange { offset: u64, total: u64 },

    #[error("Couldn't decode mp3 stream: read {read} of {expected} samples ({reason})")]
    DecodeTruncated {
        expected: usize,
        read: usize,
        reason: String,
    },

    /// Advancing past the end of the compressed stream. Indicates a bug.
    #[error("Stream cursor underflow: advance by {requested} with {remaining} bytes left")]
    CursorUnderflow { requested: usize, remaining: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
