//! Playback sessions.
//!
//! A session is one decode → classify → buffer/render pipeline whose policy
//! is picked when the session is built:
//!
//! - `Streaming`: render every audio frame as soon as it is decoded
//! - `Buffered`: decode the whole stream into memory, then render once
//! - `Windowed`: seek to `start`, read up to `end`, then render once

mod buffered;
mod streaming;
mod windowed;

pub use windowed::SampleWindow;

use crate::audio::cursor::StreamCursor;
use crate::audio::frame_decoder::{Frame, FrameDecoder, FrameMetadata, FramePrimitive, SAMPLE_WIDTH};
use crate::audio::sink::{SinkFormat, SinkOpener};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackMode {
    Streaming,
    Buffered,
    /// Half-open interval `[start, end)` in seconds
    Windowed { start: f64, end: f64 },
}

impl PlaybackMode {
    pub fn windowed(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::Argument(format!(
                "window bounds must be finite, got {} .. {}",
                start, end
            )));
        }
        if start < 0.0 {
            return Err(Error::Argument(format!(
                "start must not be negative, got {}",
                start
            )));
        }
        if end < start {
            return Err(Error::Argument(format!(
                "end ({}) lies before start ({})",
                end, start
            )));
        }
        Ok(PlaybackMode::Windowed { start, end })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlaybackMode::Streaming => "streaming",
            PlaybackMode::Buffered => "buffered",
            PlaybackMode::Windowed { .. } => "windowed",
        }
    }
}

/// What a finished session did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackReport {
    pub frames: usize,
    pub audio_frames: usize,
    pub non_audio_frames: usize,
    /// Compressed bytes the cursor moved past, left at 0 by windowed runs
    pub bytes_consumed: usize,
    /// Interleaved samples handed to the sink
    pub samples_rendered: usize,
    pub sink_opens: usize,
    pub format: Option<SinkFormat>,
}

impl PlaybackReport {
    pub fn bytes_rendered(&self) -> usize {
        self.samples_rendered * SAMPLE_WIDTH
    }

    /// Rendered duration in seconds at the negotiated format.
    pub fn seconds_rendered(&self) -> f64 {
        match self.format {
            Some(f) if f.sample_rate > 0 && f.channels > 0 => {
                self.samples_rendered as f64 / (f.sample_rate as f64 * f.channels as f64)
            }
            _ => 0.0,
        }
    }
}

/// One playback run over one input.
pub struct Session<P: FramePrimitive, O: SinkOpener> {
    mode: PlaybackMode,
    primitive: P,
    opener: O,
}

impl<P: FramePrimitive, O: SinkOpener> Session<P, O> {
    pub fn new(mode: PlaybackMode, primitive: P, opener: O) -> Self {
        Self {
            mode,
            primitive,
            opener,
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Play `input` to completion. Any error ends the session; the sink is
    /// closed before the decoder on every path.
    pub fn run(self, input: &[u8]) -> Result<PlaybackReport> {
        log::info!(
            "Starting {} playback of {} bytes",
            self.mode.name(),
            input.len()
        );
        match self.mode {
            PlaybackMode::Streaming => streaming::play(input, self.primitive, self.opener),
            PlaybackMode::Buffered => buffered::play(input, self.primitive, self.opener),
            PlaybackMode::Windowed { start, end } => {
                windowed::play(input, start, end, self.primitive, self.opener)
            }
        }
    }
}

/// Per-frame behaviour plugged into [`decode_all`].
trait FramePolicy {
    fn on_audio(&mut self, pcm: &[i16], meta: &FrameMetadata) -> Result<()>;
}

/// Walk the stream frame by frame until the decoder reports the end or the
/// input is used up. Only audio frames reach the policy; every frame moves
/// the cursor by exactly its byte length.
fn decode_all<P: FramePrimitive, F: FramePolicy>(
    input: &[u8],
    decoder: &mut FrameDecoder<P>,
    policy: &mut F,
    report: &mut PlaybackReport,
) -> Result<()> {
    let mut cursor = StreamCursor::new(input);

    while !cursor.is_exhausted() {
        let frame = decoder.decode_next(&cursor);
        match frame {
            Frame::Audio(meta) => {
                report.audio_frames += 1;
                log::trace!(
                    "Decoding frame no. {:5} ({} samples, {} bytes)",
                    report.frames + 1,
                    meta.samples,
                    meta.frame_bytes
                );
                policy.on_audio(decoder.pcm(), &meta)?;
            }
            // some other informational data we don't care about
            Frame::NonAudio { frame_bytes } => {
                report.non_audio_frames += 1;
                log::trace!("Skipping {} bytes of non-audio data", frame_bytes);
            }
            Frame::End => break,
        }
        report.frames += 1;
        cursor.advance(frame.frame_bytes())?;
    }

    report.bytes_consumed = cursor.position();
    if !cursor.is_exhausted() {
        log::debug!(
            "Decoder stopped with {} trailing bytes left",
            cursor.remaining()
        );
    }
    Ok(())
}
