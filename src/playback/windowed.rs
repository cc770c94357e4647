//! Play only `[start, end)` of a stream using sample-accurate seeking.

use super::PlaybackReport;
use crate::audio::frame_decoder::FramePrimitive;
use crate::audio::seekable::SeekableDecoder;
use crate::audio::sink::{AudioSink, SinkFormat, SinkNegotiator, SinkOpener};
use crate::error::{Error, Result};

/// A time window converted to interleaved sample counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    /// First sample to play
    pub offset: u64,
    /// Number of samples to play
    pub expected: u64,
}

impl SampleWindow {
    /// `offset = rate * channels * start`, `expected = rate * channels * (end - start)`.
    ///
    /// Both bounds are rounded to whole sample frames so the window never
    /// splits an interleaved frame.
    pub fn new(format: SinkFormat, start: f64, end: f64) -> Self {
        let rate = format.sample_rate as f64;
        let channels = format.channels as u64;
        let first = (rate * start).round() as u64;
        let last = (rate * end).round() as u64;

        Self {
            offset: first.saturating_mul(channels),
            expected: last.saturating_sub(first).saturating_mul(channels),
        }
    }
}

pub(super) fn play<P: FramePrimitive, O: SinkOpener>(
    input: &[u8],
    start: f64,
    end: f64,
    primitive: P,
    opener: O,
) -> Result<PlaybackReport> {
    let mut decoder = SeekableDecoder::open(input, primitive)?;
    let mut sinks = SinkNegotiator::new(opener);

    let format = decoder.format();
    let window = SampleWindow::new(format, start, end);
    log::info!(
        "Playing {}s .. {}s: {} samples from sample {} ({})",
        start,
        end,
        window.expected,
        window.offset,
        format
    );

    // A window too large for usize cannot be reserved either.
    let expected = usize::try_from(window.expected).unwrap_or(usize::MAX);
    let mut buffer: Vec<i16> = Vec::new();
    buffer
        .try_reserve_exact(expected)
        .map_err(|source| Error::AllocationFailed {
            requested: expected,
            source,
        })?;

    decoder.seek(window.offset)?;

    let read = decoder.read(&mut buffer, expected);
    if read < expected {
        // A short read is only fatal when the decoder flagged an error,
        // otherwise the window simply runs past the end of the stream.
        if let Some(reason) = decoder.last_error() {
            return Err(Error::DecodeTruncated {
                expected,
                read,
                reason: reason.to_string(),
            });
        }
        log::warn!(
            "Stream ended after {} of {} requested samples",
            read,
            expected
        );
    }

    let mut report = PlaybackReport {
        audio_frames: decoder.frame_count(),
        format: Some(format),
        ..Default::default()
    };
    if buffer.is_empty() {
        log::info!("Empty window, nothing to play");
        return Ok(report);
    }

    let sink = sinks.ensure_open(format)?;
    sink.write(&buffer)?;
    sink.drain()?;

    report.samples_rendered = buffer.len();
    report.sink_opens = sinks.opens();
    Ok(report)
}
