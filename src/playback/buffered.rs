//! Whole-file playback: decode everything, then one bulk write.

use super::{FramePolicy, PlaybackReport, decode_all};
use crate::audio::frame_decoder::{FrameDecoder, FrameMetadata, FramePrimitive};
use crate::audio::sink::{AudioSink, SinkFormat, SinkNegotiator, SinkOpener};
use crate::error::{Error, Result};

#[derive(Default)]
struct Accumulate {
    buffer: Vec<i16>,
    format: Option<SinkFormat>,
}

impl FramePolicy for Accumulate {
    fn on_audio(&mut self, pcm: &[i16], meta: &FrameMetadata) -> Result<()> {
        // grow by exactly what this frame needs, never shrink
        self.buffer
            .try_reserve_exact(pcm.len())
            .map_err(|source| Error::AllocationFailed {
                requested: self.buffer.len() + pcm.len(),
                source,
            })?;
        self.buffer.extend_from_slice(pcm);
        self.format = Some(meta.format());
        Ok(())
    }
}

pub(super) fn play<P: FramePrimitive, O: SinkOpener>(
    input: &[u8],
    primitive: P,
    opener: O,
) -> Result<PlaybackReport> {
    let mut decoder = FrameDecoder::new(primitive);
    let mut sinks = SinkNegotiator::new(opener);
    let mut report = PlaybackReport::default();

    let mut policy = Accumulate::default();
    decode_all(input, &mut decoder, &mut policy, &mut report)?;

    log::info!(
        "Decoded {} frames into {} samples ({} bytes)",
        report.audio_frames,
        policy.buffer.len(),
        policy.buffer.len() * std::mem::size_of::<i16>()
    );

    // the last frame's format wins; format changes mid-stream are not handled
    let Some(format) = policy.format else {
        log::warn!("No audio frames in stream, nothing was played");
        return Ok(report);
    };

    let sink = sinks.ensure_open(format)?;
    sink.write(&policy.buffer)?;
    sink.drain()?;

    report.samples_rendered = policy.buffer.len();
    report.sink_opens = sinks.opens();
    report.format = Some(format);
    Ok(report)
}
