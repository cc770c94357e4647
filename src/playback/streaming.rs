//! Decode-and-render, one frame at a time.
//!
//! Memory stays bounded by one frame of PCM. A blocking sink write stalls
//! decoding, which is what paces the loop to the device.

use super::{FramePolicy, PlaybackReport, decode_all};
use crate::audio::frame_decoder::{FrameDecoder, FrameMetadata, FramePrimitive};
use crate::audio::sink::{AudioSink, SinkNegotiator, SinkOpener};
use crate::error::Result;

struct RenderEachFrame<'s, O: SinkOpener> {
    sinks: &'s mut SinkNegotiator<O>,
    samples_rendered: usize,
}

impl<O: SinkOpener> FramePolicy for RenderEachFrame<'_, O> {
    fn on_audio(&mut self, pcm: &[i16], meta: &FrameMetadata) -> Result<()> {
        let sink = self.sinks.ensure_open(meta.format())?;
        sink.write(pcm)?;
        self.samples_rendered += pcm.len();
        Ok(())
    }
}

pub(super) fn play<P: FramePrimitive, O: SinkOpener>(
    input: &[u8],
    primitive: P,
    opener: O,
) -> Result<PlaybackReport> {
    let mut decoder = FrameDecoder::new(primitive);
    // declared after the decoder so it is dropped (closed) first
    let mut sinks = SinkNegotiator::new(opener);
    let mut report = PlaybackReport::default();

    let mut policy = RenderEachFrame {
        sinks: &mut sinks,
        samples_rendered: 0,
    };
    decode_all(input, &mut decoder, &mut policy, &mut report)?;
    report.samples_rendered = policy.samples_rendered;

    if sinks.is_open() {
        sinks.drain()?;
    } else {
        log::warn!("No audio frames in stream, nothing was played");
    }

    report.sink_opens = sinks.opens();
    report.format = sinks.format();
    Ok(report)
}
