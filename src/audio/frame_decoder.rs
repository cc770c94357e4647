//! Frame-at-a-time decoding over a compressed stream.
//!
//! `FramePrimitive` is the narrow seam to the bit-level decoder; everything
//! above it works in terms of the three-way [`Frame`] classification.

use super::cursor::StreamCursor;
use super::sink::SinkFormat;

/// Largest interleaved sample count one MPEG audio frame can produce.
pub const MAX_SAMPLES_PER_FRAME: usize = 1152 * 2;

/// Output buffer for one decoded frame.
pub type PcmFrame = [i16; MAX_SAMPLES_PER_FRAME];

/// Bytes per sample on the output side (signed 16-bit).
pub const SAMPLE_WIDTH: usize = std::mem::size_of::<i16>();

/// What the primitive reports about the frame it just parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Bytes consumed, including any junk skipped before the frame
    pub frame_bytes: usize,
    pub channels: u32,
    pub sample_rate: u32,
    pub layer: u32,
    pub bitrate_kbps: u32,
}

/// A decoder that turns one compressed frame into interleaved i16 PCM.
pub trait FramePrimitive {
    /// Decode the first frame found in `data`.
    ///
    /// Returns the number of samples per channel. With `pcm == None` only
    /// the header is parsed and nothing is decoded.
    fn decode_frame(&mut self, data: &[u8], pcm: Option<&mut PcmFrame>) -> (usize, FrameInfo);

    /// Drop all running state (sync, bit reservoir).
    fn reset(&mut self);
}

/// Per-frame metadata for an audio frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    pub sample_rate: u32,
    pub channels: u32,
    pub frame_bytes: usize,
    /// Samples per channel
    pub samples: usize,
}

impl FrameMetadata {
    pub fn interleaved_samples(&self) -> usize {
        self.samples * self.channels as usize
    }

    /// `sample_count * channel_count * sample_width`
    pub fn pcm_bytes(&self) -> usize {
        self.interleaved_samples() * SAMPLE_WIDTH
    }

    pub fn format(&self) -> SinkFormat {
        SinkFormat::s16le(self.sample_rate, self.channels)
    }
}

/// Outcome of one decode step. The three cases must stay distinct: a
/// non-audio frame still moves the cursor, the end does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Audio(FrameMetadata),
    /// Tags, padding or junk: skip `frame_bytes`, render nothing
    NonAudio { frame_bytes: usize },
    /// End of stream or an unparseable tail
    End,
}

impl Frame {
    pub fn classify(samples: usize, info: &FrameInfo) -> Self {
        // A frame that consumes nothing can never make progress, whatever
        // the sample count says.
        if info.frame_bytes == 0 {
            return Frame::End;
        }
        if samples == 0 {
            return Frame::NonAudio {
                frame_bytes: info.frame_bytes,
            };
        }
        Frame::Audio(FrameMetadata {
            sample_rate: info.sample_rate,
            channels: info.channels,
            frame_bytes: info.frame_bytes,
            samples,
        })
    }

    pub fn frame_bytes(&self) -> usize {
        match self {
            Frame::Audio(meta) => meta.frame_bytes,
            Frame::NonAudio { frame_bytes } => *frame_bytes,
            Frame::End => 0,
        }
    }
}

/// Owns the decoder context and a fixed scratch buffer reused for every
/// frame.
pub struct FrameDecoder<P: FramePrimitive> {
    primitive: P,
    pcm: Box<PcmFrame>,
    pcm_len: usize,
}

impl<P: FramePrimitive> FrameDecoder<P> {
    pub fn new(primitive: P) -> Self {
        Self {
            primitive,
            pcm: Box::new([0i16; MAX_SAMPLES_PER_FRAME]),
            pcm_len: 0,
        }
    }

    /// Decode the frame at the cursor. The cursor is not moved; the caller
    /// advances it by [`Frame::frame_bytes`].
    pub fn decode_next(&mut self, cursor: &StreamCursor<'_>) -> Frame {
        self.pcm_len = 0;
        if cursor.is_exhausted() {
            return Frame::End;
        }

        let (samples, info) = self
            .primitive
            .decode_frame(cursor.remaining_bytes(), Some(&mut *self.pcm));
        let frame = Frame::classify(samples, &info);

        if let Frame::Audio(meta) = &frame {
            self.pcm_len = meta.interleaved_samples().min(self.pcm.len());
        }
        frame
    }

    /// Interleaved samples of the last audio frame, empty otherwise.
    pub fn pcm(&self) -> &[i16] {
        &self.pcm[..self.pcm_len]
    }
}
