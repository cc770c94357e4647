//! Sample-accurate random access over an in-memory MPEG audio stream.
//!
//! Opening scans the stream once in header-only mode and records where
//! every audio frame starts, both in bytes and in interleaved samples.
//! Seeking restarts the decoder a couple of frames ahead of the target so
//! the bit reservoir is primed, then throws away everything before the
//! target sample. A priming frame may decode to nothing while the
//! reservoir is still empty; that is expected and not an error.

use super::cursor::StreamCursor;
use super::frame_decoder::{Frame, FramePrimitive, MAX_SAMPLES_PER_FRAME, PcmFrame};
use super::sink::SinkFormat;
use crate::error::{Error, Result};

/// Frames decoded and discarded ahead of a seek target.
const PREDECODE_FRAMES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    /// Where decoding of this frame starts (junk before it included)
    offset: usize,
    /// First interleaved sample of this frame
    sample_start: u64,
    /// Interleaved samples in this frame
    samples: usize,
}

pub struct SeekableDecoder<'a, P: FramePrimitive> {
    data: &'a [u8],
    primitive: P,
    format: SinkFormat,
    index: Vec<IndexEntry>,
    total_samples: u64,

    next_frame: usize,
    /// Index of the frame holding the seek target
    target_frame: usize,
    /// Interleaved sample position of `pending[pending_pos]`
    position: u64,
    /// Samples before this position are dropped
    target: u64,
    pending: Box<PcmFrame>,
    pending_len: usize,
    pending_pos: usize,
    last_error: Option<String>,
}

impl<'a, P: FramePrimitive> SeekableDecoder<'a, P> {
    pub fn open(data: &'a [u8], mut primitive: P) -> Result<Self> {
        let mut cursor = StreamCursor::new(data);
        let mut index = Vec::new();
        let mut format = None;
        let mut total_samples = 0u64;

        while !cursor.is_exhausted() {
            let offset = cursor.position();
            let (samples, info) = primitive.decode_frame(cursor.remaining_bytes(), None);
            let frame = Frame::classify(samples, &info);
            match frame {
                Frame::Audio(meta) => {
                    if format.is_none() {
                        log::debug!(
                            "First audio frame at byte {}: layer {}, {} kbps",
                            offset,
                            info.layer,
                            info.bitrate_kbps
                        );
                        format = Some(meta.format());
                    }
                    let samples = meta.interleaved_samples();
                    index.push(IndexEntry {
                        offset,
                        sample_start: total_samples,
                        samples,
                    });
                    total_samples += samples as u64;
                }
                Frame::NonAudio { .. } => {}
                Frame::End => break,
            }
            cursor.advance(frame.frame_bytes())?;
        }

        let format = format.ok_or(Error::NoAudio)?;
        primitive.reset();

        log::debug!(
            "Indexed {} frames, {} samples, {}",
            index.len(),
            total_samples,
            format
        );

        Ok(Self {
            data,
            primitive,
            format,
            index,
            total_samples,
            next_frame: 0,
            target_frame: 0,
            position: 0,
            target: 0,
            pending: Box::new([0i16; MAX_SAMPLES_PER_FRAME]),
            pending_len: 0,
            pending_pos: 0,
            last_error: None,
        })
    }

    /// Format of the first audio frame.
    pub fn format(&self) -> SinkFormat {
        self.format
    }

    /// Interleaved samples in the whole stream.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn frame_count(&self) -> usize {
        self.index.len()
    }

    /// Error raised by the last `read`, if it stopped early because of one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Position the decoder so the next `read` starts at interleaved
    /// sample `offset`. `offset == total_samples()` is the end of stream.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.total_samples {
            return Err(Error::SeekOutOfRange {
                offset,
                total: self.total_samples,
            });
        }

        let target_frame = self
            .index
            .partition_point(|e| e.sample_start + e.samples as u64 <= offset);
        let start_frame = target_frame.saturating_sub(PREDECODE_FRAMES);

        self.primitive.reset();
        self.next_frame = start_frame;
        self.target_frame = target_frame;
        self.position = self
            .index
            .get(start_frame)
            .map_or(self.total_samples, |e| e.sample_start);
        self.target = offset;
        self.pending_len = 0;
        self.pending_pos = 0;
        self.last_error = None;
        Ok(())
    }

    /// Append up to `max` samples to `out`. Returns how many were added.
    ///
    /// A short count with [`last_error`](Self::last_error) unset is the end
    /// of the stream.
    pub fn read(&mut self, out: &mut Vec<i16>, max: usize) -> usize {
        let mut read = 0;

        while read < max {
            if self.pending_pos == self.pending_len && !self.decode_next_frame() {
                break;
            }

            let available = &self.pending[self.pending_pos..self.pending_len];
            let skip = (self.target.saturating_sub(self.position) as usize).min(available.len());
            let take = (available.len() - skip).min(max - read);
            out.extend_from_slice(&available[skip..skip + take]);

            self.pending_pos += skip + take;
            self.position += (skip + take) as u64;
            read += take;
        }
        read
    }

    fn decode_next_frame(&mut self) -> bool {
        let Some(entry) = self.index.get(self.next_frame).copied() else {
            return false;
        };

        let (samples, info) = self
            .primitive
            .decode_frame(&self.data[entry.offset..], Some(&mut *self.pending));
        match Frame::classify(samples, &info) {
            // reservoir not filled yet, the frame only primes the decoder
            Frame::NonAudio { .. } if self.next_frame < self.target_frame => {
                log::trace!("Priming frame {} decoded to nothing", self.next_frame);
                self.next_frame += 1;
                self.position += entry.samples as u64;
                self.pending_len = 0;
                self.pending_pos = 0;
                true
            }
            Frame::Audio(meta) => {
                self.next_frame += 1;
                self.pending_len = meta.interleaved_samples().min(self.pending.len());
                self.pending_pos = 0;
                if self.pending_len != entry.samples {
                    log::warn!(
                        "Frame {} decoded to {} samples, index says {}",
                        self.next_frame - 1,
                        self.pending_len,
                        entry.samples
                    );
                }
                true
            }
            other => {
                self.last_error = Some(format!(
                    "frame {} at byte {} failed to decode ({:?})",
                    self.next_frame, entry.offset, other
                ));
                false
            }
        }
    }
}
