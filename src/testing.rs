//! Test doubles: a synthetic frame format and a recording sink.
//!
//! Synthetic frame layout: `[tag, frame_len, samples_per_channel, channels,
//! seed, padding..]`. Tag `A` is audio, `N` non-audio, `X` an audio frame
//! whose header parses but whose body fails to decode. Tag `R` is an audio
//! frame that borrows from the bit reservoir: right after a reset it decodes
//! to nothing, like a real decoder with an empty reservoir. Anything else
//! ends the stream. Sample `j` of an audio frame has the value
//! `seed * 1000 + j`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::audio::frame_decoder::{FrameInfo, FramePrimitive, PcmFrame};
use crate::audio::sink::{AudioSink, SinkFormat, SinkOpener};
use crate::error::{Error, Result};

pub const FAKE_RATE: u32 = 1000;
const HEADER_LEN: usize = 5;

pub fn audio_frame(samples: u8, channels: u8, seed: u8) -> Vec<u8> {
    frame(b'A', HEADER_LEN + 3, samples, channels, seed)
}

pub fn reservoir_frame(samples: u8, channels: u8, seed: u8) -> Vec<u8> {
    frame(b'R', HEADER_LEN + 3, samples, channels, seed)
}

pub fn non_audio_frame(len: u8) -> Vec<u8> {
    assert!(len as usize >= HEADER_LEN);
    frame(b'N', len as usize, 0, 0, 0)
}

pub fn corrupt_frame(samples: u8, channels: u8) -> Vec<u8> {
    frame(b'X', HEADER_LEN + 3, samples, channels, 0)
}

fn frame(tag: u8, len: usize, samples: u8, channels: u8, seed: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    bytes[0] = tag;
    bytes[1] = len as u8;
    bytes[2] = samples;
    bytes[3] = channels;
    bytes[4] = seed;
    bytes
}

pub fn expected_pcm(samples: usize, channels: usize, seed: i16) -> Vec<i16> {
    (0..samples * channels).map(|j| seed * 1000 + j as i16).collect()
}

/// Calls seen by a [`FakePrimitive`], readable after it has been moved
/// into a decoder.
#[derive(Debug, Default)]
pub struct PrimitiveLog {
    pub resets: Cell<usize>,
    /// Full decodes, header-only parses excluded
    pub decodes: Cell<usize>,
}

/// Decodes the synthetic format above.
#[derive(Debug, Default)]
pub struct FakePrimitive {
    log: Rc<PrimitiveLog>,
    decoded_since_reset: usize,
}

impl FakePrimitive {
    pub fn log(&self) -> Rc<PrimitiveLog> {
        self.log.clone()
    }
}

impl FramePrimitive for FakePrimitive {
    fn decode_frame(&mut self, data: &[u8], pcm: Option<&mut PcmFrame>) -> (usize, FrameInfo) {
        if data.len() < HEADER_LEN {
            return (0, FrameInfo::default());
        }
        let (tag, len) = (data[0], data[1] as usize);
        let (samples, channels, seed) = (data[2] as usize, data[3] as u32, data[4] as i16);
        let info = FrameInfo {
            frame_bytes: len,
            channels,
            sample_rate: FAKE_RATE,
            layer: 3,
            bitrate_kbps: 0,
        };

        let primed = self.decoded_since_reset > 0;
        if pcm.is_some() {
            self.log.decodes.set(self.log.decodes.get() + 1);
            self.decoded_since_reset += 1;
        }

        match (tag, pcm) {
            (b'N', _) => (0, info),
            (b'A' | b'X' | b'R', None) => (samples, info),
            (b'R', Some(_)) if !primed => (0, info),
            (b'A' | b'R', Some(out)) => {
                for (j, s) in out[..samples * channels as usize].iter_mut().enumerate() {
                    *s = seed * 1000 + j as i16;
                }
                (samples, info)
            }
            (b'X', Some(_)) => (0, info),
            _ => (0, FrameInfo::default()),
        }
    }

    fn reset(&mut self) {
        self.log.resets.set(self.log.resets.get() + 1);
        self.decoded_since_reset = 0;
    }
}

#[derive(Debug, Default)]
pub struct SinkLog {
    pub opens: Vec<SinkFormat>,
    pub written: Vec<i16>,
    pub write_calls: usize,
    pub drains: usize,
    pub closed: bool,
}

/// Opens [`RecordingSink`]s that share one [`SinkLog`].
#[derive(Debug, Default)]
pub struct RecordingOpener {
    log: Rc<RefCell<SinkLog>>,
    fail_open: bool,
    fail_write: bool,
    fail_drain: bool,
}

impl RecordingOpener {
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub fn failing_write() -> Self {
        Self {
            fail_write: true,
            ..Default::default()
        }
    }

    pub fn failing_drain() -> Self {
        Self {
            fail_drain: true,
            ..Default::default()
        }
    }

    pub fn log(&self) -> Rc<RefCell<SinkLog>> {
        self.log.clone()
    }
}

impl SinkOpener for RecordingOpener {
    type Sink = RecordingSink;

    fn open(&mut self, format: &SinkFormat) -> Result<RecordingSink> {
        if self.fail_open {
            return Err(Error::SinkUnavailable("no such device".into()));
        }
        self.log.borrow_mut().opens.push(*format);
        Ok(RecordingSink {
            log: self.log.clone(),
            fail_write: self.fail_write,
            fail_drain: self.fail_drain,
        })
    }
}

#[derive(Debug)]
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
    fail_write: bool,
    fail_drain: bool,
}

impl AudioSink for RecordingSink {
    fn write(&mut self, pcm: &[i16]) -> Result<()> {
        if self.fail_write {
            return Err(Error::SinkWriteFailed("broken pipe".into()));
        }
        let mut log = self.log.borrow_mut();
        log.write_calls += 1;
        log.written.extend_from_slice(pcm);
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        if self.fail_drain {
            return Err(Error::SinkDrainFailed("device unplugged".into()));
        }
        self.log.borrow_mut().drains += 1;
        Ok(())
    }
}

impl Drop for RecordingSink {
    fn drop(&mut self) {
        self.log.borrow_mut().closed = true;
    }
}
