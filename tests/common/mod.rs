//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use mp3pa::audio::{AudioSink, SinkFormat, SinkOpener};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, no CRC, no padding.
const SILENT_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
pub const SILENT_FRAME_BYTES: usize = 417;
pub const SAMPLES_PER_FRAME: usize = 1152;
pub const RATE: u32 = 44100;
pub const CHANNELS: u32 = 2;

/// `count` back-to-back silent frames. Zeroed side info means every
/// granule is empty, so each frame decodes to digital silence without
/// needing any bit reservoir from earlier frames.
pub fn silent_mp3(count: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * SILENT_FRAME_BYTES);
    for _ in 0..count {
        let mut frame = vec![0u8; SILENT_FRAME_BYTES];
        frame[..4].copy_from_slice(&SILENT_HEADER);
        data.extend(frame);
    }
    data
}

/// Like [`silent_mp3`], but every frame after the first sets
/// `main_data_begin = 1`, so it can only be decoded once the previous frame
/// has filled the bit reservoir.
pub fn reservoir_mp3(count: usize) -> Vec<u8> {
    let mut data = silent_mp3(count);
    for frame in data.chunks_mut(SILENT_FRAME_BYTES).skip(1) {
        // side info starts right after the header; the top bit of its
        // second byte is the low bit of main_data_begin
        frame[5] = 0x80;
    }
    data
}

/// Duration of `frames` silent frames, in seconds.
pub fn duration(frames: usize) -> f64 {
    (frames * SAMPLES_PER_FRAME) as f64 / RATE as f64
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub opens: Vec<SinkFormat>,
    pub samples: Vec<i16>,
    pub writes: usize,
    pub drains: usize,
    pub closed: bool,
}

#[derive(Default)]
pub struct Recorder {
    state: Rc<RefCell<Recorded>>,
}

impl Recorder {
    pub fn state(&self) -> Rc<RefCell<Recorded>> {
        self.state.clone()
    }
}

impl SinkOpener for Recorder {
    type Sink = RecorderSink;

    fn open(&mut self, format: &SinkFormat) -> mp3pa::Result<RecorderSink> {
        self.state.borrow_mut().opens.push(*format);
        Ok(RecorderSink {
            state: self.state.clone(),
        })
    }
}

pub struct RecorderSink {
    state: Rc<RefCell<Recorded>>,
}

impl AudioSink for RecorderSink {
    fn write(&mut self, pcm: &[i16]) -> mp3pa::Result<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.samples.extend_from_slice(pcm);
        Ok(())
    }

    fn drain(&mut self) -> mp3pa::Result<()> {
        self.state.borrow_mut().drains += 1;
        Ok(())
    }
}

impl Drop for RecorderSink {
    fn drop(&mut self) {
        self.state.borrow_mut().closed = true;
    }
}
