//! Safe wrapper around minimp3's frame decoder.

use std::ffi::c_int;
use std::mem;
use std::ptr;

use minimp3_sys as ffi;

use super::frame_decoder::{FrameInfo, FramePrimitive, PcmFrame};

/// One minimp3 decoder context (sync state + bit reservoir).
pub struct Mp3Decoder {
    state: Box<ffi::mp3dec_t>,
}

// mp3dec_t is plain data owned by this wrapper and never shared
unsafe impl Send for Mp3Decoder {}

impl Mp3Decoder {
    pub fn new() -> Self {
        let mut state: Box<ffi::mp3dec_t> = Box::new(unsafe { mem::zeroed() });
        unsafe {
            ffi::mp3dec_init(&mut *state);
        }
        Self { state }
    }

    /// Decode the first frame in `data`, writing interleaved samples into
    /// `pcm` when given.
    ///
    /// Returns `(samples_per_channel, info)`.
    pub fn decode(&mut self, data: &[u8], pcm: Option<&mut PcmFrame>) -> (usize, FrameInfo) {
        let mut info: ffi::mp3dec_frame_info_t = unsafe { mem::zeroed() };

        // minimp3 takes the length as a C int; larger inputs are simply
        // seen as truncated, the cursor feeds the rest on later calls.
        let len = data.len().min(c_int::MAX as usize) as c_int;
        let pcm_ptr = match pcm {
            Some(buf) => buf.as_mut_ptr(),
            // header-only parse, minimp3 skips decoding on a null buffer
            None => ptr::null_mut(),
        };

        let samples = unsafe {
            ffi::mp3dec_decode_frame(
                &mut *self.state,
                data.as_ptr(),
                len as _,
                pcm_ptr as _,
                &mut info,
            )
        };

        let info = FrameInfo {
            frame_bytes: info.frame_bytes.max(0) as usize,
            channels: info.channels.max(0) as u32,
            sample_rate: info.hz.max(0) as u32,
            layer: info.layer.max(0) as u32,
            bitrate_kbps: info.bitrate_kbps.max(0) as u32,
        };
        (samples.max(0) as usize, info)
    }
}

impl Default for Mp3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePrimitive for Mp3Decoder {
    fn decode_frame(&mut self, data: &[u8], pcm: Option<&mut PcmFrame>) -> (usize, FrameInfo) {
        self.decode(data, pcm)
    }

    fn reset(&mut self) {
        unsafe {
            ffi::mp3dec_init(&mut *self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::frame_decoder::MAX_SAMPLES_PER_FRAME;

    #[test]
    fn empty_input_consumes_nothing() {
        let mut decoder = Mp3Decoder::new();
        let mut pcm = [0i16; MAX_SAMPLES_PER_FRAME];
        let (samples, info) = decoder.decode(&[], Some(&mut pcm));
        assert_eq!(samples, 0);
        assert_eq!(info.frame_bytes, 0);
    }

    #[test]
    fn junk_yields_no_samples() {
        let mut decoder = Mp3Decoder::new();
        let mut pcm = [0i16; MAX_SAMPLES_PER_FRAME];
        let (samples, _) = decoder.decode(&[0u8; 100], Some(&mut pcm));
        assert_eq!(samples, 0);
    }
}
