//! audio - Compressed stream decoding and PCM output
//!
//! Decodes MPEG audio with minimp3 and plays the interleaved 16-bit PCM
//! through ALSA. The decoder and the device sit behind the
//! `FramePrimitive` and `SinkOpener` traits so the playback core can run
//! against anything that speaks them.

mod alsa_device;
pub mod cursor;
pub mod frame_decoder;
mod minimp3;
pub mod seekable;
pub mod sink;

pub use alsa_device::{AlsaOpener, AlsaParams, AlsaSink};
pub use cursor::StreamCursor;
pub use frame_decoder::{
    Frame, FrameDecoder, FrameInfo, FrameMetadata, FramePrimitive, PcmFrame,
};
pub use minimp3::Mp3Decoder;
pub use seekable::SeekableDecoder;
pub use sink::{AudioSink, SampleEncoding, SinkFormat, SinkNegotiator, SinkOpener};
