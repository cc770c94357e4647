//! Output sink traits and the one-shot format negotiation.

use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    S16LE,
}

/// Format requested from the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkFormat {
    pub sample_rate: u32,
    pub channels: u32,
    pub encoding: SampleEncoding,
}

impl SinkFormat {
    pub fn s16le(sample_rate: u32, channels: u32) -> Self {
        Self {
            sample_rate,
            channels,
            encoding: SampleEncoding::S16LE,
        }
    }
}

impl fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {:?}",
            self.sample_rate, self.channels, self.encoding
        )
    }
}

/// A live output session. Writes block until the device has queued the
/// data; dropping the sink closes it.
pub trait AudioSink {
    /// Write interleaved samples.
    fn write(&mut self, pcm: &[i16]) -> Result<()>;

    /// Block until everything written so far has been played.
    fn drain(&mut self) -> Result<()>;
}

/// Opens output sessions for a given format.
pub trait SinkOpener {
    type Sink: AudioSink;

    fn open(&mut self, format: &SinkFormat) -> Result<Self::Sink>;
}

/// Opens the sink at most once per session, on the first format it is
/// asked for.
pub struct SinkNegotiator<O: SinkOpener> {
    opener: O,
    sink: Option<O::Sink>,
    format: Option<SinkFormat>,
    opens: usize,
}

impl<O: SinkOpener> SinkNegotiator<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            sink: None,
            format: None,
            opens: 0,
        }
    }

    /// Open the sink with `format` on the first call; later calls return
    /// the existing sink and ignore `format`.
    pub fn ensure_open(&mut self, format: SinkFormat) -> Result<&mut O::Sink> {
        let sink = match self.sink.take() {
            Some(sink) => {
                if self.format != Some(format) {
                    log::debug!(
                        "Ignoring format change to {} (sink already open)",
                        format
                    );
                }
                sink
            }
            None => {
                let sink = self.opener.open(&format)?;
                self.opens += 1;
                self.format = Some(format);
                sink
            }
        };
        Ok(self.sink.insert(sink))
    }

    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Drain the sink if one was opened. No-op otherwise.
    pub fn drain(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.drain(),
            None => Ok(()),
        }
    }

    pub fn format(&self) -> Option<SinkFormat> {
        self.format
    }

    /// Number of times the underlying device was opened.
    pub fn opens(&self) -> usize {
        self.opens
    }
}
