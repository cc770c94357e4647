//! ALSA PCM playback sink.

use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};
use anyhow::{Context, Result};

use super::sink::{AudioSink, SampleEncoding, SinkFormat, SinkOpener};
use crate::error::Error;

/// Parameters negotiated with the ALSA hardware.
#[derive(Debug, Clone)]
pub struct AlsaParams {
    /// Actual sample rate after negotiation
    pub sample_rate: u32,
    /// Actual number of channels
    pub channels: u32,
    /// Period size in frames (one frame = channels × sample_width)
    pub period_size: usize,
}

/// Open a blocking PCM device for playback.
pub fn open_playback(
    device: &str,
    sample_rate: u32,
    channels: u32,
    period_size: Option<usize>,
) -> Result<(PCM, AlsaParams)> {
    let pcm = PCM::new(device, Direction::Playback, false)
        .with_context(|| format!("Failed to open PCM device '{}' for Playback", device))?;

    // Configure hardware parameters
    {
        let hwp = HwParams::any(&pcm).with_context(|| "Failed to initialize HwParams")?;
        hwp.set_access(Access::RWInterleaved)?;
        hwp.set_format(Format::S16LE)?;
        hwp.set_channels(channels)
            .with_context(|| format!("Device '{}' rejected {} channels", device, channels))?;
        hwp.set_rate_near(sample_rate, ValueOr::Nearest)?;
        if let Some(ps) = period_size {
            hwp.set_period_size_near(ps as alsa::pcm::Frames, ValueOr::Nearest)?;
        }
        pcm.hw_params(&hwp)?;
    }

    // Read back actual negotiated parameters
    let (actual_rate, actual_channels, period_size) = {
        let hwp = pcm.hw_params_current()?;
        let rate = hwp.get_rate()?;
        let ch = hwp.get_channels()?;
        let ps = hwp.get_period_size()? as usize;
        (rate, ch, ps)
    };

    let params = AlsaParams {
        sample_rate: actual_rate,
        channels: actual_channels,
        period_size,
    };

    log::info!(
        "ALSA Playback: device={}, rate={}, channels={}, period_size={}",
        device,
        actual_rate,
        actual_channels,
        period_size,
    );

    Ok((pcm, params))
}

/// Opens [`AlsaSink`]s on a fixed device.
#[derive(Debug, Clone)]
pub struct AlsaOpener {
    device: String,
    period_size: Option<usize>,
}

impl AlsaOpener {
    pub fn new(device: impl Into<String>, period_size: Option<usize>) -> Self {
        Self {
            device: device.into(),
            period_size,
        }
    }
}

impl SinkOpener for AlsaOpener {
    type Sink = AlsaSink;

    fn open(&mut self, format: &SinkFormat) -> crate::Result<AlsaSink> {
        match format.encoding {
            SampleEncoding::S16LE => {}
        }

        let (pcm, params) = open_playback(
            &self.device,
            format.sample_rate,
            format.channels,
            self.period_size,
        )
        .map_err(|e| Error::SinkUnavailable(format!("{:#}", e)))?;

        log::info!(
            "Encoder gave sample rate of {} Hz. We set it to {} Hz",
            format.sample_rate,
            params.sample_rate
        );

        Ok(AlsaSink { pcm, params })
    }
}

/// A blocking ALSA playback session. Dropping it closes the PCM handle.
pub struct AlsaSink {
    pcm: PCM,
    params: AlsaParams,
}

impl AudioSink for AlsaSink {
    fn write(&mut self, pcm_data: &[i16]) -> crate::Result<()> {
        let channels = self.params.channels.max(1) as usize;
        let io = self
            .pcm
            .io_i16()
            .map_err(|e| Error::SinkWriteFailed(e.to_string()))?;

        // writei may accept fewer frames than offered; keep going until
        // the whole buffer is queued.
        let total_frames = pcm_data.len() / channels;
        let mut frames_written = 0;
        while frames_written < total_frames {
            let offset = frames_written * channels;
            let n = io
                .writei(&pcm_data[offset..total_frames * channels])
                .map_err(|e| Error::SinkWriteFailed(e.to_string()))?;
            frames_written += n;
        }
        Ok(())
    }

    fn drain(&mut self) -> crate::Result<()> {
        self.pcm
            .drain()
            .map_err(|e| Error::SinkDrainFailed(e.to_string()))
    }
}
