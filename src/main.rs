use anyhow::Context;
use clap::Parser;

use mp3pa::audio::{AlsaOpener, Mp3Decoder};
use mp3pa::cli::Args;
use mp3pa::config::Config;
use mp3pa::input::InputSource;
use mp3pa::playback::{PlaybackMode, Session};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 加载配置
    let mut config = Config::new().map_err(anyhow::Error::msg)?;
    args.apply(&mut config);

    // 初始化日志
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level))
        .init();

    log::info!("{} {}", config.app_name, config.app_version);

    let mode = args.mode()?;

    // input outlives the session, so it is released after the decoder and the sink
    let input = InputSource::open(&args.file)?;
    if input.is_empty() {
        log::warn!("'{}' is empty", input.path().display());
    }

    let opener = AlsaOpener::new(config.playback_device.clone(), config.period_size());
    let session = Session::new(mode, Mp3Decoder::new(), opener);

    let report = session
        .run(input.bytes())
        .with_context(|| format!("Playback of '{}' failed", input.path().display()))?;

    match mode {
        PlaybackMode::Windowed { start, end } => log::info!(
            "Done: window {}s .. {}s of {} frames, {:.2}s rendered",
            start,
            end,
            report.audio_frames,
            report.seconds_rendered(),
        ),
        _ => log::info!(
            "Done: {} frames ({} audio, {} skipped), {} of {} bytes consumed, {:.2}s rendered",
            report.frames,
            report.audio_frames,
            report.non_audio_frames,
            report.bytes_consumed,
            input.len(),
            report.seconds_rendered(),
        ),
    }
    Ok(())
}
