#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: &'static str,
    pub app_version: &'static str,

    // 播放设备配置
    pub playback_device: String,
    /// ALSA period size in frames (0 = let ALSA decide)
    pub playback_period_size: usize,

    /// Default env_logger filter when RUST_LOG is unset
    pub log_level: &'static str,
}

impl Config {
    /// 从编译时设置的环境变量创建配置
    /// 所有参数都在编译时从 config.toml 中读取
    pub fn new() -> Result<Self, &'static str> {
        Ok(Self {
            app_name: env!("APP_NAME"),
            app_version: env!("APP_VERSION"),

            playback_device: env!("PLAYBACK_DEVICE").to_string(),
            playback_period_size: env!("PLAYBACK_PERIOD_SIZE").parse()
                .map_err(|_| "Failed to parse PLAYBACK_PERIOD_SIZE")?,

            log_level: env!("LOG_LEVEL"),
        })
    }

    /// `None` when the period size is left to ALSA.
    pub fn period_size(&self) -> Option<usize> {
        if self.playback_period_size > 0 {
            Some(self.playback_period_size)
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new().expect("Failed to create default Config from build-time environment variables")
    }
}
