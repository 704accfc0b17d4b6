use std::sync::Once;

use log::LevelFilter;

/// Logger configuration for hosts that let starfox install `env_logger`.
///
/// Filter precedence: `env_filter`, then `RUST_LOG`, then `default_level`.
/// Filters use the `env_logger` syntax, e.g. `"starfox=debug,starfox_uixml=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    /// Builder with the filter resolved against `rust_log`.
    fn builder(&self, rust_log: Option<&str>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        match self.env_filter.as_deref().or(rust_log) {
            Some(filter) => builder.parse_filters(filter),
            None => builder.filter_level(self.default_level),
        };
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Install `env_logger` as the global logger.
///
/// Only the first call does anything. If the host already installed a
/// logger, it is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        if config.builder(rust_log.as_deref()).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
