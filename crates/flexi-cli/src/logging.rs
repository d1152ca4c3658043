use std::sync::Once;

/// How the `flexi` binary sets up its logger.
///
/// Logs always go to stderr so compiled templates printed on stdout can be
/// piped untouched.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter from `--log`, e.g. `flexi_dsl=trace`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: Option<String>) -> Self {
        Self { env_filter: filter, ..Self::default() }
    }
}

static INIT: Once = Once::new();

/// Filter precedence: `--log`, then `RUST_LOG`, then warnings only.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Warn);
            }
        }

        builder
            .write_style(config.write_style)
            .target(env_logger::Target::Stderr)
            .init();

        log::debug!("flexi logger ready");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_comes_from_the_flag() {
        let config = LoggingConfig::with_filter(Some("flexi_dsl=trace".into()));
        assert_eq!(config.env_filter.as_deref(), Some("flexi_dsl=trace"));
        assert!(LoggingConfig::default().env_filter.is_none());
    }
}
