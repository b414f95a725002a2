//! Tracing setup for native and web builds

/// Default filter when `RUST_LOG` is not set
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FILTER: &str = "info,wgpu_hal=warn,eframe=warn";

/// Initialize the global subscriber: fmt + `EnvFilter` on native.
/// With the `profiling` feature, `profiling` scopes show up as tracing spans.
#[cfg(not(target_arch = "wasm32"))]
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Initialize the global subscriber: browser console on web, with the level
/// taken from `?envLOG_LEVEL=...`.
#[cfg(target_arch = "wasm32")]
pub fn setup_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_wasm::WASMLayerConfigBuilder;

    let default_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let max_level = super::cli::get_env::<String>("LOG_LEVEL")
        .map(|level| parse_level(&level, default_level))
        .unwrap_or(default_level);

    let mut builder = WASMLayerConfigBuilder::new();
    builder.set_max_level(max_level);
    let _ = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(builder.build()))
        .try_init();
}

/// Level name, case-insensitive. Unknown names give `fallback`.
pub fn parse_level(name: &str, fallback: tracing::Level) -> tracing::Level {
    match name.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => fallback,
    }
}

pub fn short_version_info() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn log_version_info() {
    tracing::info!("{}", short_version_info());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug", Level::INFO), Level::DEBUG);
        assert_eq!(parse_level("Warn", Level::INFO), Level::WARN);
        assert_eq!(parse_level("loud", Level::ERROR), Level::ERROR);
    }

    #[test]
    fn test_version_info() {
        assert!(short_version_info().starts_with("workout-map "));
    }
}
