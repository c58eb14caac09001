//! Tracing subscriber setup.

use crate::ports::config_port::ConfigPort;

pub const LOG_ENV_VAR: &str = "PANICTRADER_LOG";

/// Install the global subscriber. `PANICTRADER_LOG` overrides `log_level`.
/// Output goes to stderr so stdout stays free for data.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    let filter = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if log_format.trim().eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}

/// Level and format from the `[logging]` section, defaulting to `info`/text.
pub fn logging_settings(config: &dyn ConfigPort) -> (String, String) {
    let level = config
        .get_string("logging", "level")
        .unwrap_or_else(|| "info".to_string());
    let format = config
        .get_string("logging", "format")
        .unwrap_or_else(|| "text".to_string());
    (level, format)
}
