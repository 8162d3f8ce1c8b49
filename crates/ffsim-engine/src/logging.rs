//! Tracing subscriber setup for the binary

use crate::config::LogConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`. Output goes to stderr so
/// it never mixes with reports printed on stdout. Calling this twice keeps the
/// first subscriber.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        tracing::debug!("Subscriber already installed: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_first_subscriber() {
        init(&LogConfig::default());
        init(&LogConfig {
            filter: "not a [valid filter".to_string(),
            json: true,
        });
        tracing::info!("still logging");
    }
}
