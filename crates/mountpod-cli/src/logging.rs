// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use mountpod_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(logging: &LoggingConfig) {
	let filter = env_filter(logging);

	// Logs go to stderr; stdout carries command output.
	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

/// Subscriber for the configuration load itself, scoped with
/// [`tracing::subscriber::with_default`] until [`init_tracing`] runs.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
	tracing_subscriber::registry()
		.with(env_filter(&LoggingConfig::default()))
		.with(fmt::layer().compact().with_writer(std::io::stderr))
}

fn env_filter(logging: &LoggingConfig) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(logging)))
}

fn default_directive(logging: &LoggingConfig) -> String {
	let level = logging.level.as_str();
	format!("mountpod={level},mountpod_kubelet={level},mountpod_config={level},warn")
}

#[cfg(test)]
mod tests {
	use super::*;
	use mountpod_config::LogLevel;

	#[test]
	fn directive_scopes_level_to_agent_crates() {
		let logging = LoggingConfig {
			level: LogLevel::Debug,
			format: LogFormat::Pretty,
		};
		let directive = default_directive(&logging);
		assert!(directive.contains("mountpod_kubelet=debug"));
		assert!(directive.ends_with(",warn"));
		assert!(EnvFilter::try_new(directive).is_ok());
	}

	#[test]
	fn bootstrap_subscriber_captures_config_loading() {
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		tracing::subscriber::with_default(bootstrap_subscriber(), || {
			assert!(tracing::enabled!(target: "mountpod_config", tracing::Level::INFO));
			assert!(!tracing::enabled!(target: "mountpod_config", tracing::Level::DEBUG));
		});
	}
}
