// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the mount pod agent.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Resolution into the runtime types of `mountpod-kubelet` and `mountpod-builder`
//! - Consistent environment variable naming (`MOUNTPOD_*`)

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

use std::path::Path;

use mountpod_builder::PodTemplate;
use tracing::{debug, info};

pub use error::ConfigError;
pub use layer::AgentConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, SYSTEM_CONFIG_PATH};

/// Fully resolved agent configuration.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
	pub kubelet: KubeletConfig,
	pub template: PodTemplate,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`MOUNTPOD_*`)
/// 2. Config file (`path`, or the system file when `None`)
/// 3. Built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
	let mut merged = AgentConfigLayer::default();
	for source in ConfigSource::chain(path) {
		debug!(?source, "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: AgentConfigLayer) -> Result<AgentConfig, ConfigError> {
	let kubelet = layer.kubelet.unwrap_or_default().resolve()?;
	let template = layer.template.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		kubelet_host = %kubelet.host,
		kubelet_port = kubelet.port,
		namespace = %template.namespace,
		node_name = %template.node_name,
		image = %template.image,
		"Agent configuration loaded"
	);

	Ok(AgentConfig {
		kubelet,
		template,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finalize_empty_layer_uses_defaults() {
		let config = finalize(AgentConfigLayer::default()).unwrap();
		assert_eq!(config.kubelet, KubeletConfig::default());
		assert_eq!(config.template, PodTemplate::default());
		assert_eq!(config.logging, LoggingConfig::default());
	}

	#[test]
	fn finalize_propagates_validation_errors() {
		let layer = AgentConfigLayer {
			kubelet: Some(KubeletConfigLayer {
				timeout_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(finalize(layer).is_err());
	}

	#[test]
	fn file_layer_overrides_defaults() {
		let mut merged = ConfigSource::Defaults.load().unwrap();
		merged.merge(
			toml::from_str(
				r#"
[template]
node_name = "node-a"

[logging]
format = "json"
"#,
			)
			.unwrap(),
		);

		let config = finalize(merged).unwrap();
		assert_eq!(config.template.node_name, "node-a");
		assert_eq!(config.logging.format, LogFormat::Json);
		assert_eq!(config.kubelet.port, 10250);
	}
}
