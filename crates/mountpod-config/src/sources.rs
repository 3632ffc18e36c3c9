// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where configuration layers come from.
//!
//! An agent reads exactly three layers, lowest precedence first: built-in
//! defaults, one TOML file, then `MOUNTPOD_<SECTION>_<FIELD>` variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::ConfigError;
use crate::layer::AgentConfigLayer;
use crate::sections::{KubeletConfigLayer, LoggingConfigLayer, TemplateConfigLayer};

/// Default location of the agent configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/juicefs-csi/mountpod.toml";

/// One configuration layer's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
	Defaults,
	/// A TOML file. A missing file contributes nothing.
	File(PathBuf),
	Environment,
}

impl ConfigSource {
	/// The sources applied by [`crate::load_config`], lowest precedence first.
	pub fn chain(file: Option<&Path>) -> [ConfigSource; 3] {
		let file = file.map_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH), Path::to_path_buf);
		[
			ConfigSource::Defaults,
			ConfigSource::File(file),
			ConfigSource::Environment,
		]
	}

	pub fn load(&self) -> Result<AgentConfigLayer, ConfigError> {
		match self {
			ConfigSource::Defaults => Ok(AgentConfigLayer::default()),
			ConfigSource::File(path) => file_layer(path),
			ConfigSource::Environment => env_layer(|name| std::env::var(name).ok()),
		}
	}
}

fn file_layer(path: &Path) -> Result<AgentConfigLayer, ConfigError> {
	let content = match std::fs::read_to_string(path) {
		Ok(content) => content,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			debug!(path = %path.display(), "config file not found, skipping");
			return Ok(AgentConfigLayer::default());
		}
		Err(source) => {
			return Err(ConfigError::FileRead {
				path: path.to_path_buf(),
				source,
			})
		}
	};

	debug!(path = %path.display(), "loaded config file");
	toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
		path: path.to_path_buf(),
		source,
	})
}

/// Build a layer from `MOUNTPOD_*` variables resolved through `lookup`.
///
/// Empty values count as unset, except the priority class where an empty
/// value clears the default.
pub(crate) fn env_layer<F>(lookup: F) -> Result<AgentConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let env = EnvLookup(lookup);

	let kubelet = KubeletConfigLayer {
		host: env.string("MOUNTPOD_KUBELET_HOST"),
		port: env.parse("MOUNTPOD_KUBELET_PORT")?,
		token_file: env.string("MOUNTPOD_KUBELET_TOKEN_FILE").map(PathBuf::from),
		ca_file: env.string("MOUNTPOD_KUBELET_CA_FILE").map(PathBuf::from),
		insecure_skip_verify: env.flag("MOUNTPOD_KUBELET_INSECURE_SKIP_VERIFY"),
		timeout_secs: env.parse("MOUNTPOD_KUBELET_TIMEOUT_SECS")?,
	};

	let template = TemplateConfigLayer {
		namespace: env.string("MOUNTPOD_TEMPLATE_NAMESPACE"),
		node_name: env.string("MOUNTPOD_TEMPLATE_NODE_NAME"),
		image: env.string("MOUNTPOD_TEMPLATE_IMAGE"),
		mount_container_name: env.string("MOUNTPOD_TEMPLATE_MOUNT_CONTAINER_NAME"),
		format_container_name: env.string("MOUNTPOD_TEMPLATE_FORMAT_CONTAINER_NAME"),
		mount_command: env
			.string("MOUNTPOD_TEMPLATE_MOUNT_COMMAND")
			.map(|v| v.split_whitespace().map(str::to_string).collect()),
		priority_class_name: (env.0)("MOUNTPOD_TEMPLATE_PRIORITY_CLASS_NAME"),
		host_mount_point_path: env.string("MOUNTPOD_TEMPLATE_HOST_MOUNT_POINT_PATH"),
		host_config_root_path: env.string("MOUNTPOD_TEMPLATE_HOST_CONFIG_ROOT_PATH"),
		pod_mount_base: env.string("MOUNTPOD_TEMPLATE_POD_MOUNT_BASE"),
		config_root_mount_path: env.string("MOUNTPOD_TEMPLATE_CONFIG_ROOT_MOUNT_PATH"),
	};

	let logging = LoggingConfigLayer {
		level: env.parse("MOUNTPOD_LOGGING_LEVEL")?,
		format: env.parse("MOUNTPOD_LOGGING_FORMAT")?,
	};

	Ok(AgentConfigLayer {
		kubelet: Some(kubelet),
		template: Some(template),
		logging: Some(logging),
	})
}

struct EnvLookup<F>(F);

impl<F: Fn(&str) -> Option<String>> EnvLookup<F> {
	fn string(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn flag(&self, name: &str) -> Option<bool> {
		self.string(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		self.string(name)
			.map(|v| {
				v.parse().map_err(|e| ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("'{v}': {e}"),
				})
			})
			.transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	use crate::sections::{LogFormat, LogLevel};

	fn env_from(vars: &[(&str, &str)]) -> Result<AgentConfigLayer, ConfigError> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		env_layer(|name| vars.get(name).cloned())
	}

	#[test]
	fn chain_applies_file_between_defaults_and_environment() {
		let chain = ConfigSource::chain(Some(Path::new("/tmp/agent.toml")));
		assert_eq!(
			chain,
			[
				ConfigSource::Defaults,
				ConfigSource::File(PathBuf::from("/tmp/agent.toml")),
				ConfigSource::Environment,
			]
		);
	}

	#[test]
	fn chain_defaults_to_system_file() {
		let chain = ConfigSource::chain(None);
		assert_eq!(chain[1], ConfigSource::File(PathBuf::from(SYSTEM_CONFIG_PATH)));
	}

	#[test]
	fn missing_file_is_skipped() {
		let layer = ConfigSource::File(PathBuf::from("/nonexistent/mountpod.toml"))
			.load()
			.unwrap();
		assert!(layer.kubelet.is_none());
	}

	#[test]
	fn file_is_parsed() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[kubelet]
port = 10255
timeout_secs = 3

[template]
namespace = "juicefs"
mount_command = ["/bin/mount.juicefs", "--foreground"]
"#
		)
		.unwrap();

		let layer = ConfigSource::File(file.path().to_path_buf()).load().unwrap();

		let kubelet = layer.kubelet.unwrap();
		assert_eq!(kubelet.port, Some(10255));
		assert_eq!(kubelet.timeout_secs, Some(3));
		let template = layer.template.unwrap();
		assert_eq!(template.namespace.as_deref(), Some("juicefs"));
		assert_eq!(template.mount_command.map(|c| c.len()), Some(2));
	}

	#[test]
	fn invalid_file_reports_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[kubelet\nport = ").unwrap();

		let err = ConfigSource::File(file.path().to_path_buf())
			.load()
			.unwrap_err();
		match err {
			ConfigError::TomlParse { path, .. } => assert_eq!(path, file.path()),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn env_reads_every_section() {
		let layer = env_from(&[
			("MOUNTPOD_KUBELET_HOST", "10.0.0.7"),
			("MOUNTPOD_KUBELET_PORT", "10255"),
			("MOUNTPOD_KUBELET_INSECURE_SKIP_VERIFY", "TRUE"),
			("MOUNTPOD_TEMPLATE_NODE_NAME", "node-a"),
			("MOUNTPOD_TEMPLATE_MOUNT_COMMAND", "/bin/mount.juicefs  --foreground"),
			("MOUNTPOD_LOGGING_LEVEL", "debug"),
			("MOUNTPOD_LOGGING_FORMAT", "json"),
		])
		.unwrap();

		let kubelet = layer.kubelet.unwrap();
		assert_eq!(kubelet.host.as_deref(), Some("10.0.0.7"));
		assert_eq!(kubelet.port, Some(10255));
		assert_eq!(kubelet.insecure_skip_verify, Some(true));
		let template = layer.template.unwrap();
		assert_eq!(template.node_name.as_deref(), Some("node-a"));
		assert_eq!(
			template.mount_command,
			Some(vec!["/bin/mount.juicefs".to_string(), "--foreground".to_string()])
		);
		let logging = layer.logging.unwrap();
		assert_eq!(logging.level, Some(LogLevel::Debug));
		assert_eq!(logging.format, Some(LogFormat::Json));
	}

	#[test]
	fn env_empty_values_are_unset() {
		let layer = env_from(&[("MOUNTPOD_KUBELET_HOST", ""), ("MOUNTPOD_KUBELET_PORT", "")]).unwrap();
		let kubelet = layer.kubelet.unwrap();
		assert!(kubelet.host.is_none());
		assert!(kubelet.port.is_none());
	}

	#[test]
	fn env_empty_priority_class_is_kept() {
		let layer = env_from(&[("MOUNTPOD_TEMPLATE_PRIORITY_CLASS_NAME", "")]).unwrap();
		assert_eq!(
			layer.template.unwrap().priority_class_name.as_deref(),
			Some("")
		);
	}

	#[test]
	fn env_invalid_number_names_the_variable() {
		let err = env_from(&[("MOUNTPOD_KUBELET_PORT", "kubelet")]).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, message } => {
				assert_eq!(key, "MOUNTPOD_KUBELET_PORT");
				assert!(message.contains("'kubelet'"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
