// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Kubelet discovery configuration section.

use std::path::PathBuf;
use std::time::Duration;

use mountpod_kubelet::{
	KubeletClientConfig, TlsPolicy, DEFAULT_CA_FILE, DEFAULT_KUBELET_PORT, DEFAULT_TIMEOUT,
	DEFAULT_TOKEN_FILE,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";

/// Kubelet configuration layer (for merging).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KubeletConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub token_file: Option<PathBuf>,
	pub ca_file: Option<PathBuf>,
	/// Skip kubelet certificate verification. Off unless set explicitly.
	pub insecure_skip_verify: Option<bool>,
	pub timeout_secs: Option<u64>,
}

impl KubeletConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.token_file.is_some() {
			self.token_file = other.token_file;
		}
		if other.ca_file.is_some() {
			self.ca_file = other.ca_file;
		}
		if other.insecure_skip_verify.is_some() {
			self.insecure_skip_verify = other.insecure_skip_verify;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	/// Resolves this layer into a runtime configuration.
	pub fn resolve(self) -> Result<KubeletConfig, ConfigError> {
		let port = self.port.unwrap_or(DEFAULT_KUBELET_PORT);
		if port == 0 {
			return Err(ConfigError::Validation(
				"kubelet port must be non-zero".to_string(),
			));
		}

		let timeout = match self.timeout_secs {
			Some(0) => {
				return Err(ConfigError::Validation(
					"kubelet timeout_secs must be greater than zero".to_string(),
				))
			}
			Some(secs) => Duration::from_secs(secs),
			None => DEFAULT_TIMEOUT,
		};

		let tls = if self.insecure_skip_verify.unwrap_or(false) {
			TlsPolicy::InsecureSkipVerify
		} else {
			TlsPolicy::VerifyWithCa {
				ca_file: self
					.ca_file
					.unwrap_or_else(|| PathBuf::from(DEFAULT_CA_FILE)),
			}
		};

		Ok(KubeletConfig {
			host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
			port,
			client: KubeletClientConfig {
				token_file: self
					.token_file
					.unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
				tls,
				timeout,
			},
		})
	}
}

/// Kubelet configuration (runtime, resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeletConfig {
	pub host: String,
	pub port: u16,
	pub client: KubeletClientConfig,
}

impl Default for KubeletConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_KUBELET_PORT,
			client: KubeletClientConfig::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolve_defaults() {
		let config = KubeletConfigLayer::default().resolve().unwrap();
		assert_eq!(config, KubeletConfig::default());
		assert_eq!(config.port, 10250);
		assert!(matches!(config.client.tls, TlsPolicy::VerifyWithCa { .. }));
	}

	#[test]
	fn insecure_must_be_explicit() {
		let layer = KubeletConfigLayer {
			insecure_skip_verify: Some(true),
			ca_file: Some(PathBuf::from("/etc/kubelet/ca.crt")),
			..Default::default()
		};
		let config = layer.resolve().unwrap();
		assert_eq!(config.client.tls, TlsPolicy::InsecureSkipVerify);
	}

	#[test]
	fn custom_ca_file() {
		let layer = KubeletConfigLayer {
			ca_file: Some(PathBuf::from("/etc/kubelet/ca.crt")),
			..Default::default()
		};
		let config = layer.resolve().unwrap();
		assert_eq!(
			config.client.tls,
			TlsPolicy::VerifyWithCa {
				ca_file: PathBuf::from("/etc/kubelet/ca.crt")
			}
		);
	}

	#[test]
	fn zero_timeout_rejected() {
		let layer = KubeletConfigLayer {
			timeout_secs: Some(0),
			..Default::default()
		};
		assert!(matches!(layer.resolve(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn zero_port_rejected() {
		let layer = KubeletConfigLayer {
			port: Some(0),
			..Default::default()
		};
		assert!(matches!(layer.resolve(), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn merge_overwrites() {
		let mut base = KubeletConfigLayer {
			host: Some("10.0.0.1".to_string()),
			timeout_secs: Some(5),
			..Default::default()
		};
		base.merge(KubeletConfigLayer {
			host: Some("10.0.0.2".to_string()),
			..Default::default()
		});
		assert_eq!(base.host.as_deref(), Some("10.0.0.2"));
		assert_eq!(base.timeout_secs, Some(5));
	}
}
