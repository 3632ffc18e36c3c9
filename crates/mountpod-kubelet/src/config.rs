// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Transport configuration for the kubelet client.

use std::path::PathBuf;
use std::time::Duration;

/// Service account token mounted into every pod.
pub const DEFAULT_TOKEN_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
/// Cluster CA bundle mounted next to the service account token.
pub const DEFAULT_CA_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
/// Kubelet's authenticated HTTPS port.
pub const DEFAULT_KUBELET_PORT: u16 = 10250;
/// Upper bound on a whole discovery request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the kubelet's serving certificate is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsPolicy {
	/// Trust only the given CA bundle.
	VerifyWithCa { ca_file: PathBuf },
	/// Accept any server certificate. Kubelets commonly serve self-signed
	/// certificates, so this stays available as an explicit opt-in.
	InsecureSkipVerify,
}

impl Default for TlsPolicy {
	fn default() -> Self {
		TlsPolicy::VerifyWithCa {
			ca_file: PathBuf::from(DEFAULT_CA_FILE),
		}
	}
}

/// Settings used to build the kubelet transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeletClientConfig {
	pub token_file: PathBuf,
	pub tls: TlsPolicy,
	pub timeout: Duration,
}

impl Default for KubeletClientConfig {
	fn default() -> Self {
		Self {
			token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
			tls: TlsPolicy::default(),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_verify_against_service_account_ca() {
		let config = KubeletClientConfig::default();
		assert_eq!(config.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
		assert_eq!(
			config.tls,
			TlsPolicy::VerifyWithCa {
				ca_file: PathBuf::from(DEFAULT_CA_FILE)
			}
		);
		assert_eq!(config.timeout, Duration::from_secs(10));
	}
}
