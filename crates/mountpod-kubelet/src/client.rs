// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Certificate, Client};
use tracing::{debug, instrument, warn};

use crate::config::{KubeletClientConfig, TlsPolicy};
use crate::error::{KubeletError, KubeletResult};
use crate::token::BearerToken;
use crate::types::{decode_pod_list, PodList};

/// Trait for discovering the pods running on a node.
///
/// This abstraction allows mount pod bookkeeping to be tested without a
/// kubelet.
#[async_trait]
pub trait NodePodSource: Send + Sync {
	/// List the pods the node currently runs. One request, no retries.
	async fn fetch_running_pods(&self) -> KubeletResult<PodList>;
}

/// Build the authenticated HTTP client used to talk to kubelets.
///
/// The token file is read here and never again; the CA bundle likewise.
pub fn build_transport(config: &KubeletClientConfig) -> KubeletResult<Client> {
	let token = BearerToken::from_file(&config.token_file)?;
	let auth = token
		.header_value()
		.ok_or_else(|| KubeletError::InvalidToken {
			path: config.token_file.clone(),
		})?;

	let mut headers = HeaderMap::new();
	headers.insert(AUTHORIZATION, auth);

	let mut builder = Client::builder()
		.default_headers(headers)
		.timeout(config.timeout);

	builder = match &config.tls {
		TlsPolicy::VerifyWithCa { ca_file } => {
			let pem = std::fs::read(ca_file).map_err(|source| KubeletError::CaRead {
				path: ca_file.clone(),
				source,
			})?;
			let bundle = Certificate::from_pem_bundle(&pem).map_err(|err| KubeletError::InvalidCa {
				path: ca_file.clone(),
				reason: err.to_string(),
			})?;
			if bundle.is_empty() {
				return Err(KubeletError::InvalidCa {
					path: ca_file.clone(),
					reason: "no PEM certificates found".to_string(),
				});
			}
			debug!(
				ca_file = %ca_file.display(),
				certificates = bundle.len(),
				"Verifying kubelet certificates against CA bundle"
			);
			bundle
				.into_iter()
				.fold(builder.tls_built_in_root_certs(false), |builder, ca| {
					builder.add_root_certificate(ca)
				})
		}
		TlsPolicy::InsecureSkipVerify => {
			warn!("Kubelet certificate verification is disabled");
			builder.danger_accept_invalid_certs(true)
		}
	};

	builder.build().map_err(KubeletError::ClientBuild)
}

/// Client for a single node's kubelet.
///
/// Holds no per-call state; clone the underlying [`Client`] freely or share
/// this behind an `Arc`.
#[derive(Debug, Clone)]
pub struct KubeletClient {
	endpoint: String,
	http: Client,
}

impl KubeletClient {
	/// Create a client for `https://{host}:{port}`.
	pub fn new(host: &str, port: u16, config: &KubeletClientConfig) -> KubeletResult<Self> {
		let http = build_transport(config)?;
		let endpoint = format!("https://{}:{port}", bracket_ipv6(host));
		debug!(endpoint = %endpoint, "Kubelet client initialized");
		Ok(Self::with_transport(endpoint, http))
	}

	/// Create a client around an already configured transport.
	pub fn with_transport(endpoint: impl Into<String>, http: Client) -> Self {
		let endpoint = endpoint.into().trim_end_matches('/').to_string();
		Self { endpoint, http }
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// List the pods the kubelet reports as scheduled on its node.
	#[instrument(skip(self), fields(endpoint = %self.endpoint))]
	pub async fn fetch_running_pods(&self) -> KubeletResult<PodList> {
		let url = format!("{}/pods/", self.endpoint);
		let response = self.http.get(&url).send().await?;

		let status = response.status();
		if !status.is_success() {
			debug!(status = %status, "Kubelet rejected pod list request");
			return Err(KubeletError::UnexpectedStatus {
				status: status.as_u16(),
			});
		}

		let body = response.bytes().await?;
		let pods = decode_pod_list(&body)?;
		debug!(count = pods.len(), "Fetched running pods");
		Ok(pods)
	}
}

#[async_trait]
impl NodePodSource for KubeletClient {
	async fn fetch_running_pods(&self) -> KubeletResult<PodList> {
		KubeletClient::fetch_running_pods(self).await
	}
}

fn bracket_ipv6(host: &str) -> String {
	if host.contains(':') && !host.starts_with('[') {
		format!("[{host}]")
	} else {
		host.to_string()
	}
}
