// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Kubelet pod discovery for the mount pod agent.
//!
//! This crate provides:
//! - [`KubeletClient`], an authenticated HTTPS client for a node's kubelet
//! - [`NodePodSource`], the trait seam callers program against
//! - [`PodList`], the decoded `/pods/` payload
//!
//! Each call performs exactly one request. Retry policy belongs to the
//! caller.

mod client;
mod config;
mod error;
mod token;
mod types;

pub use client::{build_transport, KubeletClient, NodePodSource};
pub use config::{
	KubeletClientConfig, TlsPolicy, DEFAULT_CA_FILE, DEFAULT_KUBELET_PORT, DEFAULT_TIMEOUT,
	DEFAULT_TOKEN_FILE,
};
pub use error::{KubeletError, KubeletResult};
pub use token::BearerToken;
pub use types::{decode_pod_list, PodList};
