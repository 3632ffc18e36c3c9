// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for kubelet operations.
pub type KubeletResult<T> = Result<T, KubeletError>;

/// Errors that can occur while building or using a [`crate::KubeletClient`].
///
/// No variant carries response body content.
#[derive(Error, Debug)]
pub enum KubeletError {
	#[error("Failed to read token file {path}: {source}")]
	TokenRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Token file {path} does not contain a usable bearer token")]
	InvalidToken { path: PathBuf },

	#[error("Failed to read CA file {path}: {source}")]
	CaRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid CA bundle {path}: {reason}")]
	InvalidCa { path: PathBuf, reason: String },

	#[error("Failed to build kubelet HTTP client: {0}")]
	ClientBuild(#[source] reqwest::Error),

	#[error("Kubelet request timed out")]
	Timeout,

	#[error("Kubelet request failed: {0}")]
	Request(#[source] reqwest::Error),

	#[error("Kubelet returned HTTP {status}")]
	UnexpectedStatus { status: u16 },

	#[error("Malformed pod list at line {line}, column {column} ({category})")]
	Decode {
		line: usize,
		column: usize,
		category: String,
	},
}

impl From<reqwest::Error> for KubeletError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			KubeletError::Timeout
		} else {
			KubeletError::Request(err)
		}
	}
}

impl From<serde_json::Error> for KubeletError {
	fn from(err: serde_json::Error) -> Self {
		KubeletError::Decode {
			line: err.line(),
			column: err.column(),
			category: format!("{:?}", err.classify()).to_lowercase(),
		}
	}
}
