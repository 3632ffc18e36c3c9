// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer token loaded from the service account mount.

use std::fmt;
use std::path::Path;

use reqwest::header::HeaderValue;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{KubeletError, KubeletResult};

const REDACTED: &str = "[REDACTED]";

/// A bearer token that never appears in logs and is zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct BearerToken {
	inner: String,
}

impl BearerToken {
	/// Read a token file once. Surrounding whitespace is dropped.
	pub fn from_file(path: &Path) -> KubeletResult<Self> {
		let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
			KubeletError::TokenRead {
				path: path.to_path_buf(),
				source,
			}
		})?);

		let token = raw.trim();
		if token.is_empty() {
			return Err(KubeletError::InvalidToken {
				path: path.to_path_buf(),
			});
		}

		Ok(Self {
			inner: token.to_string(),
		})
	}

	pub fn expose(&self) -> &str {
		&self.inner
	}

	/// `Authorization` header value, marked sensitive so it is masked in
	/// reqwest's own debug output.
	pub(crate) fn header_value(&self) -> Option<HeaderValue> {
		let header = Zeroizing::new(format!("Bearer {}", self.inner));
		let mut value = HeaderValue::from_str(&header).ok()?;
		value.set_sensitive(true);
		Some(value)
	}
}

impl fmt::Debug for BearerToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("BearerToken").field(&REDACTED).finish()
	}
}

impl fmt::Display for BearerToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}
