// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Declarative description of a single mount.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a filesystem mount should be realized as a mount pod.
///
/// Populated by the caller (usually from a volume's secret) and only read by
/// the builder. Optional strings are treated as unset when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSetting {
	/// Stable identifier of the mount instance.
	pub name: String,
	/// Secret supplying mount credentials and environment.
	pub secret_name: String,
	/// Extra config secrets, keyed by secret name, valued by mount path.
	///
	/// Iterated in lexicographic order of the secret name, which fixes the
	/// `config-<i>` numbering.
	#[serde(default)]
	pub configs: BTreeMap<String, String>,
	/// Enables the encryption key volume when non-empty.
	#[serde(default)]
	pub encrypt_rsa_key: Option<String>,
	/// Enables the init config volume when non-empty.
	#[serde(default)]
	pub init_config: Option<String>,
	/// Enables the format init container when non-empty.
	#[serde(default)]
	pub format_cmd: Option<String>,
	/// Community edition client.
	#[serde(default)]
	pub is_ce: bool,
}

impl MountSetting {
	/// Create a setting with only the required fields populated.
	pub fn new(name: impl Into<String>, secret_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			secret_name: secret_name.into(),
			..Default::default()
		}
	}

	pub fn encrypt_rsa_key(&self) -> Option<&str> {
		non_empty(&self.encrypt_rsa_key)
	}

	pub fn init_config(&self) -> Option<&str> {
		non_empty(&self.init_config)
	}

	pub fn format_cmd(&self) -> Option<&str> {
		non_empty(&self.format_cmd)
	}

	/// File name the init config secret item is projected to.
	pub fn init_config_file_name(&self) -> String {
		format!("{}.conf", self.name)
	}
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|s| !s.is_empty())
}
