// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The partially specified configuration each source contributes.

use serde::Deserialize;

use crate::sections::{KubeletConfigLayer, LoggingConfigLayer, TemplateConfigLayer};

/// Agent configuration as read from one source; absent sections are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfigLayer {
	#[serde(default)]
	pub kubelet: Option<KubeletConfigLayer>,
	#[serde(default)]
	pub template: Option<TemplateConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl AgentConfigLayer {
	/// Overlay `other` on this layer. Fields set in `other` win.
	pub fn merge(&mut self, other: AgentConfigLayer) {
		if let Some(kubelet) = other.kubelet {
			self.kubelet.get_or_insert_with(Default::default).merge(kubelet);
		}
		if let Some(template) = other.template {
			self.template.get_or_insert_with(Default::default).merge(template);
		}
		if let Some(logging) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(logging);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_empty_layers() {
		let mut base = AgentConfigLayer::default();
		base.merge(AgentConfigLayer::default());
		assert!(base.kubelet.is_none());
		assert!(base.template.is_none());
	}

	#[test]
	fn merge_preserves_base_when_other_empty() {
		let mut base = AgentConfigLayer {
			kubelet: Some(KubeletConfigLayer {
				port: Some(10255),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(AgentConfigLayer::default());
		assert_eq!(base.kubelet.as_ref().unwrap().port, Some(10255));
	}

	#[test]
	fn merge_fills_missing_sections() {
		let mut base = AgentConfigLayer::default();
		base.merge(AgentConfigLayer {
			template: Some(TemplateConfigLayer {
				namespace: Some("juicefs".to_string()),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(
			base.template.as_ref().unwrap().namespace.as_deref(),
			Some("juicefs")
		);
	}

	#[test]
	fn deserialize_partial_file() {
		let layer: AgentConfigLayer = toml::from_str(
			r#"
[kubelet]
host = "10.0.0.7"
insecure_skip_verify = true

[logging]
level = "debug"
"#,
		)
		.unwrap();

		let kubelet = layer.kubelet.unwrap();
		assert_eq!(kubelet.host.as_deref(), Some("10.0.0.7"));
		assert_eq!(kubelet.insecure_skip_verify, Some(true));
		assert!(kubelet.port.is_none());
		assert!(layer.template.is_none());
		assert!(layer.logging.is_some());
	}
}
