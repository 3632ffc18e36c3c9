// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KubeletResult;

/// Pods reported by a kubelet's `/pods/` endpoint.
///
/// Every envelope field is optional on the wire; kubelets have been seen to
/// omit `metadata` entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodList {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default)]
	pub metadata: ListMeta,
	#[serde(default)]
	pub items: Vec<Pod>,
}

impl PodList {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Decode a `/pods/` response body.
///
/// On failure the raw body is logged at debug level; the returned error only
/// carries the position of the problem.
pub fn decode_pod_list(body: &[u8]) -> KubeletResult<PodList> {
	serde_json::from_slice(body).map_err(|err| {
		debug!(body = %String::from_utf8_lossy(body), "Failed to decode kubelet pod list");
		err.into()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::KubeletError;

	#[test]
	fn decodes_items() {
		let body = br#"{
			"kind": "PodList",
			"apiVersion": "v1",
			"metadata": {},
			"items": [
				{
					"apiVersion": "v1",
					"kind": "Pod",
					"metadata": {"name": "juicefs-node-a-pvc-1", "namespace": "kube-system"},
					"spec": {"containers": [{"name": "jfs-mount", "image": "juicedata/mount"}]},
					"status": {"phase": "Running"}
				}
			]
		}"#;

		let list = decode_pod_list(body).unwrap();

		assert_eq!(list.len(), 1);
		assert_eq!(list.kind.as_deref(), Some("PodList"));
		let pod = &list.items[0];
		assert_eq!(pod.metadata.name.as_deref(), Some("juicefs-node-a-pvc-1"));
		assert_eq!(
			pod.status.as_ref().and_then(|s| s.phase.as_deref()),
			Some("Running")
		);
	}

	#[test]
	fn missing_envelope_fields_default() {
		let list = decode_pod_list(b"{}").unwrap();
		assert!(list.is_empty());
		assert!(list.api_version.is_none());
	}

	#[test]
	fn malformed_body_is_decode_error_without_content() {
		let err = decode_pod_list(b"<html>token=hunter2</html>").unwrap_err();
		assert!(matches!(err, KubeletError::Decode { line: 1, .. }));
		assert!(!err.to_string().contains("hunter2"));
	}

	#[test]
	fn schema_mismatch_is_decode_error_without_content() {
		let err = decode_pod_list(br#"{"items": "hunter2"}"#).unwrap_err();
		match err {
			KubeletError::Decode { ref category, .. } => assert_eq!(category, "data"),
			other => panic!("unexpected error: {other:?}"),
		}
		assert!(!err.to_string().contains("hunter2"));
	}
}
