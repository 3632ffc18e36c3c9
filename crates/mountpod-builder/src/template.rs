// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The fixed part of every mount pod.

/// Host directory holding the mount points shared with application pods.
pub const HOST_MOUNT_POINT_PATH: &str = "/var/lib/juicefs/volume";
/// Host directory holding the client's local config root.
pub const HOST_CONFIG_ROOT_PATH: &str = "/var/lib/juicefs/config";
/// Where the mount point directory appears inside the mount container.
pub const POD_MOUNT_BASE: &str = "/jfs";
/// Where the config root appears inside the mount container.
pub const CONFIG_ROOT_MOUNT_PATH: &str = "/root/.juicefs";
/// Where the encryption key file appears inside the mount container.
pub const RSA_KEY_MOUNT_PATH: &str = "/root/.rsa";

pub const DEFAULT_NAMESPACE: &str = "kube-system";
pub const DEFAULT_IMAGE: &str = "juicedata/juicefs-csi-driver:latest";
pub const DEFAULT_MOUNT_CONTAINER_NAME: &str = "jfs-mount";
pub const DEFAULT_FORMAT_CONTAINER_NAME: &str = "jfs-format";
const DEFAULT_PRIORITY_CLASS: &str = "system-node-critical";

/// Values shared by all mount pods built on a node.
///
/// The builder only reads the template; each build produces a new pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodTemplate {
	pub namespace: String,
	/// Node the pod is pinned to. Empty leaves scheduling to the cluster.
	pub node_name: String,
	pub image: String,
	pub mount_container_name: String,
	pub format_container_name: String,
	/// Entrypoint of the mount container. Empty uses the image default.
	pub mount_command: Vec<String>,
	pub priority_class_name: Option<String>,
	pub host_mount_point_path: String,
	pub host_config_root_path: String,
	pub pod_mount_base: String,
	pub config_root_mount_path: String,
}

impl Default for PodTemplate {
	fn default() -> Self {
		Self {
			namespace: DEFAULT_NAMESPACE.to_string(),
			node_name: String::new(),
			image: DEFAULT_IMAGE.to_string(),
			mount_container_name: DEFAULT_MOUNT_CONTAINER_NAME.to_string(),
			format_container_name: DEFAULT_FORMAT_CONTAINER_NAME.to_string(),
			mount_command: Vec::new(),
			priority_class_name: Some(DEFAULT_PRIORITY_CLASS.to_string()),
			host_mount_point_path: HOST_MOUNT_POINT_PATH.to_string(),
			host_config_root_path: HOST_CONFIG_ROOT_PATH.to_string(),
			pod_mount_base: POD_MOUNT_BASE.to_string(),
			config_root_mount_path: CONFIG_ROOT_MOUNT_PATH.to_string(),
		}
	}
}

impl PodTemplate {
	/// Pod name for a mount, `juicefs-<node>-<name>` when pinned to a node.
	pub fn pod_name(&self, mount_name: &str) -> String {
		if self.node_name.is_empty() {
			format!("juicefs-{mount_name}")
		} else {
			format!("juicefs-{}-{mount_name}", self.node_name)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pod_name_includes_node_when_pinned() {
		let template = PodTemplate {
			node_name: "node-a".to_string(),
			..Default::default()
		};
		assert_eq!(template.pod_name("pvc-1"), "juicefs-node-a-pvc-1");
	}

	#[test]
	fn pod_name_without_node() {
		assert_eq!(PodTemplate::default().pod_name("pvc-1"), "juicefs-pvc-1");
	}
}
