// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mount pod construction.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
	Container, EnvFromSource, EnvVar, HostPathVolumeSource, KeyToPath, Pod, PodSpec,
	SecretEnvSource, SecretVolumeSource, SecurityContext, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::policy::should_mount_encryption_key;
use crate::setting::MountSetting;
use crate::template::{PodTemplate, RSA_KEY_MOUNT_PATH};

const VOLUME_MOUNT_POINT: &str = "jfs-dir";
const VOLUME_CONFIG_ROOT: &str = "jfs-root-dir";
const VOLUME_RSA_KEY: &str = "rsa-key";
const VOLUME_INIT_CONFIG: &str = "init-config";
const CONFIG_VOLUME_PREFIX: &str = "config-";
const RSA_KEY_ITEM: &str = "encrypt_rsa_key";
const RSA_KEY_FILE: &str = "rsa-key.pem";
const INIT_CONFIG_ITEM: &str = "init_config";
const HOST_PATH_DIRECTORY_OR_CREATE: &str = "DirectoryOrCreate";
const MOUNT_PROPAGATION_BIDIRECTIONAL: &str = "Bidirectional";
const RESTART_POLICY_ALWAYS: &str = "Always";
const MANAGED_LABEL: &str = "juicefs.com/mount-pod";
const MOUNT_NAME_LABEL: &str = "juicefs.com/mount-name";
const MAX_LABEL_LENGTH: usize = 63;

/// Builds mount pods from [`MountSetting`]s against a fixed [`PodTemplate`].
///
/// The builder holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MountPodBuilder {
	template: PodTemplate,
}

/// Volumes and mounts beyond the two fixed host paths.
struct AdditionalVolumes {
	volumes: Vec<Volume>,
	/// Mounts for both the mount container and the format init container.
	mounts: Vec<VolumeMount>,
}

impl MountPodBuilder {
	pub fn new(template: PodTemplate) -> Self {
		Self { template }
	}

	pub fn template(&self) -> &PodTemplate {
		&self.template
	}

	/// Build the complete mount pod for `setting`.
	///
	/// Volumes are ordered: mount point, config root, encryption key, init
	/// config, then `config-<i>` in secret name order. The mount container
	/// mounts the same set except that the encryption key is gated by
	/// edition.
	pub fn build(&self, setting: &MountSetting) -> Pod {
		let additional = additional_volumes(setting, &self.template);

		let mut volumes = self.fixed_volumes();
		volumes.extend(additional.volumes);

		let mut volume_mounts = self.fixed_volume_mounts();
		volume_mounts.extend(additional.mounts.iter().cloned());

		let env_from = vec![secret_env_source(&setting.secret_name)];

		let mount_container = Container {
			name: self.template.mount_container_name.clone(),
			image: Some(self.template.image.clone()),
			command: if self.template.mount_command.is_empty() {
				None
			} else {
				Some(self.template.mount_command.clone())
			},
			env: Some(vec![EnvVar {
				name: "JFS_FOREGROUND".to_string(),
				value: Some("1".to_string()),
				value_from: None,
			}]),
			env_from: Some(env_from.clone()),
			security_context: Some(privileged()),
			volume_mounts: Some(volume_mounts),
			..Default::default()
		};

		let init_containers = setting.format_cmd().map(|format_cmd| {
			vec![Container {
				name: self.template.format_container_name.clone(),
				image: Some(self.template.image.clone()),
				command: Some(vec![
					"sh".to_string(),
					"-c".to_string(),
					format_cmd.to_string(),
				]),
				env_from: Some(env_from),
				security_context: Some(privileged()),
				volume_mounts: Some(additional.mounts),
				..Default::default()
			}]
		});

		let mut labels = BTreeMap::new();
		labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
		labels.insert(
			MOUNT_NAME_LABEL.to_string(),
			sanitize_label_value(&setting.name),
		);

		Pod {
			metadata: ObjectMeta {
				name: Some(self.template.pod_name(&setting.name)),
				namespace: Some(self.template.namespace.clone()),
				labels: Some(labels),
				..Default::default()
			},
			spec: Some(PodSpec {
				containers: vec![mount_container],
				init_containers,
				volumes: Some(volumes),
				node_name: if self.template.node_name.is_empty() {
					None
				} else {
					Some(self.template.node_name.clone())
				},
				priority_class_name: self.template.priority_class_name.clone(),
				restart_policy: Some(RESTART_POLICY_ALWAYS.to_string()),
				..Default::default()
			}),
			status: None,
		}
	}

	fn fixed_volumes(&self) -> Vec<Volume> {
		vec![
			host_path_volume(VOLUME_MOUNT_POINT, &self.template.host_mount_point_path),
			host_path_volume(VOLUME_CONFIG_ROOT, &self.template.host_config_root_path),
		]
	}

	fn fixed_volume_mounts(&self) -> Vec<VolumeMount> {
		vec![
			VolumeMount {
				name: VOLUME_MOUNT_POINT.to_string(),
				mount_path: self.template.pod_mount_base.clone(),
				mount_propagation: Some(MOUNT_PROPAGATION_BIDIRECTIONAL.to_string()),
				..Default::default()
			},
			VolumeMount {
				name: VOLUME_CONFIG_ROOT.to_string(),
				mount_path: self.template.config_root_mount_path.clone(),
				mount_propagation: Some(MOUNT_PROPAGATION_BIDIRECTIONAL.to_string()),
				..Default::default()
			},
		]
	}
}

fn additional_volumes(setting: &MountSetting, template: &PodTemplate) -> AdditionalVolumes {
	let mut volumes = Vec::new();
	let mut mounts = Vec::new();

	// Declared for every edition; only mounted where the policy allows.
	if setting.encrypt_rsa_key().is_some() {
		volumes.push(secret_item_volume(
			VOLUME_RSA_KEY,
			&setting.secret_name,
			RSA_KEY_ITEM,
			RSA_KEY_FILE.to_string(),
		));
		if should_mount_encryption_key(setting.is_ce) {
			mounts.push(VolumeMount {
				name: VOLUME_RSA_KEY.to_string(),
				mount_path: RSA_KEY_MOUNT_PATH.to_string(),
				..Default::default()
			});
		}
	}

	if setting.init_config().is_some() {
		volumes.push(secret_item_volume(
			VOLUME_INIT_CONFIG,
			&setting.secret_name,
			INIT_CONFIG_ITEM,
			setting.init_config_file_name(),
		));
		mounts.push(VolumeMount {
			name: VOLUME_INIT_CONFIG.to_string(),
			mount_path: template.config_root_mount_path.clone(),
			..Default::default()
		});
	}

	for (i, (secret, mount_path)) in setting.configs.iter().enumerate() {
		let name = format!("{CONFIG_VOLUME_PREFIX}{}", i + 1);
		volumes.push(Volume {
			name: name.clone(),
			secret: Some(SecretVolumeSource {
				secret_name: Some(secret.clone()),
				..Default::default()
			}),
			..Default::default()
		});
		mounts.push(VolumeMount {
			name,
			mount_path: mount_path.clone(),
			..Default::default()
		});
	}

	AdditionalVolumes { volumes, mounts }
}

fn host_path_volume(name: &str, path: &str) -> Volume {
	Volume {
		name: name.to_string(),
		host_path: Some(HostPathVolumeSource {
			path: path.to_string(),
			type_: Some(HOST_PATH_DIRECTORY_OR_CREATE.to_string()),
		}),
		..Default::default()
	}
}

fn secret_item_volume(name: &str, secret_name: &str, key: &str, path: String) -> Volume {
	Volume {
		name: name.to_string(),
		secret: Some(SecretVolumeSource {
			secret_name: Some(secret_name.to_string()),
			items: Some(vec![KeyToPath {
				key: key.to_string(),
				path,
				mode: None,
			}]),
			..Default::default()
		}),
		..Default::default()
	}
}

fn secret_env_source(secret_name: &str) -> EnvFromSource {
	EnvFromSource {
		secret_ref: Some(SecretEnvSource {
			name: secret_name.to_string(),
			optional: None,
		}),
		..Default::default()
	}
}

fn privileged() -> SecurityContext {
	SecurityContext {
		privileged: Some(true),
		..Default::default()
	}
}

/// Sanitize a string to be a valid Kubernetes label value.
///
/// K8s label values must:
/// - Be 63 characters or less
/// - Begin and end with an alphanumeric character
/// - Contain only alphanumeric characters, dashes, underscores, and dots
fn sanitize_label_value(value: &str) -> String {
	let sanitized: String = value
		.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
				c
			} else {
				'_'
			}
		})
		.collect();

	let trimmed = sanitized
		.trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
		.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

	if trimmed.len() > MAX_LABEL_LENGTH {
		trimmed[..MAX_LABEL_LENGTH]
			.trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
			.to_string()
	} else {
		trimmed.to_string()
	}
}
