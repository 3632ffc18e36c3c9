// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mount pod template configuration section.

use mountpod_builder::PodTemplate;
use serde::{Deserialize, Serialize};

/// Mount pod template layer (for merging).
///
/// An empty `priority_class_name` clears the default priority class.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateConfigLayer {
	pub namespace: Option<String>,
	pub node_name: Option<String>,
	pub image: Option<String>,
	pub mount_container_name: Option<String>,
	pub format_container_name: Option<String>,
	pub mount_command: Option<Vec<String>>,
	pub priority_class_name: Option<String>,
	pub host_mount_point_path: Option<String>,
	pub host_config_root_path: Option<String>,
	pub pod_mount_base: Option<String>,
	pub config_root_mount_path: Option<String>,
}

impl TemplateConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.namespace.is_some() {
			self.namespace = other.namespace;
		}
		if other.node_name.is_some() {
			self.node_name = other.node_name;
		}
		if other.image.is_some() {
			self.image = other.image;
		}
		if other.mount_container_name.is_some() {
			self.mount_container_name = other.mount_container_name;
		}
		if other.format_container_name.is_some() {
			self.format_container_name = other.format_container_name;
		}
		if other.mount_command.is_some() {
			self.mount_command = other.mount_command;
		}
		if other.priority_class_name.is_some() {
			self.priority_class_name = other.priority_class_name;
		}
		if other.host_mount_point_path.is_some() {
			self.host_mount_point_path = other.host_mount_point_path;
		}
		if other.host_config_root_path.is_some() {
			self.host_config_root_path = other.host_config_root_path;
		}
		if other.pod_mount_base.is_some() {
			self.pod_mount_base = other.pod_mount_base;
		}
		if other.config_root_mount_path.is_some() {
			self.config_root_mount_path = other.config_root_mount_path;
		}
	}

	pub fn finalize(self) -> PodTemplate {
		let defaults = PodTemplate::default();
		PodTemplate {
			namespace: self.namespace.unwrap_or(defaults.namespace),
			node_name: self.node_name.unwrap_or(defaults.node_name),
			image: self.image.unwrap_or(defaults.image),
			mount_container_name: self
				.mount_container_name
				.unwrap_or(defaults.mount_container_name),
			format_container_name: self
				.format_container_name
				.unwrap_or(defaults.format_container_name),
			mount_command: self.mount_command.unwrap_or(defaults.mount_command),
			priority_class_name: match self.priority_class_name {
				Some(name) if name.is_empty() => None,
				Some(name) => Some(name),
				None => defaults.priority_class_name,
			},
			host_mount_point_path: self
				.host_mount_point_path
				.unwrap_or(defaults.host_mount_point_path),
			host_config_root_path: self
				.host_config_root_path
				.unwrap_or(defaults.host_config_root_path),
			pod_mount_base: self.pod_mount_base.unwrap_or(defaults.pod_mount_base),
			config_root_mount_path: self
				.config_root_mount_path
				.unwrap_or(defaults.config_root_mount_path),
		}
	}
}
