// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mount pod builder.
//!
//! This crate provides:
//! - [`MountSetting`], the declarative description of one filesystem mount
//! - [`PodTemplate`], the fixed part shared by every mount pod on a node
//! - [`MountPodBuilder`], which turns a setting into a complete [`Pod`]
//!
//! Building is pure: no I/O, no shared mutable state, and every call returns
//! a freshly constructed pod.

mod builder;
mod policy;
mod setting;
mod template;

pub use builder::MountPodBuilder;
pub use policy::should_mount_encryption_key;
pub use setting::MountSetting;
pub use template::{
	PodTemplate, CONFIG_ROOT_MOUNT_PATH, DEFAULT_FORMAT_CONTAINER_NAME, DEFAULT_IMAGE,
	DEFAULT_MOUNT_CONTAINER_NAME, DEFAULT_NAMESPACE, HOST_CONFIG_ROOT_PATH, HOST_MOUNT_POINT_PATH,
	POD_MOUNT_BASE, RSA_KEY_MOUNT_PATH,
};

pub use k8s_openapi::api::core::v1::Pod;
