// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod kubelet;
mod logging;
mod template;

pub use kubelet::{KubeletConfig, KubeletConfigLayer};
pub use logging::{LogFormat, LogLevel, LoggingConfig, LoggingConfigLayer};
pub use template::TemplateConfigLayer;
