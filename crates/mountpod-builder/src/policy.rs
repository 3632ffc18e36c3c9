// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Edition-dependent mount policy.

/// Whether the encryption key volume is mounted into the mount container.
///
/// The community edition client never receives the key file, even though the
/// volume is still declared on the pod.
pub fn should_mount_encryption_key(is_ce: bool) -> bool {
	!is_ce
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn community_edition_skips_key_mount() {
		assert!(!should_mount_encryption_key(true));
	}

	#[test]
	fn enterprise_edition_mounts_key() {
		assert!(should_mount_encryption_key(false));
	}
}
