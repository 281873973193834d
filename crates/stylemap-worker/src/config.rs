// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Worker configuration.

/// Maximum queued commands before senders are backpressured.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Maximum rendered messages buffered for a slow consumer.
pub const DEFAULT_MESSAGE_CAPACITY: usize = 16;

/// Channel sizing for the worker.
///
/// The render interval itself is not configured here; it is controlled at
/// runtime by the `set_render_interval` command and is off until the first
/// one arrives.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
	pub command_capacity: usize,
	pub message_capacity: usize,
}

impl Default for WorkerConfig {
	fn default() -> Self {
		Self {
			command_capacity: DEFAULT_COMMAND_CAPACITY,
			message_capacity: DEFAULT_MESSAGE_CAPACITY,
		}
	}
}
