// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the debug worker.

use thiserror::Error;

/// Errors surfaced by the worker.
///
/// Per-marker resolution failures are not represented here; they degrade
/// to self-mapped positions inside the render tick and never abort it.
#[derive(Debug, Error)]
pub enum WorkerError {
	#[error("bad stack info: {0}")]
	BadStack(#[from] stylemap_core::StackError),

	#[error("invalid command payload: {0}")]
	InvalidCommand(#[from] serde_json::Error),

	#[error("worker channel closed")]
	ChannelClosed,
}

pub type Result<T> = std::result::Result<T, WorkerError>;
