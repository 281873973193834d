// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding.

use thiserror::Error;

/// Errors that can occur while decoding a mapping payload.
///
/// Every variant means the payload is malformed; callers are expected to
/// degrade to the self-mapping fallback for the affected frame. The type is
/// `Clone` so a shared in-flight decode can hand the same failure to every
/// waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("invalid source map JSON: {0}")]
	InvalidJson(String),

	#[error("invalid source map version: expected 3, got {0}")]
	UnsupportedVersion(u32),

	#[error("invalid VLQ character: {0}")]
	InvalidVlqChar(char),

	#[error("truncated VLQ segment: {0}")]
	TruncatedSegment(String),

	#[error("mapping deltas reconstruct a negative value on generated line {line}")]
	InvalidDelta { line: u32 },

	#[error("source index {0} out of range")]
	InvalidSourceIndex(u32),

	#[error("invalid base64 payload: {0}")]
	InvalidBase64(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
