// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for frame resolution.

use stylemap_decode::DecodeError;
use thiserror::Error;

/// Errors that can occur while resolving a frame.
///
/// `Clone` so singleflight waiters can all receive the one in-flight
/// failure. Fetch failures are never cached; a later resolution attempt
/// (after an explicit invalidation) fetches again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	#[error("fetch failed for {url}: {reason}")]
	FetchFailed { url: String, reason: String },

	#[error("malformed mapping payload: {0}")]
	Malformed(#[from] DecodeError),

	#[error("invalid URL {url}: {reason}")]
	InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
