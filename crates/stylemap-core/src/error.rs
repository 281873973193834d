// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for stack parsing.

use thiserror::Error;

/// Errors that can occur while turning a raw stack record into a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
	#[error("no frames could be parsed from stack")]
	EmptyStack,

	#[error("stack index {index} out of range ({available} frames)")]
	FrameIndexOutOfRange { index: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, StackError>;
