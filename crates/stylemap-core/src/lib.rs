// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core stack-frame types for the stylemap debug worker.
//!
//! This crate provides:
//! - [`Frame`]: a single (script URL, line, column) stack location
//! - [`StackInfo`]: the raw error-stack record shipped by the host page
//! - Parsing of V8 and Firefox/Safari error-stack strings into frames

pub mod error;
pub mod frame;
pub mod stack;

pub use error::{Result, StackError};
pub use frame::{Frame, StackInfo, Stacktrace};
pub use stack::parse_stack;
