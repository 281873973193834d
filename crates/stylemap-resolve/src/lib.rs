// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping location discovery, caching and frame resolution.
//!
//! This crate turns a stack frame's generated position (script URL, line,
//! column) into a resolved original position:
//!
//! - [`locate`]: find where a script's mapping data lives (inline data URI,
//!   external URL, or absent)
//! - [`Fetch`]: the seam to the external fetch provider, with
//!   [`HttpFetcher`] for production and [`StaticFetch`] for tests
//! - [`FetchCache`]: keyed singleflight cache with epoch invalidation
//! - [`FrameResolver`]: the fallback chain composing all of the above,
//!   degrading to self-mapping when nothing better is recoverable

pub mod cache;
pub mod error;
pub mod fetch;
pub mod locate;
pub mod resolver;

pub use cache::FetchCache;
pub use error::{ResolveError, Result};
pub use fetch::{Fetch, HttpFetcher, StaticFetch};
pub use locate::{locate, MappingLocation};
pub use resolver::{FrameResolver, ResolvedPosition};
