// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source Map v3 decoding and generation.
//!
//! This crate provides:
//! - VLQ decoding/encoding of the compact `mappings` string
//! - Parsing of Source Map v3 JSON payloads into a binary-searchable
//!   [`SourceMap`]
//! - [`SourceMapBuilder`] for synthesizing the generated map attached to
//!   rendered stylesheets
//!
//! # Example
//!
//! ```
//! use stylemap_decode::SourceMap;
//!
//! let map = SourceMap::from_str(r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "names": [],
//!     "mappings": "AAAA"
//! }"#).unwrap();
//!
//! let pos = map.lookup(1, 0).unwrap();
//! assert_eq!(pos.source, "src/app.ts");
//! assert_eq!(pos.line, 1);
//! ```

pub mod builder;
pub mod error;
pub mod map;
pub mod vlq;

pub use builder::SourceMapBuilder;
pub use error::{DecodeError, Result};
pub use map::{OriginalPosition, SourceMap};
pub use vlq::{decode_vlq_mappings, decode_vlq_segment, encode_vlq, DecodedMappings, MappingRecord};
