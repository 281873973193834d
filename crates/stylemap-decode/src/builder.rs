// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Generated source map synthesis.
//!
//! The worker emits a stylesheet whose lines point back at resolved
//! original positions. This module builds the accompanying Source Map v3
//! payload and serializes it as a `sourceMappingURL` data URI that standard
//! source-map consumers accept.

use std::collections::HashMap;

use base64::prelude::*;
use serde::Serialize;

use crate::vlq::encode_vlq;

/// Serialized v3 envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedMap<'a> {
	version: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	file: Option<&'a str>,
	sources: &'a [String],
	sources_content: &'a [Option<String>],
	names: &'a [String],
	mappings: String,
}

#[derive(Debug, Clone, Copy)]
struct PendingMapping {
	/// Generated line (0-indexed).
	generated_line: u32,
	/// Generated column (0-indexed).
	generated_column: u32,
	source_index: u32,
	/// Original line (0-indexed).
	original_line: u32,
	/// Original column (0-indexed).
	original_column: u32,
}

/// Incremental builder for a generated source map.
///
/// Sources are deduplicated in first-appearance order; mappings must be
/// added in ascending generated order (the synthesizer walks output lines
/// top to bottom, so this holds by construction).
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
	file: Option<String>,
	sources: Vec<String>,
	sources_content: Vec<Option<String>>,
	source_index: HashMap<String, u32>,
	names: Vec<String>,
	mappings: Vec<PendingMapping>,
}

impl SourceMapBuilder {
	pub fn new(file: Option<&str>) -> Self {
		Self {
			file: file.map(str::to_string),
			..Self::default()
		}
	}

	/// Register a source identifier, returning its index.
	///
	/// Repeated registration of the same identifier returns the existing
	/// index; content supplied later fills a previously unknown slot.
	pub fn add_source(&mut self, source: &str, content: Option<&str>) -> u32 {
		if let Some(&idx) = self.source_index.get(source) {
			if self.sources_content[idx as usize].is_none() {
				self.sources_content[idx as usize] = content.map(str::to_string);
			}
			return idx;
		}

		let idx = self.sources.len() as u32;
		self.sources.push(source.to_string());
		self.sources_content.push(content.map(str::to_string));
		self.source_index.insert(source.to_string(), idx);
		idx
	}

	/// Map a generated position to an original position.
	///
	/// Lines are 1-indexed on both sides (matching lookup conventions);
	/// columns are 0-indexed.
	pub fn add_mapping(
		&mut self,
		generated_line: u32,
		generated_column: u32,
		source_index: u32,
		original_line: u32,
		original_column: u32,
	) {
		self.mappings.push(PendingMapping {
			generated_line: generated_line.saturating_sub(1),
			generated_column,
			source_index,
			original_line: original_line.saturating_sub(1),
			original_column,
		});
	}

	/// Encode the accumulated mappings into the compact VLQ string.
	fn encode_mappings(&self) -> String {
		let mut out = String::new();
		let mut current_line = 0u32;
		let mut prev_column = 0i64;
		let mut prev_source = 0i64;
		let mut prev_original_line = 0i64;
		let mut prev_original_column = 0i64;

		for (i, m) in self.mappings.iter().enumerate() {
			while current_line < m.generated_line {
				out.push(';');
				current_line += 1;
				// Generated column resets at every line.
				prev_column = 0;
			}
			if i > 0 && !out.ends_with(';') {
				out.push(',');
			}

			encode_vlq(m.generated_column as i64 - prev_column, &mut out);
			encode_vlq(m.source_index as i64 - prev_source, &mut out);
			encode_vlq(m.original_line as i64 - prev_original_line, &mut out);
			encode_vlq(m.original_column as i64 - prev_original_column, &mut out);

			prev_column = m.generated_column as i64;
			prev_source = m.source_index as i64;
			prev_original_line = m.original_line as i64;
			prev_original_column = m.original_column as i64;
		}

		out
	}

	/// Serialize the map to Source Map v3 JSON.
	pub fn build(&self) -> String {
		let map = GeneratedMap {
			version: 3,
			file: self.file.as_deref(),
			sources: &self.sources,
			sources_content: &self.sources_content,
			names: &self.names,
			mappings: self.encode_mappings(),
		};
		// Serialization of this shape cannot fail.
		serde_json::to_string(&map).expect("source map serialization")
	}

	/// Serialize the map as an inline `sourceMappingURL` data URI.
	pub fn to_data_uri(&self) -> String {
		format!(
			"data:application/json;charset=utf-8;base64,{}",
			BASE64_STANDARD.encode(self.build())
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::map::SourceMap;

	#[test]
	fn test_build_round_trips_through_parser() {
		let mut builder = SourceMapBuilder::new(None);
		let a = builder.add_source("webpack:///client.js?n=0", Some("// authored a\n"));
		let b = builder.add_source("http://localhost/raw.js", None);
		assert_eq!(a, 0);
		assert_eq!(b, 1);

		// Rule line 1 -> a:7:0, rule line 2 -> b:3:5.
		builder.add_mapping(1, 0, a, 7, 0);
		builder.add_mapping(2, 0, b, 3, 5);

		let map = SourceMap::from_str(&builder.build()).unwrap();
		assert_eq!(map.mapping_count(), 2);

		let pos = map.lookup(1, 0).unwrap();
		assert_eq!(pos.source, "webpack:///client.js?n=0");
		assert_eq!(pos.line, 7);
		assert_eq!(pos.column, 0);
		assert_eq!(pos.content.as_deref(), Some("// authored a\n"));

		let pos = map.lookup(2, 0).unwrap();
		assert_eq!(pos.source, "http://localhost/raw.js");
		assert_eq!(pos.line, 3);
		assert_eq!(pos.column, 5);
		assert!(pos.content.is_none());
	}

	#[test]
	fn test_add_source_dedup_and_content_fill() {
		let mut builder = SourceMapBuilder::new(None);
		let first = builder.add_source("a.js", None);
		let again = builder.add_source("a.js", Some("content"));
		assert_eq!(first, again);

		builder.add_mapping(1, 0, first, 1, 0);
		let map = SourceMap::from_str(&builder.build()).unwrap();
		assert_eq!(map.content_for("a.js"), Some("content"));
	}

	#[test]
	fn test_known_encoding() {
		let mut builder = SourceMapBuilder::new(None);
		let src = builder.add_source("m.js", None);
		builder.add_mapping(1, 0, src, 7, 0);
		assert_eq!(builder.encode_mappings(), "AAMA");
	}

	#[test]
	fn test_data_uri_shape() {
		let mut builder = SourceMapBuilder::new(Some("debug.css"));
		let src = builder.add_source("m.js", None);
		builder.add_mapping(1, 0, src, 1, 0);

		let uri = builder.to_data_uri();
		let payload = uri
			.strip_prefix("data:application/json;charset=utf-8;base64,")
			.expect("data uri prefix");
		let decoded = BASE64_STANDARD.decode(payload).unwrap();
		let map = SourceMap::from_slice(&decoded).unwrap();
		assert_eq!(map.file(), Some("debug.css"));
	}
}
