// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map parsing and position lookup.
//!
//! Implements the Source Map v3 specification for resolving generated
//! script positions back to authored source positions.

use serde::Deserialize;

use crate::error::{DecodeError, Result};
use crate::vlq::{decode_vlq_mappings, DecodedMappings};

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	file: Option<String>,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<String>,
	#[serde(default)]
	sources_content: Option<Vec<Option<String>>>,
	#[serde(default)]
	names: Vec<String>,
	mappings: String,
}

/// Parsed source map ready for lookups.
///
/// Immutable once built; the resolution cache hands it out as a shared
/// reference and never updates it in place.
#[derive(Debug, Clone)]
pub struct SourceMap {
	file: Option<String>,
	source_root: Option<String>,
	sources: Vec<String>,
	sources_content: Vec<Option<String>>,
	names: Vec<String>,
	mappings: DecodedMappings,
}

/// Original position information from a source map lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
	/// Original source identifier (path or URL as authored in the map).
	pub source: String,
	/// Line in the original source (1-indexed for display).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
	/// Original identifier name if available.
	pub name: Option<String>,
	/// Original source content if embedded.
	pub content: Option<String>,
}

impl SourceMap {
	/// Parse a source map from JSON bytes.
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		let raw: RawSourceMap =
			serde_json::from_slice(data).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

		if raw.version != 3 {
			return Err(DecodeError::UnsupportedVersion(raw.version));
		}

		let mappings = decode_vlq_mappings(&raw.mappings)?;

		// Reject references to sources the payload doesn't declare.
		if let Some(record) = mappings
			.records()
			.iter()
			.find(|r| r.source_index as usize >= raw.sources.len())
		{
			return Err(DecodeError::InvalidSourceIndex(record.source_index));
		}

		let mut sources_content = raw.sources_content.unwrap_or_default();
		sources_content.resize(raw.sources.len(), None);

		Ok(Self {
			file: raw.file,
			source_root: raw.source_root,
			sources: raw.sources,
			sources_content,
			names: raw.names,
			mappings,
		})
	}

	/// Parse a source map from a JSON string.
	pub fn from_str(data: &str) -> Result<Self> {
		Self::from_slice(data.as_bytes())
	}

	/// Look up the original position for a generated line and column.
	///
	/// Lines are 1-indexed (as displayed in stack traces), columns are
	/// 0-indexed. The greatest record at or before the queried position
	/// wins; a query before all records clamps to the first record.
	/// Returns None only when the map has no records at all.
	pub fn lookup(&self, line: u32, column: u32) -> Option<OriginalPosition> {
		let line_0indexed = line.saturating_sub(1);
		let record = self.mappings.find(line_0indexed, column)?;

		// Indices were validated at decode time.
		let source = &self.sources[record.source_index as usize];
		let content = self.sources_content[record.source_index as usize].clone();
		let name = record
			.name_index
			.and_then(|idx| self.names.get(idx as usize).cloned());

		Some(OriginalPosition {
			source: self.resolve_source_path(source),
			line: record.original_line + 1,
			column: record.original_column,
			name,
			content,
		})
	}

	/// Resolve a source path with the source root if present.
	fn resolve_source_path(&self, source: &str) -> String {
		match &self.source_root {
			Some(root) if !root.is_empty() => {
				let root = root.trim_end_matches('/');
				format!("{}/{}", root, source)
			}
			_ => source.to_string(),
		}
	}

	/// Embedded original content for a source identifier, if the payload
	/// carried it.
	pub fn content_for(&self, source: &str) -> Option<&str> {
		self.sources
			.iter()
			.position(|s| self.resolve_source_path(s) == source)
			.and_then(|idx| self.sources_content[idx].as_deref())
	}

	pub fn file(&self) -> Option<&str> {
		self.file.as_deref()
	}

	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	pub fn has_sources_content(&self) -> bool {
		self.sources_content.iter().any(|c| c.is_some())
	}

	pub fn mapping_count(&self) -> usize {
		self.mappings.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_source_map() -> &'static str {
		// Generated line 1 maps to original line 7 of the authored module.
		r#"{
			"version": 3,
			"file": "client.js",
			"sourceRoot": "",
			"sources": ["webpack:///client.js?n=0"],
			"sourcesContent": ["// 1\n// 2\n// 3\n// 4\n// 5\n// 6\nconst err1 = new Error(\"Line 5\");\n"],
			"names": [],
			"mappings": "AAMA"
		}"#
	}

	#[test]
	fn test_parse_source_map() {
		let map = SourceMap::from_str(sample_source_map()).unwrap();

		assert_eq!(map.file(), Some("client.js"));
		assert_eq!(map.sources(), ["webpack:///client.js?n=0"]);
		assert!(map.has_sources_content());
		assert_eq!(map.mapping_count(), 1);
	}

	#[test]
	fn test_lookup_first_position_round_trip() {
		let map = SourceMap::from_str(sample_source_map()).unwrap();

		let pos = map.lookup(1, 0).unwrap();
		assert_eq!(pos.source, "webpack:///client.js?n=0");
		assert_eq!(pos.line, 7);
		assert_eq!(pos.column, 0);
		assert_eq!(
			pos.content.as_deref(),
			map.content_for("webpack:///client.js?n=0")
		);
		assert!(pos.content.unwrap().contains("const err1"));
	}

	#[test]
	fn test_lookup_later_column_snaps_back() {
		let map = SourceMap::from_str(sample_source_map()).unwrap();

		// Any column on line 1 resolves through the single record.
		let pos = map.lookup(1, 42).unwrap();
		assert_eq!(pos.line, 7);
		assert_eq!(pos.column, 0);
	}

	#[test]
	fn test_lookup_empty_map() {
		let map = SourceMap::from_str(
			r#"{"version": 3, "sources": [], "names": [], "mappings": ""}"#,
		)
		.unwrap();
		assert!(map.lookup(1, 0).is_none());
	}

	#[test]
	fn test_invalid_version() {
		let result = SourceMap::from_str(
			r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#,
		);
		assert!(matches!(result, Err(DecodeError::UnsupportedVersion(2))));
	}

	#[test]
	fn test_invalid_json() {
		assert!(matches!(
			SourceMap::from_str("{not json"),
			Err(DecodeError::InvalidJson(_))
		));
	}

	#[test]
	fn test_source_index_out_of_range() {
		// Mapping references source index 1 but only one source exists.
		let result = SourceMap::from_str(
			r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "ACAA"}"#,
		);
		assert!(matches!(result, Err(DecodeError::InvalidSourceIndex(1))));
	}

	#[test]
	fn test_missing_sources_content_is_not_an_error() {
		let map = SourceMap::from_str(
			r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAA"}"#,
		)
		.unwrap();
		let pos = map.lookup(1, 0).unwrap();
		assert_eq!(pos.source, "a.js");
		assert!(pos.content.is_none());
	}

	#[test]
	fn test_source_root_resolution() {
		let map = SourceMap::from_str(
			r#"{
				"version": 3,
				"sourceRoot": "src/",
				"sources": ["index.ts"],
				"names": [],
				"mappings": "AAAA"
			}"#,
		)
		.unwrap();

		let pos = map.lookup(1, 0).unwrap();
		assert_eq!(pos.source, "src/index.ts");
	}
}
