// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! VLQ (Variable-Length Quantity) coding for source map mappings.
//!
//! Source maps use Base64 VLQ encoding for compact storage of line/column
//! mappings. This module decodes the `mappings` string into structured,
//! queryable form and encodes the reverse direction for generated maps.

use crate::error::{DecodeError, Result};

/// Base64 character set used in VLQ encoding.
const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Decode a Base64 character to its 6-bit value.
fn decode_char(ch: u8) -> Result<i64> {
	BASE64_CHARS
		.iter()
		.position(|&c| c == ch)
		.map(|pos| pos as i64)
		.ok_or(DecodeError::InvalidVlqChar(ch as char))
}

/// Decode a VLQ-encoded segment into a vector of signed integers.
///
/// Each segment represents one or more values:
/// - Minimum 1 value: generated column offset
/// - Optional 4 more values: source index, original line, original column,
///   name index
pub fn decode_vlq_segment(segment: &str) -> Result<Vec<i64>> {
	let mut values = Vec::new();
	let mut value = 0i64;
	let mut shift = 0u32;

	for ch in segment.bytes() {
		let digit = decode_char(ch)?;

		// Continuation bit is the 6th bit (0b100000 = 32)
		let continuation = digit & 0b100000 != 0;
		let digit_value = digit & 0b011111;

		// A value this wide cannot come from a real map.
		if shift > 62 {
			return Err(DecodeError::TruncatedSegment(segment.to_string()));
		}

		value += digit_value << shift;
		shift += 5;

		if !continuation {
			// Convert from sign-magnitude to two's complement.
			// The lowest bit indicates the sign: 1 = negative, 0 = positive.
			let negated = value & 1 != 0;
			value >>= 1;
			if negated {
				value = -value;
			}
			values.push(value);
			value = 0;
			shift = 0;
		}
	}

	// A dangling continuation bit means the segment was cut short.
	if shift != 0 {
		return Err(DecodeError::TruncatedSegment(segment.to_string()));
	}

	Ok(values)
}

/// Append the VLQ encoding of a single value to `out`.
pub fn encode_vlq(value: i64, out: &mut String) {
	// Sign goes in the lowest bit.
	let mut rest = if value < 0 {
		((-value) << 1) | 1
	} else {
		value << 1
	};

	loop {
		let mut digit = rest & 0b011111;
		rest >>= 5;
		if rest != 0 {
			digit |= 0b100000;
		}
		out.push(BASE64_CHARS[digit as usize] as char);
		if rest == 0 {
			break;
		}
	}
}

/// A single mapping entry in the decoded source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
	/// Line in the generated file (0-indexed).
	pub generated_line: u32,
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	/// Index into the sources array.
	pub source_index: u32,
	/// Line in the original file (0-indexed).
	pub original_line: u32,
	/// Column in the original file (0-indexed).
	pub original_column: u32,
	/// Optional index into the names array.
	pub name_index: Option<u32>,
}

/// Container for decoded mappings with binary-searchable lookup.
#[derive(Debug, Clone, Default)]
pub struct DecodedMappings {
	/// Records sorted by generated line, then generated column.
	records: Vec<MappingRecord>,
}

impl DecodedMappings {
	/// Find the record for a given generated position (both 0-indexed).
	///
	/// Returns the greatest record at or before the queried position. A
	/// query before the first record clamps to the first record, so a
	/// non-empty map always resolves. Returns None only for an empty map.
	pub fn find(&self, line: u32, column: u32) -> Option<&MappingRecord> {
		if self.records.is_empty() {
			return None;
		}

		let idx = self
			.records
			.partition_point(|r| (r.generated_line, r.generated_column) <= (line, column));

		if idx == 0 {
			self.records.first()
		} else {
			Some(&self.records[idx - 1])
		}
	}

	pub fn records(&self) -> &[MappingRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

/// Decode a VLQ-encoded source map mappings string into structured form.
///
/// The mappings string format:
/// - Lines are separated by semicolons (;)
/// - Segments within a line are separated by commas (,)
/// - Each segment contains 1, 4, or 5 VLQ-encoded values, delta-encoded
///   against the previous segment
///
/// The result is sorted ascending by generated position; when several
/// records collapse onto the same generated line/column, the first one is
/// authoritative and later duplicates are dropped.
pub fn decode_vlq_mappings(mappings: &str) -> Result<DecodedMappings> {
	let mut records: Vec<MappingRecord> = Vec::new();
	let mut generated_line = 0u32;

	// State for relative decoding (values are delta-encoded).
	let mut prev_source = 0i64;
	let mut prev_original_line = 0i64;
	let mut prev_original_column = 0i64;
	let mut prev_name = 0i64;

	for line in mappings.split(';') {
		let mut generated_column = 0i64;

		for segment in line.split(',') {
			if segment.is_empty() {
				continue;
			}

			let values = decode_vlq_segment(segment)?;

			if values.is_empty() {
				continue;
			}

			// First value is always the generated column (relative).
			generated_column += values[0];

			// Segments with 4+ values carry source information; a bare
			// column segment maps to nothing and is skipped.
			if values.len() < 4 {
				continue;
			}

			prev_source += values[1];
			prev_original_line += values[2];
			prev_original_column += values[3];

			if generated_column < 0
				|| prev_source < 0
				|| prev_original_line < 0
				|| prev_original_column < 0
			{
				return Err(DecodeError::InvalidDelta {
					line: generated_line,
				});
			}

			let name_index = if values.len() >= 5 {
				prev_name += values[4];
				if prev_name < 0 {
					return Err(DecodeError::InvalidDelta {
						line: generated_line,
					});
				}
				Some(prev_name as u32)
			} else {
				None
			};

			records.push(MappingRecord {
				generated_line,
				generated_column: generated_column as u32,
				source_index: prev_source as u32,
				original_line: prev_original_line as u32,
				original_column: prev_original_column as u32,
				name_index,
			});
		}

		generated_line += 1;
	}

	// Reconstruct an ascending sequence; first record per generated
	// position wins.
	records.sort_by_key(|r| (r.generated_line, r.generated_column));
	records.dedup_by_key(|r| (r.generated_line, r.generated_column));

	Ok(DecodedMappings { records })
}
