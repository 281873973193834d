// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locating a script's mapping data.
//!
//! Scans the trailing end of a script for a `sourceMappingURL` comment and
//! classifies the reference as an inline data URI, an external URL
//! (resolved against the script URL), or absent.

use base64::prelude::*;
use stylemap_decode::DecodeError;
use tracing::debug;
use url::Url;

use crate::error::{ResolveError, Result};

/// Only the trailing window of a script is scanned for the mapping
/// reference, so large bundles aren't walked end to end.
pub const TRAILING_WINDOW: usize = 8 * 1024;

/// Where a script's mapping data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingLocation {
	/// Payload embedded in the script as a base64 data URI.
	Inline(Vec<u8>),
	/// Payload at an absolute URL, resolved against the script URL.
	External(Url),
	/// The script carries no mapping reference.
	Absent,
}

/// Determine where the mapping data for `script` lives.
///
/// The reference is the last `//# sourceMappingURL=` (or legacy `//@`)
/// comment within the trailing window, regardless of trailing whitespace
/// or newlines after it.
pub fn locate(script: &str, script_url: &Url) -> Result<MappingLocation> {
	let window = trailing_window(script);

	let value = match find_reference(window) {
		Some(value) => value,
		None => return Ok(MappingLocation::Absent),
	};

	if let Some(data) = value.strip_prefix("data:") {
		let payload = data
			.split_once("base64,")
			.map(|(_, payload)| payload.trim())
			.ok_or_else(|| {
				DecodeError::InvalidBase64("data URI without base64 payload".to_string())
			})?;
		let bytes = BASE64_STANDARD
			.decode(payload)
			.map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
		debug!(script = %script_url, bytes = bytes.len(), "found inline mapping payload");
		return Ok(MappingLocation::Inline(bytes));
	}

	let absolute = script_url
		.join(value)
		.map_err(|e| ResolveError::InvalidUrl {
			url: value.to_string(),
			reason: e.to_string(),
		})?;
	debug!(script = %script_url, map = %absolute, "found external mapping reference");
	Ok(MappingLocation::External(absolute))
}

/// The last `TRAILING_WINDOW` bytes of the script, on a char boundary.
fn trailing_window(script: &str) -> &str {
	let mut start = script.len().saturating_sub(TRAILING_WINDOW);
	while !script.is_char_boundary(start) {
		start += 1;
	}
	&script[start..]
}

/// Extract the value of the last mapping-reference comment in the window.
fn find_reference(window: &str) -> Option<&str> {
	for line in window.lines().rev() {
		let line = line.trim();
		if !(line.starts_with("//#") || line.starts_with("//@")) {
			continue;
		}
		if let Some(rest) = line.split_once("sourceMappingURL=").map(|(_, v)| v) {
			let value = rest.trim();
			if !value.is_empty() {
				return Some(value);
			}
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn script_url() -> Url {
		Url::parse("http://localhost:9000/_static/client.js").unwrap()
	}

	#[test]
	fn test_absent() {
		let location = locate("const x = 1;\n", &script_url()).unwrap();
		assert_eq!(location, MappingLocation::Absent);
	}

	#[test]
	fn test_external_relative() {
		let script = "const x = 1;\n//# sourceMappingURL=client.js.map\n";
		let location = locate(script, &script_url()).unwrap();
		assert_eq!(
			location,
			MappingLocation::External(
				Url::parse("http://localhost:9000/_static/client.js.map").unwrap()
			)
		);
	}

	#[test]
	fn test_external_absolute() {
		let script = "//# sourceMappingURL=http://cdn.example.com/maps/client.js.map";
		let location = locate(script, &script_url()).unwrap();
		assert_eq!(
			location,
			MappingLocation::External(
				Url::parse("http://cdn.example.com/maps/client.js.map").unwrap()
			)
		);
	}

	#[test]
	fn test_inline_data_uri() {
		let payload = r#"{"version":3,"sources":[],"names":[],"mappings":""}"#;
		let script = format!(
			"const x = 1;\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,{}\n\n",
			BASE64_STANDARD.encode(payload)
		);
		let location = locate(&script, &script_url()).unwrap();
		assert_eq!(location, MappingLocation::Inline(payload.as_bytes().to_vec()));
	}

	#[test]
	fn test_inline_bad_base64() {
		let script = "//# sourceMappingURL=data:application/json;base64,@@not-base64@@";
		let err = locate(script, &script_url()).unwrap_err();
		assert!(matches!(
			err,
			ResolveError::Malformed(DecodeError::InvalidBase64(_))
		));
	}

	#[test]
	fn test_legacy_at_comment() {
		let script = "//@ sourceMappingURL=legacy.js.map";
		let location = locate(script, &script_url()).unwrap();
		assert_eq!(
			location,
			MappingLocation::External(
				Url::parse("http://localhost:9000/_static/legacy.js.map").unwrap()
			)
		);
	}

	#[test]
	fn test_trailing_whitespace_tolerated() {
		let script = "const x = 1;\n//# sourceMappingURL=client.js.map   \n\n   \n";
		let location = locate(script, &script_url()).unwrap();
		assert!(matches!(location, MappingLocation::External(_)));
	}

	#[test]
	fn test_last_reference_wins() {
		let script =
			"//# sourceMappingURL=old.js.map\nconst x = 1;\n//# sourceMappingURL=new.js.map\n";
		let location = locate(script, &script_url()).unwrap();
		assert_eq!(
			location,
			MappingLocation::External(
				Url::parse("http://localhost:9000/_static/new.js.map").unwrap()
			)
		);
	}

	#[test]
	fn test_reference_outside_window_is_missed() {
		// The comment is buried under more than TRAILING_WINDOW of padding.
		let mut script = String::from("//# sourceMappingURL=buried.js.map\n");
		script.push_str(&"x".repeat(TRAILING_WINDOW + 64));
		let location = locate(&script, &script_url()).unwrap();
		assert_eq!(location, MappingLocation::Absent);
	}
}
