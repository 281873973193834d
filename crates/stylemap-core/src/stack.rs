// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parsing of browser error-stack strings.
//!
//! Handles the two stack formats seen in practice:
//! - V8 (Chrome/Edge/Node): `    at func (http://host/x.js:5:13)` or
//!   `    at http://host/x.js:5:13`
//! - Firefox/Safari: `func@http://host/x.js:5:13` or `@http://host/x.js:5:13`

use crate::frame::Frame;

/// Parse an error-stack string into frames, innermost first.
///
/// Lines that don't carry a `url:line:column` location (the error message
/// line, `[native code]`, `<anonymous>`) are skipped.
pub fn parse_stack(stack: &str) -> Vec<Frame> {
	stack.lines().filter_map(parse_stack_line).collect()
}

/// Parse a single stack line into a Frame.
fn parse_stack_line(line: &str) -> Option<Frame> {
	let line = line.trim();
	if line.is_empty() {
		return None;
	}

	if let Some(rest) = line.strip_prefix("at ") {
		return parse_v8_frame(rest);
	}

	// Firefox/Safari lines are `name@location`; the name may be empty.
	if let Some((function, location)) = line.rsplit_once('@') {
		let (url, lineno, column) = parse_location(location)?;
		let function = match function.trim() {
			"" => None,
			f => Some(f.to_string()),
		};
		return Some(Frame {
			script_url: url,
			line: lineno,
			column,
			function,
		});
	}

	None
}

/// Parse the remainder of a V8 `at ...` line.
fn parse_v8_frame(rest: &str) -> Option<Frame> {
	let rest = rest.trim();

	// `func (location)` form; the location is inside the last paren pair.
	if let Some(open) = rest.rfind('(') {
		let close = rest.rfind(')')?;
		if close <= open {
			return None;
		}
		let (url, lineno, column) = parse_location(&rest[open + 1..close])?;
		let function = rest[..open]
			.trim()
			.trim_start_matches("async ")
			.trim()
			.to_string();
		let function = if function.is_empty() {
			None
		} else {
			Some(function)
		};
		return Some(Frame {
			script_url: url,
			line: lineno,
			column,
			function,
		});
	}

	// Bare `at location` form.
	let (url, lineno, column) = parse_location(rest)?;
	Some(Frame {
		script_url: url,
		line: lineno,
		column,
		function: None,
	})
}

/// Split a `url:line:column` location into its parts.
fn parse_location(location: &str) -> Option<(String, u32, u32)> {
	let location = location.trim();
	let (rest, column) = location.rsplit_once(':')?;
	let (url, line) = rest.rsplit_once(':')?;
	let line: u32 = line.parse().ok()?;
	let column: u32 = column.parse().ok()?;
	if url.is_empty() {
		return None;
	}
	Some((url.to_string(), line, column))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_v8_stack() {
		let stack = "Error: Line 5\n    at foo (http://localhost:8080/_static/client.js:5:13)\n    at http://localhost:8080/main.js:12:1";
		let frames = parse_stack(stack);

		assert_eq!(frames.len(), 2);
		assert_eq!(
			frames[0].script_url,
			"http://localhost:8080/_static/client.js"
		);
		assert_eq!(frames[0].line, 5);
		assert_eq!(frames[0].column, 13);
		assert_eq!(frames[0].function, Some("foo".to_string()));

		assert_eq!(frames[1].script_url, "http://localhost:8080/main.js");
		assert_eq!(frames[1].function, None);
	}

	#[test]
	fn test_parse_v8_async_frame() {
		let frames = parse_stack("    at async load (http://localhost/app.js:3:7)");
		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].function, Some("load".to_string()));
		assert_eq!(frames[0].line, 3);
	}

	#[test]
	fn test_parse_firefox_stack() {
		let stack = "foo@http://localhost/client.js:5:13\n@http://localhost/client.js:20:1";
		let frames = parse_stack(stack);

		assert_eq!(frames.len(), 2);
		assert_eq!(frames[0].function, Some("foo".to_string()));
		assert_eq!(frames[0].line, 5);
		assert_eq!(frames[0].column, 13);
		assert_eq!(frames[1].function, None);
		assert_eq!(frames[1].line, 20);
	}

	#[test]
	fn test_skips_unparsable_lines() {
		let stack = "Error: boom\n    at [native code]\n    at <anonymous>\n    at http://localhost/a.js:1:2";
		let frames = parse_stack(stack);
		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].script_url, "http://localhost/a.js");
	}

	#[test]
	fn test_url_with_port_and_query() {
		let frames = parse_stack("    at http://localhost:9000/a.js?v=2:7:0");
		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].script_url, "http://localhost:9000/a.js?v=2");
		assert_eq!(frames[0].line, 7);
		assert_eq!(frames[0].column, 0);
	}
}
