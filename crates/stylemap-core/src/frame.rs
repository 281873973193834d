// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack-frame types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StackError};
use crate::stack::parse_stack;

/// A single stack-frame location in a script as served to the browser.
///
/// Lines are 1-indexed (as they appear in stack traces), columns are kept
/// exactly as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
	/// Absolute URL of the script the frame points into.
	pub script_url: String,
	/// Line in the script (1-indexed).
	pub line: u32,
	/// Column in the script.
	pub column: u32,
	/// Function name if the stack line carried one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
}

/// An ordered sequence of frames, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

/// The raw error-stack record shipped by the host page.
///
/// Only the `stack` string is interpreted; any other fields the host
/// includes (message, name, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackInfo {
	pub stack: String,
}

impl StackInfo {
	/// Parse the stack string into a structured stacktrace.
	pub fn parse(&self) -> Stacktrace {
		Stacktrace {
			frames: parse_stack(&self.stack),
		}
	}

	/// Select a single frame by index, innermost frame first.
	pub fn frame(&self, index: usize) -> Result<Frame> {
		let frames = parse_stack(&self.stack);
		if frames.is_empty() {
			return Err(StackError::EmptyStack);
		}
		frames
			.get(index)
			.cloned()
			.ok_or(StackError::FrameIndexOutOfRange {
				index,
				available: frames.len(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_frame_selection() {
		let info = StackInfo {
			stack: "Error: boom\n    at foo (http://localhost/a.js:5:13)\n    at http://localhost/b.js:9:1".to_string(),
		};

		let frame = info.frame(0).unwrap();
		assert_eq!(frame.script_url, "http://localhost/a.js");
		assert_eq!(frame.line, 5);
		assert_eq!(frame.column, 13);
		assert_eq!(frame.function, Some("foo".to_string()));

		let frame = info.frame(1).unwrap();
		assert_eq!(frame.script_url, "http://localhost/b.js");
		assert_eq!(frame.function, None);
	}

	#[test]
	fn test_frame_index_out_of_range() {
		let info = StackInfo {
			stack: "Error\n    at http://localhost/a.js:1:1".to_string(),
		};

		assert_eq!(
			info.frame(3),
			Err(StackError::FrameIndexOutOfRange {
				index: 3,
				available: 1
			})
		);
	}

	#[test]
	fn test_empty_stack() {
		let info = StackInfo {
			stack: "Error: nothing useful".to_string(),
		};
		assert_eq!(info.frame(0), Err(StackError::EmptyStack));
	}

	#[test]
	fn test_stack_info_ignores_extra_fields() {
		let info: StackInfo = serde_json::from_str(
			r#"{"stack": "Error\n    at http://localhost/a.js:1:1", "message": "boom"}"#,
		)
		.unwrap();
		assert_eq!(info.parse().frames.len(), 1);
	}
}
