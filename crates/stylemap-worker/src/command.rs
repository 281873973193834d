// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command and message types for the external command source.
//!
//! Commands arrive one per message as JSON tagged by an `id` field. The
//! enum is closed over the recognized kinds; anything else deserializes to
//! [`Command::Unknown`], which is logged and ignored rather than silently
//! dropped or treated as an error.

use serde::{Deserialize, Serialize};
use stylemap_core::StackInfo;

use crate::error::Result;

/// A command from the external command source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "id", rename_all = "snake_case")]
pub enum Command {
	/// Activate the decode engine. Must complete before other commands
	/// take effect; commands received earlier are queued and replayed.
	InitWasm { url: String },

	/// Register a debug class for frame `stack_index` of `stack_info`.
	#[serde(rename_all = "camelCase")]
	AddMappedClass {
		stack_info: StackInfo,
		class_name: String,
		#[serde(default)]
		stack_index: usize,
	},

	/// (Re)start the periodic render tick.
	SetRenderInterval { interval: u64 },

	/// Invalidate every cached script and decoded mapping; the next
	/// resolution per key performs one fresh fetch.
	Invalidate,

	/// Any unrecognized command kind.
	#[serde(other)]
	Unknown,
}

impl Command {
	/// Parse a command from its JSON wire form.
	pub fn parse(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

/// A message from the worker back to the external command source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkerMessage {
	/// The rendered artifact for one tick: stylesheet text with the
	/// generated source map attached as a trailing data-URI comment.
	Css { css: String },
	/// A per-command failure (e.g. unusable stack info). Registered
	/// markers and the tick loop are unaffected.
	Error { error: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_init_wasm() {
		let cmd = Command::parse(r#"{"id": "init_wasm", "url": "/mappings.wasm"}"#).unwrap();
		assert_eq!(
			cmd,
			Command::InitWasm {
				url: "/mappings.wasm".to_string()
			}
		);
	}

	#[test]
	fn test_parse_add_mapped_class() {
		let cmd = Command::parse(
			r#"{
				"id": "add_mapped_class",
				"stackInfo": {"stack": "Error\n    at http://localhost/a.js:5:13"},
				"className": "__debug-1",
				"stackIndex": 0
			}"#,
		)
		.unwrap();

		match cmd {
			Command::AddMappedClass {
				stack_info,
				class_name,
				stack_index,
			} => {
				assert_eq!(class_name, "__debug-1");
				assert_eq!(stack_index, 0);
				assert!(stack_info.stack.contains("a.js:5:13"));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_parse_set_render_interval() {
		let cmd = Command::parse(r#"{"id": "set_render_interval", "interval": 60}"#).unwrap();
		assert_eq!(cmd, Command::SetRenderInterval { interval: 60 });
	}

	#[test]
	fn test_parse_invalidate() {
		let cmd = Command::parse(r#"{"id": "invalidate"}"#).unwrap();
		assert_eq!(cmd, Command::Invalidate);
	}

	#[test]
	fn test_unknown_command_kind() {
		let cmd = Command::parse(r#"{"id": "reticulate_splines", "level": 9}"#).unwrap();
		assert_eq!(cmd, Command::Unknown);
	}

	#[test]
	fn test_message_wire_shape() {
		let msg = WorkerMessage::Css {
			css: ".__debug-1 {}".to_string(),
		};
		assert_eq!(
			serde_json::to_string(&msg).unwrap(),
			r#"{"css":".__debug-1 {}"}"#
		);

		let msg = WorkerMessage::Error {
			error: "bad stack".to_string(),
		};
		assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"error":"bad stack"}"#);
	}
}
