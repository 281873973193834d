// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Debug worker: resolves registered stack frames to original source
//! positions and periodically renders them as a stylesheet with an
//! attached generated source map.
//!
//! The worker consumes commands from an external command source (the host
//! page, over whatever transport it uses) and emits one message per render
//! tick whose `css` field carries the full artifact. A source-map-aware
//! consumer pointed at that css can jump from each debug class straight to
//! the authored source line.
//!
//! # Example
//!
//! ```no_run
//! use stylemap_resolve::HttpFetcher;
//! use stylemap_worker::{spawn, Command, WorkerMessage};
//!
//! # async fn run() {
//! let mut handle = spawn(HttpFetcher::new());
//!
//! handle.send(Command::InitWasm { url: "/mappings.wasm".into() }).await.unwrap();
//! handle
//! 	.send(Command::parse(r#"{
//! 		"id": "add_mapped_class",
//! 		"stackInfo": {"stack": "Error\n    at http://localhost/app.js:5:13"},
//! 		"className": "__debug-1",
//! 		"stackIndex": 0
//! 	}"#).unwrap())
//! 	.await
//! 	.unwrap();
//! handle.send(Command::SetRenderInterval { interval: 60 }).await.unwrap();
//!
//! while let Some(WorkerMessage::Css { css }) = handle.recv().await {
//! 	println!("{css}");
//! }
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod worker;

pub use command::{Command, WorkerMessage};
pub use config::WorkerConfig;
pub use error::{Result, WorkerError};
pub use registry::{Marker, MarkerRegistry};
pub use render::render;
pub use worker::{spawn, spawn_with_config, WorkerHandle};
