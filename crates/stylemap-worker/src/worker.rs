// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The worker task: command handling and the periodic render loop.

use std::time::Duration;

use stylemap_resolve::{Fetch, FrameResolver};
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::command::{Command, WorkerMessage};
use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};
use crate::registry::{Marker, MarkerRegistry};
use crate::render::render;

/// Handle to a spawned worker.
///
/// Commands go in, rendered messages come out. Dropping the handle closes
/// the command channel and ends the worker task.
pub struct WorkerHandle {
	commands: mpsc::Sender<Command>,
	messages: mpsc::Receiver<WorkerMessage>,
}

impl WorkerHandle {
	/// Send a command to the worker.
	pub async fn send(&self, command: Command) -> Result<()> {
		self.commands
			.send(command)
			.await
			.map_err(|_| WorkerError::ChannelClosed)
	}

	/// Receive the next message from the worker.
	///
	/// Returns None once the worker task has ended.
	pub async fn recv(&mut self) -> Option<WorkerMessage> {
		self.messages.recv().await
	}
}

/// Spawn a worker with default channel sizing.
pub fn spawn<F: Fetch>(fetcher: F) -> WorkerHandle {
	spawn_with_config(fetcher, WorkerConfig::default())
}

/// Spawn a worker task and return its handle.
pub fn spawn_with_config<F: Fetch>(fetcher: F, config: WorkerConfig) -> WorkerHandle {
	let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
	let (message_tx, message_rx) = mpsc::channel(config.message_capacity);

	let worker = Worker {
		resolver: FrameResolver::new(fetcher),
		registry: MarkerRegistry::new(),
		initialized: false,
		pending: Vec::new(),
		ticker: None,
		messages: message_tx,
	};
	tokio::spawn(worker.run(command_rx));

	WorkerHandle {
		commands: command_tx,
		messages: message_rx,
	}
}

enum Event {
	Command(Option<Command>),
	Tick,
}

struct Worker<F: Fetch> {
	resolver: FrameResolver<F>,
	registry: MarkerRegistry,
	/// Whether the decode engine has been activated via `init_wasm`.
	initialized: bool,
	/// Commands received before initialization, replayed after it.
	pending: Vec<Command>,
	/// Render ticker; absent until the first `set_render_interval`.
	ticker: Option<Interval>,
	messages: mpsc::Sender<WorkerMessage>,
}

impl<F: Fetch> Worker<F> {
	async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
		info!("debug worker started");

		loop {
			let event = {
				let tick = next_tick(&mut self.ticker);
				tokio::select! {
					command = commands.recv() => Event::Command(command),
					_ = tick => Event::Tick,
				}
			};

			match event {
				Event::Command(Some(command)) => self.handle_command(command).await,
				Event::Command(None) => break,
				Event::Tick => {
					if self.render_tick().await.is_err() {
						break;
					}
				}
			}
		}

		info!("debug worker stopped");
	}

	async fn handle_command(&mut self, command: Command) {
		match command {
			Command::InitWasm { url } => {
				if self.initialized {
					debug!(url = %url, "decode engine already initialized");
					return;
				}
				self.initialized = true;
				debug!(url = %url, "decode engine initialized");
				for queued in std::mem::take(&mut self.pending) {
					self.apply(queued).await;
				}
			}
			command if !self.initialized => {
				debug!("queueing command until engine is initialized");
				self.pending.push(command);
			}
			command => self.apply(command).await,
		}
	}

	async fn apply(&mut self, command: Command) {
		match command {
			// Handled (or queued) in handle_command.
			Command::InitWasm { .. } => {}

			Command::AddMappedClass {
				stack_info,
				class_name,
				stack_index,
			} => match stack_info.frame(stack_index) {
				Ok(frame) => {
					debug!(class = %class_name, script = %frame.script_url, line = frame.line, "marker registered");
					self.registry.insert(Marker { class_name, frame });
				}
				Err(e) => {
					warn!(class = %class_name, error = %e, "unusable stack info, marker not registered");
					let _ = self
						.messages
						.send(WorkerMessage::Error {
							error: e.to_string(),
						})
						.await;
				}
			},

			Command::SetRenderInterval { interval: millis } => {
				debug!(interval_ms = millis, "render interval set");
				let mut ticker = interval(Duration::from_millis(millis.max(1)));
				ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
				self.ticker = Some(ticker);
			}

			Command::Invalidate => {
				debug!("invalidating resolution caches");
				self.resolver.invalidate_all();
			}

			Command::Unknown => {
				warn!("ignoring unrecognized command");
			}
		}
	}

	async fn render_tick(&mut self) -> Result<()> {
		if self.registry.is_empty() {
			debug!("no markers registered, skipping render");
			return Ok(());
		}

		let css = render(&self.resolver, &self.registry).await;
		self.messages
			.send(WorkerMessage::Css { css })
			.await
			.map_err(|_| WorkerError::ChannelClosed)
	}
}

/// Wait for the next render tick, or forever if no interval is set.
async fn next_tick(ticker: &mut Option<Interval>) {
	match ticker {
		Some(ticker) => {
			ticker.tick().await;
		}
		None => std::future::pending().await,
	}
}
