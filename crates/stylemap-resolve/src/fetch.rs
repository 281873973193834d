// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fetch abstraction over the external HTTP provider.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ResolveError, Result};

/// Default timeout for script and source map fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch provider for scripts and external mapping payloads.
///
/// Implementations perform an HTTP GET against an absolute URL and return
/// the body as text. A non-success status must surface as
/// [`ResolveError::FetchFailed`], not as a body.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
	async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
	async fn fetch(&self, url: &str) -> Result<String> {
		(**self).fetch(url).await
	}
}

/// HTTP fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: reqwest::Client,
}

impl HttpFetcher {
	pub fn new() -> Self {
		Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
	}

	pub fn with_timeout(timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.user_agent(user_agent())
			.timeout(timeout)
			.build()
			.expect("failed to build HTTP client");
		Self { client }
	}
}

impl Default for HttpFetcher {
	fn default() -> Self {
		Self::new()
	}
}

/// Returns the standard stylemap User-Agent string.
pub fn user_agent() -> String {
	format!("stylemap/{}", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl Fetch for HttpFetcher {
	async fn fetch(&self, url: &str) -> Result<String> {
		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(|e| ResolveError::FetchFailed {
				url: url.to_string(),
				reason: e.to_string(),
			})?;

		let status = response.status();
		if !status.is_success() {
			debug!(url = %url, status = %status, "fetch returned non-success status");
			return Err(ResolveError::FetchFailed {
				url: url.to_string(),
				reason: format!("status {}", status),
			});
		}

		response.text().await.map_err(|e| ResolveError::FetchFailed {
			url: url.to_string(),
			reason: e.to_string(),
		})
	}
}

/// Canned response for [`StaticFetch`].
#[derive(Debug, Clone)]
enum StaticResponse {
	Body(String),
	Status(u16),
}

/// In-memory fetcher for testing and simple use cases.
///
/// Routes map absolute URLs to bodies or error statuses; every fetch is
/// counted so tests can assert how often a URL was actually requested.
#[derive(Debug, Default)]
pub struct StaticFetch {
	routes: Mutex<HashMap<String, StaticResponse>>,
	hits: Mutex<HashMap<String, usize>>,
	delay: Mutex<Option<Duration>>,
}

impl StaticFetch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Serve `body` for `url`.
	pub fn add(&self, url: &str, body: &str) {
		self.routes
			.lock()
			.unwrap()
			.insert(url.to_string(), StaticResponse::Body(body.to_string()));
	}

	/// Serve a bare status code (e.g. 404) for `url`.
	pub fn add_status(&self, url: &str, status: u16) {
		self.routes
			.lock()
			.unwrap()
			.insert(url.to_string(), StaticResponse::Status(status));
	}

	/// Delay every response, so tests can observe overlapping fetches.
	pub fn set_delay(&self, delay: Duration) {
		*self.delay.lock().unwrap() = Some(delay);
	}

	/// Number of times `url` has been fetched.
	pub fn hits(&self, url: &str) -> usize {
		self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
	}
}

#[async_trait]
impl Fetch for StaticFetch {
	async fn fetch(&self, url: &str) -> Result<String> {
		*self
			.hits
			.lock()
			.unwrap()
			.entry(url.to_string())
			.or_insert(0) += 1;

		let delay = *self.delay.lock().unwrap();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let response = self.routes.lock().unwrap().get(url).cloned();
		match response {
			Some(StaticResponse::Body(body)) => Ok(body),
			Some(StaticResponse::Status(status)) => Err(ResolveError::FetchFailed {
				url: url.to_string(),
				reason: format!("status {}", status),
			}),
			None => Err(ResolveError::FetchFailed {
				url: url.to_string(),
				reason: "no route".to_string(),
			}),
		}
	}
}
