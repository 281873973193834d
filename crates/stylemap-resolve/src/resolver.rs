// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Frame position resolution.
//!
//! Composes the location provider, resolution cache and mapping decoder
//! into the full fallback chain: inline payload, external payload, absent
//! reference, and finally self-mapping when nothing better is recoverable.

use std::sync::Arc;

use stylemap_decode::SourceMap;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::cache::FetchCache;
use crate::error::{ResolveError, Result};
use crate::fetch::Fetch;
use crate::locate::{locate, MappingLocation};

/// A frame location resolved back to authored source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition {
	/// Original source identifier: the literal identifier embedded in the
	/// mapping payload, or the absolute script URL when self-mapped.
	pub source: String,
	/// Line in the original source (1-indexed).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
	/// Original source text when available.
	pub content: Option<String>,
}

/// Resolves generated frame positions to original source positions.
///
/// Holds the only shared mutable state in the pipeline: the script-text
/// and decoded-map caches. Constructed once per worker and passed by
/// reference; [`FrameResolver::invalidate_all`] is the explicit
/// invalidation lifecycle hook.
pub struct FrameResolver<F: Fetch> {
	fetcher: Arc<F>,
	scripts: FetchCache<String>,
	maps: FetchCache<SourceMap>,
}

impl<F: Fetch> FrameResolver<F> {
	pub fn new(fetcher: F) -> Self {
		Self {
			fetcher: Arc::new(fetcher),
			scripts: FetchCache::new(),
			maps: FetchCache::new(),
		}
	}

	/// Mark all cached scripts and decoded maps invalidated.
	///
	/// Never cancels in-flight fetches; the next resolution per key does
	/// exactly one fresh fetch and decode.
	pub fn invalidate_all(&self) {
		self.scripts.invalidate_all();
		self.maps.invalidate_all();
	}

	/// Raw script text for a URL, if it is already cached or fetchable.
	pub async fn script_text(&self, script_url: &str) -> Option<Arc<String>> {
		let url = Url::parse(script_url).ok()?;
		self.fetch_script(&url).await.ok()
	}

	/// Resolve a generated frame position to an original source position.
	///
	/// `line` is 1-indexed, `column` 0-indexed. A missing or unfetchable
	/// mapping degrades to self-mapping rather than failing; only a
	/// malformed payload surfaces as an error.
	#[instrument(skip(self), fields(script = %script_url))]
	pub async fn resolve_frame(
		&self,
		script_url: &str,
		line: u32,
		column: u32,
	) -> Result<ResolvedPosition> {
		let url = Url::parse(script_url).map_err(|e| ResolveError::InvalidUrl {
			url: script_url.to_string(),
			reason: e.to_string(),
		})?;

		// Without the script text there is nothing left to consult.
		let script = match self.fetch_script(&url).await {
			Ok(script) => script,
			Err(ResolveError::FetchFailed { reason, .. }) => {
				warn!(script = %url, reason = %reason, "script fetch failed, self-mapping without content");
				return Ok(self_mapped(&url, line, column, None));
			}
			Err(e) => return Err(e),
		};

		let map = match locate(&script, &url)? {
			MappingLocation::Absent => {
				debug!(script = %url, "no mapping reference, self-mapping");
				return Ok(self_mapped(&url, line, column, Some((*script).clone())));
			}
			MappingLocation::Inline(bytes) => {
				self.maps
					.get_or_load(url.as_str(), move || async move {
						SourceMap::from_slice(&bytes).map_err(ResolveError::from)
					})
					.await?
			}
			MappingLocation::External(map_url) => {
				match self.fetch_map(&map_url).await {
					Ok(map) => map,
					Err(ResolveError::FetchFailed { reason, .. }) => {
						// Not cached, not retried; only an explicit
						// invalidation leads to another attempt.
						debug!(map = %map_url, reason = %reason, "mapping fetch failed, self-mapping");
						return Ok(self_mapped(&url, line, column, Some((*script).clone())));
					}
					Err(e) => return Err(e),
				}
			}
		};

		match map.lookup(line, column) {
			Some(original) => Ok(ResolvedPosition {
				source: original.source,
				line: original.line,
				column: original.column,
				content: original.content,
			}),
			None => {
				debug!(script = %url, "mapping payload has no records, self-mapping");
				Ok(self_mapped(&url, line, column, Some((*script).clone())))
			}
		}
	}

	async fn fetch_script(&self, url: &Url) -> Result<Arc<String>> {
		let fetcher = Arc::clone(&self.fetcher);
		let target = url.to_string();
		self.scripts
			.get_or_load(url.as_str(), move || async move {
				fetcher.fetch(&target).await
			})
			.await
	}

	async fn fetch_map(&self, map_url: &Url) -> Result<Arc<SourceMap>> {
		let fetcher = Arc::clone(&self.fetcher);
		let target = map_url.to_string();
		self.maps
			.get_or_load(map_url.as_str(), move || async move {
				let body = fetcher.fetch(&target).await?;
				SourceMap::from_str(&body).map_err(ResolveError::from)
			})
			.await
	}
}

/// Treat the script as its own original source.
fn self_mapped(url: &Url, line: u32, column: u32, content: Option<String>) -> ResolvedPosition {
	ResolvedPosition {
		source: url.to_string(),
		line,
		column,
		content,
	}
}
