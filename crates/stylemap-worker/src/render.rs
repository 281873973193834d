// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stylesheet synthesis.
//!
//! Each tick renders every registered marker as one empty rule on its own
//! line and builds a generated source map chaining that line to the
//! marker's resolved original position, with original content inlined so
//! `sourceContentFor` works on the consumer side.

use stylemap_decode::SourceMapBuilder;
use stylemap_resolve::{Fetch, FrameResolver, ResolvedPosition};
use tracing::{instrument, warn};

use crate::registry::MarkerRegistry;

/// Render the full artifact for the current registry state.
///
/// Markers are resolved sequentially in registration order so output line
/// numbers are deterministic. A marker whose resolution errors (malformed
/// payload, bad URL) degrades to a best-effort self-mapped position; the
/// tick always produces a complete artifact.
#[instrument(skip(resolver, registry), fields(markers = registry.len()))]
pub async fn render<F: Fetch>(resolver: &FrameResolver<F>, registry: &MarkerRegistry) -> String {
	let mut builder = SourceMapBuilder::new(None);
	let mut rules = Vec::with_capacity(registry.len());

	for (i, marker) in registry.markers().iter().enumerate() {
		let frame = &marker.frame;
		let position = match resolver
			.resolve_frame(&frame.script_url, frame.line, frame.column)
			.await
		{
			Ok(position) => position,
			Err(e) => {
				warn!(
					class = %marker.class_name,
					script = %frame.script_url,
					error = %e,
					"marker resolution failed, self-mapping"
				);
				let content = resolver
					.script_text(&frame.script_url)
					.await
					.map(|s| (*s).clone());
				ResolvedPosition {
					source: frame.script_url.clone(),
					line: frame.line,
					column: frame.column,
					content,
				}
			}
		};

		rules.push(format!(".{} {{}}", marker.class_name));
		let source = builder.add_source(&position.source, position.content.as_deref());
		builder.add_mapping(i as u32 + 1, 0, source, position.line, position.column);
	}

	format!(
		"{}\n/*# sourceMappingURL={} */",
		rules.join("\n"),
		builder.to_data_uri()
	)
}
