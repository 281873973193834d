// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Marker registry.

use stylemap_core::Frame;

/// A registered (frame, debug class) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
	pub class_name: String,
	pub frame: Frame,
}

/// Ordered set of markers keyed by class name.
///
/// Registration order is preserved and drives output line numbers;
/// re-registering a class name replaces the existing marker in place so
/// line numbers stay stable.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
	markers: Vec<Marker>,
}

impl MarkerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, marker: Marker) {
		match self
			.markers
			.iter_mut()
			.find(|m| m.class_name == marker.class_name)
		{
			Some(existing) => *existing = marker,
			None => self.markers.push(marker),
		}
	}

	pub fn markers(&self) -> &[Marker] {
		&self.markers
	}

	pub fn len(&self) -> usize {
		self.markers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.markers.is_empty()
	}
}
