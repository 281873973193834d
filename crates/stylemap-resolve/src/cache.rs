// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keyed singleflight cache with epoch invalidation.
//!
//! Stores load results keyed by resolved mapping identity (absolute map
//! URL, or script URL for inline payloads). Concurrent loads for the same
//! key attach to one shared in-flight future, so a key is fetched at most
//! once per invalidation epoch. Failures are delivered to every waiter and
//! never cached.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{FutureExt, Shared};
use tracing::debug;

use crate::error::Result;

type PendingLoad<T> = Shared<Pin<Box<dyn Future<Output = Result<Arc<T>>> + Send>>>;

#[derive(Clone)]
enum Slot<T> {
	Ready(Arc<T>),
	Pending(PendingLoad<T>),
}

struct Entry<T> {
	/// Epoch the entry was created in; entries from older epochs are
	/// treated as invalidated and reloaded on the next lookup.
	epoch: u64,
	slot: Slot<T>,
}

/// Cache of loaded values keyed by string identity.
///
/// The entry map mutex is never held across an await; all waiting happens
/// on the shared load future outside the lock.
pub struct FetchCache<T> {
	epoch: AtomicU64,
	entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T> Default for FetchCache<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> FetchCache<T> {
	pub fn new() -> Self {
		Self {
			epoch: AtomicU64::new(0),
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Mark every entry invalidated.
	///
	/// Non-blocking: nothing is evicted and in-flight loads are not
	/// cancelled; the next lookup per key performs exactly one fresh load.
	pub fn invalidate_all(&self) {
		let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
		debug!(epoch, "cache invalidated");
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().unwrap().is_empty()
	}
}

impl<T: Send + Sync + 'static> FetchCache<T> {
	/// Return the cached value for `key`, or run `load` to produce it.
	///
	/// If another load for `key` is already in flight in the current
	/// epoch, this waits for and shares that result instead of loading
	/// again. A failed load is returned to all waiters and leaves no
	/// cached entry behind.
	pub async fn get_or_load<F, Fut>(&self, key: &str, load: F) -> Result<Arc<T>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>> + Send + 'static,
	{
		let epoch = self.epoch.load(Ordering::Acquire);

		let pending = {
			let mut entries = self.entries.lock().unwrap();

			let reuse = match entries.get(key) {
				Some(entry) if entry.epoch == epoch => match &entry.slot {
					Slot::Ready(value) => return Ok(Arc::clone(value)),
					Slot::Pending(fut) => Some(fut.clone()),
				},
				// Missing, or left over from a previous epoch.
				_ => None,
			};

			match reuse {
				Some(fut) => fut,
				None => {
					let fut = load();
					let shared: PendingLoad<T> =
						(Box::pin(async move { fut.await.map(Arc::new) })
							as Pin<Box<dyn Future<Output = Result<Arc<T>>> + Send>>)
							.shared();
					entries.insert(
						key.to_string(),
						Entry {
							epoch,
							slot: Slot::Pending(shared.clone()),
						},
					);
					shared
				}
			}
		};

		let result = pending.await;

		// Settle the slot; every waiter runs this, the first one wins.
		let mut entries = self.entries.lock().unwrap();
		if let Some(entry) = entries.get_mut(key) {
			if entry.epoch == epoch {
				if let Slot::Pending(_) = entry.slot {
					match &result {
						Ok(value) => entry.slot = Slot::Ready(Arc::clone(value)),
						Err(_) => {
							entries.remove(key);
						}
					}
				}
			}
		}

		result
	}
}
