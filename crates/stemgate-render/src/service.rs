//! Background preview scheduling.
//!
//! Rendering is long-running and must stay off the real-time path, so the
//! service runs each render on a worker thread. Every request carries a
//! monotonically increasing generation; when a newer request for the same
//! item arrives, the older render is cancelled cooperatively and its result
//! is discarded on completion instead of applied. At most one render is in
//! flight per cache key; duplicate requests coalesce onto it.

use crate::cache::{PreviewCache, PreviewKey};
use crate::preview::{CancellationToken, GatePreview, render_preview};
use crate::{RenderError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use stemgate_core::{DrumClass, GateSettings};

/// Lock a mutex, recovering the data from a poisoned lock. Worker panics
/// must not wedge the whole service.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct ServiceState {
    cache: Mutex<PreviewCache>,
    /// Cache keys with a render currently running.
    in_flight: Mutex<HashMap<PreviewKey, CancellationToken>>,
    /// Newest generation (and its token) per logical item.
    latest: Mutex<HashMap<String, (u64, CancellationToken)>>,
    generation: AtomicU64,
}

/// Handle to one scheduled render.
#[derive(Debug)]
pub struct RenderJob {
    /// Generation this job was scheduled under.
    pub generation: u64,
    /// Token that cancels this job.
    pub cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RenderJob {
    /// Block until the worker finishes (render complete, cancelled, or
    /// failed). Primarily for tests and shutdown paths.
    pub fn wait(self) {
        let _ = self.handle.join();
    }
}

/// Outcome of a preview request.
#[derive(Debug)]
pub enum RequestOutcome {
    /// A still-valid render was already cached.
    Cached(Arc<GatePreview>),
    /// A render for this key is already running; its result will land in
    /// the cache.
    InFlight,
    /// A new background render was scheduled.
    Scheduled(RenderJob),
}

/// Schedules preview renders and owns the render cache.
///
/// Internally reference-counted; wrap it in an `Arc` to share between
/// owners.
#[derive(Default)]
pub struct PreviewService {
    state: Arc<ServiceState>,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self {
            cache: Mutex::new(PreviewCache::new()),
            in_flight: Mutex::new(HashMap::new()),
            latest: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }
}

impl PreviewService {
    /// Create a service with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached render without scheduling anything.
    pub fn cached(&self, key: &PreviewKey) -> Option<Arc<GatePreview>> {
        lock(&self.state.cache).get(key)
    }

    /// Evict one cached render, deleting its file.
    pub fn evict(&self, key: &PreviewKey) -> bool {
        lock(&self.state.cache).evict(key)
    }

    /// Drop all cached renders and their files; cancel anything running.
    pub fn clear(&self) {
        for (_, token) in lock(&self.state.in_flight).iter() {
            token.cancel();
        }
        lock(&self.state.latest).clear();
        lock(&self.state.cache).clear();
    }

    /// Request a preview for `item_id` (the stable identity of the stem in
    /// the host, independent of its current settings).
    ///
    /// Returns immediately: either a cache hit, a notice that the same key
    /// is already rendering, or a handle to a freshly scheduled job. A new
    /// request supersedes any older in-flight request for the same item:
    /// the older render is cancelled and its result discarded.
    pub fn request(
        &self,
        item_id: &str,
        source: &Path,
        settings: GateSettings,
        class: DrumClass,
        target_points: usize,
    ) -> Result<RequestOutcome> {
        let key = PreviewKey::new(source, &settings, class)?;

        if let Some(preview) = lock(&self.state.cache).get(&key) {
            return Ok(RequestOutcome::Cached(preview));
        }

        {
            let in_flight = lock(&self.state.in_flight);
            if in_flight.contains_key(&key) {
                tracing::debug!(item_id, "coalesced onto in-flight render");
                return Ok(RequestOutcome::InFlight);
            }
        }

        let generation = self.state.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();

        if let Some((old_generation, old_token)) = lock(&self.state.latest)
            .insert(item_id.to_string(), (generation, token.clone()))
        {
            tracing::debug!(item_id, old_generation, generation, "superseding render");
            old_token.cancel();
        }
        lock(&self.state.in_flight).insert(key.clone(), token.clone());

        let state = Arc::clone(&self.state);
        let worker_token = token.clone();
        let item = item_id.to_string();
        let source: PathBuf = source.to_path_buf();
        let worker_key = key;

        let handle = std::thread::spawn(move || {
            // The key was checked against the cache just before scheduling;
            // a racing render for the same key is excluded by in_flight.
            let result = render_preview(&source, &settings, class, target_points, &worker_token);
            lock(&state.in_flight).remove(&worker_key);

            match result {
                Ok(preview) => {
                    let still_latest = lock(&state.latest)
                        .get(&item)
                        .is_some_and(|(newest, _)| *newest == generation);
                    if still_latest {
                        lock(&state.cache).insert(worker_key, preview);
                    } else {
                        // Dropping the preview deletes its temp file.
                        tracing::debug!(item_id = %item, generation, "discarding superseded render");
                    }
                }
                Err(RenderError::Cancelled) => {
                    tracing::debug!(item_id = %item, generation, "render cancelled");
                }
                Err(error) => {
                    tracing::warn!(item_id = %item, %error, "preview render failed");
                }
            }
        });

        Ok(RequestOutcome::Scheduled(RenderJob {
            generation,
            cancel: token,
            handle,
        }))
    }
}
