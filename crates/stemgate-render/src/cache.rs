//! Keyed cache of completed preview renders.
//!
//! A cache entry owns its rendered temp file: dropping the last reference
//! (via [`PreviewCache::evict`], [`PreviewCache::clear`], or replacing an
//! entry) deletes the file from disk exactly once. Lookups verify the file
//! still exists; an entry whose file vanished behind the cache's back is
//! treated as a miss, not an error.

use crate::preview::GatePreview;
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use stemgate_core::{DrumClass, GateSettings};

/// Identity of a source file: canonical path plus size and mtime.
///
/// A rewritten or touched source is a different identity, which forces a
/// re-render rather than risking a stale overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceId {
    /// Capture the identity of `path` as it exists right now.
    pub fn of(path: &Path) -> Result<Self> {
        let canonical = path.canonicalize()?;
        let metadata = std::fs::metadata(&canonical)?;
        Ok(Self {
            path: canonical,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    /// The canonical source path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Bit-exact image of [`GateSettings`] usable as a hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SettingsKey {
    active: bool,
    threshold_bits: u32,
    attack_bits: u32,
    release_bits: u32,
    floor_bits: Option<u32>,
    auto_applied: bool,
}

impl From<&GateSettings> for SettingsKey {
    fn from(settings: &GateSettings) -> Self {
        Self {
            active: settings.active,
            threshold_bits: settings.threshold_db.to_bits(),
            attack_bits: settings.attack_s.to_bits(),
            release_bits: settings.release_s.to_bits(),
            floor_bits: settings.floor_db.map(f32::to_bits),
            auto_applied: settings.auto_applied,
        }
    }
}

/// Cache key: source identity + settings + classification. Any field change
/// is a different key and forces a fresh render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    source: SourceId,
    settings: SettingsKey,
    class: DrumClass,
}

impl PreviewKey {
    /// Build a key for the file as it exists on disk right now.
    pub fn new(source: &Path, settings: &GateSettings, class: DrumClass) -> Result<Self> {
        Ok(Self {
            source: SourceId::of(source)?,
            settings: SettingsKey::from(settings),
            class,
        })
    }

    /// The source identity this key was built from.
    pub fn source(&self) -> &SourceId {
        &self.source
    }
}

/// Cache of completed renders, keyed by [`PreviewKey`].
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<PreviewKey, Arc<GatePreview>>,
}

impl PreviewCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a render. Entries whose rendered file no longer exists are
    /// dropped and reported as a miss.
    pub fn get(&mut self, key: &PreviewKey) -> Option<Arc<GatePreview>> {
        match self.entries.get(key) {
            Some(preview) if preview.rendered_path().exists() => {
                tracing::debug!(source = %key.source.path.display(), "preview cache hit");
                Some(Arc::clone(preview))
            }
            Some(_) => {
                tracing::debug!(
                    source = %key.source.path.display(),
                    "preview cache entry lost its rendered file, treating as miss"
                );
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a completed render, returning a shared handle to it. Replacing
    /// an existing entry releases (and thus deletes) the old render.
    pub fn insert(&mut self, key: PreviewKey, preview: GatePreview) -> Arc<GatePreview> {
        let preview = Arc::new(preview);
        self.entries.insert(key, Arc::clone(&preview));
        preview
    }

    /// Remove one entry, deleting its rendered file once the last handle
    /// drops. Returns true if the entry existed.
    pub fn evict(&mut self, key: &PreviewKey) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            tracing::debug!(source = %key.source.path.display(), "preview cache evict");
        }
        existed
    }

    /// Drop every entry; used at editor-session teardown.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "preview cache clear");
        self.entries.clear();
    }

    /// Number of cached renders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
