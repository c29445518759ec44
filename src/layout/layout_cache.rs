use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;
use crate::layout::JustifiedLayout;
use crate::models::{GalleryImage, GalleryLayout};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache.
///
/// Justification is exact to the pixel, so the container width is used as-is
/// rather than bucketed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    container_width: u32,
    row_height_bits: u64,
    margin: u32,
    list_hash: u64,
}

/// Memo of recently computed layouts.
///
/// Layout computation is deterministic, so a hit returns exactly what a
/// fresh computation would. Entries are evicted least-recently-used first.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, GalleryLayout>>,
}

impl LayoutCache {
    /// Creates a new empty layout cache.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the image list.
    /// Covers geometry and pass-through metadata in order, so any change to
    /// the list or its order invalidates the entry.
    pub fn compute_list_hash(images: &[GalleryImage]) -> u64 {
        let mut hasher_input = Vec::with_capacity(images.len() * 64);

        for image in images {
            hasher_input.extend_from_slice(&image.width.to_le_bytes());
            hasher_input.extend_from_slice(&image.height.to_le_bytes());
            push_str(&mut hasher_input, &image.src);
            push_str(&mut hasher_input, &image.thumbnail);
            match &image.caption {
                Some(caption) => {
                    hasher_input.push(1);
                    push_str(&mut hasher_input, caption);
                }
                None => hasher_input.push(0),
            }
            hasher_input.extend_from_slice(&(image.srcset.len() as u64).to_le_bytes());
            for entry in &image.srcset {
                push_str(&mut hasher_input, entry);
            }
        }

        xxh3_64(&hasher_input)
    }

    /// Attempts to retrieve a cached layout. Returns None on cache miss.
    pub fn get(
        &self,
        layout: &JustifiedLayout,
        container_width: u32,
        list_hash: u64,
    ) -> Option<GalleryLayout> {
        let key = Self::key(layout, container_width, list_hash);
        self.cache.lock().get(&key).cloned()
    }

    /// Stores a computed layout.
    pub fn set(&self, layout: &JustifiedLayout, list_hash: u64, result: GalleryLayout) {
        let key = Self::key(layout, result.container_width, list_hash);
        self.cache.lock().put(key, result);
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    fn key(layout: &JustifiedLayout, container_width: u32, list_hash: u64) -> CacheKey {
        CacheKey {
            container_width,
            row_height_bits: layout.row_height.to_bits(),
            margin: layout.margin,
            list_hash,
        }
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

fn push_str(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u64).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}

/// A convenience struct that combines layout computation with caching.
pub struct CachedLayoutComputer {
    pub layout: JustifiedLayout,
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    /// Creates a new cached layout computer with default settings.
    pub fn new() -> Self {
        Self::with_layout(JustifiedLayout::default())
    }

    /// Creates a new cached layout computer with custom layout settings.
    pub fn with_layout(layout: JustifiedLayout) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(),
        }
    }

    /// Computes the layout, using a cached result if available.
    ///
    /// Errors are returned as-is and never cached.
    pub fn compute(&self, images: &[GalleryImage], container_width: u32) -> Result<GalleryLayout> {
        if images.is_empty() || container_width == 0 {
            return Ok(GalleryLayout::new(container_width, Vec::new()));
        }

        let list_hash = LayoutCache::compute_list_hash(images);
        if let Some(hit) = self.cache.get(&self.layout, container_width, list_hash) {
            trace!(container_width, list_hash, "Layout cache hit");
            return Ok(hit);
        }

        let result = self.layout.compute(images, container_width)?;
        self.cache.set(&self.layout, list_hash, result.clone());
        Ok(result)
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedLayoutComputer {
    fn default() -> Self {
        Self::new()
    }
}
