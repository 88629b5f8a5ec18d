//! Tile cache for decoded tiles.
//!
//! Keeps recently decoded tiles so neighbouring block reads over the same
//! area do not decode the same tiles again.
//!
//! # Cache Key
//!
//! Tiles are cached by a composite key including:
//! - Pyramid level
//! - Tile index within the level grid
//! - Requested channel list
//!
//! # Size-Based Eviction
//!
//! The cache tracks the total size of cached rasters in bytes and evicts
//! least-recently-used entries when the capacity is exceeded.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::raster::Raster;

/// Default cache capacity: 64MB
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 64 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 4_096;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for decoded tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCacheKey {
    /// Pyramid level (0 = highest resolution)
    pub level: usize,

    /// Tile index in row-major order
    pub tile_index: usize,

    /// Channels the tile was decoded for; empty means all
    pub channels: Vec<usize>,
}

impl TileCacheKey {
    pub fn new(level: usize, tile_index: usize, channels: &[usize]) -> Self {
        Self {
            level,
            tile_index,
            channels: channels.to_vec(),
        }
    }
}

// =============================================================================
// Tile Cache
// =============================================================================

/// LRU cache for decoded tiles with size-based capacity.
///
/// Owned by a single scene; reads already require `&mut` access to the
/// scene, so the cache needs no locking.
#[derive(Debug)]
pub struct TileCache {
    cache: LruCache<TileCacheKey, Raster>,

    /// Maximum total size in bytes
    max_size: usize,

    /// Current total size in bytes
    current_size: usize,
}

impl TileCache {
    /// Create a new tile cache with default capacity (64MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Create a new tile cache with the specified capacity in bytes.
    ///
    /// A capacity of zero disables caching.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a new tile cache with specified capacity and maximum entries.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum total size of cached tiles in bytes
    /// * `max_entries` - Maximum number of entries in the cache
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN)),
            max_size,
            current_size: 0,
        }
    }

    /// Get a tile, marking it as recently used.
    pub fn get(&mut self, key: &TileCacheKey) -> Option<&Raster> {
        self.cache.get(key)
    }

    /// Check if a tile is cached without updating LRU order.
    pub fn contains(&self, key: &TileCacheKey) -> bool {
        self.cache.contains(key)
    }

    /// Store a tile.
    ///
    /// Tiles larger than the whole capacity are not stored. Otherwise
    /// least-recently-used entries are evicted until the cache fits.
    pub fn put(&mut self, key: TileCacheKey, tile: Raster) {
        let tile_size = tile.byte_size();
        if tile_size > self.max_size {
            if let Some(old) = self.cache.pop(&key) {
                self.current_size = self.current_size.saturating_sub(old.byte_size());
            }
            return;
        }

        if let Some(old) = self.cache.peek(&key) {
            self.current_size = self.current_size.saturating_sub(old.byte_size());
        }

        // push returns the entry displaced by the entry-count bound, if any
        if let Some((old_key, old)) = self.cache.push(key.clone(), tile) {
            if old_key != key {
                self.current_size = self.current_size.saturating_sub(old.byte_size());
            }
        }
        self.current_size += tile_size;

        while self.current_size > self.max_size {
            match self.cache.pop_lru() {
                Some((_, evicted)) => {
                    self.current_size = self.current_size.saturating_sub(evicted.byte_size());
                }
                None => break,
            }
        }
    }

    /// Remove a tile, returning it if it was cached.
    pub fn remove(&mut self, key: &TileCacheKey) -> Option<Raster> {
        let tile = self.cache.pop(key)?;
        self.current_size = self.current_size.saturating_sub(tile.byte_size());
        Some(tile)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.current_size = 0;
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Current total size of cached tiles in bytes.
    pub fn size(&self) -> usize {
        self.current_size
    }

    /// Maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
