// src/pool.rs

//! Available package pool
//!
//! The pool owns the set of candidate packages for a transaction and hands
//! out numeric [`PackageKey`] handles for them. Each package holds shared
//! references to its Provides set and its file-path Bloom filter; the pool
//! never mutates either.
//!
//! Any mutation drops the capability index. Callers rebuild it with
//! [`Pool::make_index`] before the next round of queries.

use crate::bloom::BloomFilter;
use crate::dependency::DependencySet;
use crate::index::IndexEntry;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Growth increment used by [`Pool::new`]
pub const DEFAULT_DELTA: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(delta) => delta,
    None => unreachable!(),
};

/// Handle of a package slot in a [`Pool`]
///
/// Slots are recycled when a caller re-adds into an existing key, so a
/// stale handle may refer to a different package later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey(usize);

impl PackageKey {
    pub fn from_index(ix: usize) -> Self {
        Self(ix)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A candidate package registered in the pool
#[derive(Debug, Clone)]
pub struct AvailablePackage<K> {
    pub(crate) provides: Arc<DependencySet>,
    pub(crate) files: Arc<BloomFilter>,
    pub(crate) color: u32,
    pub(crate) key: K,
}

impl<K> AvailablePackage<K> {
    /// Provides: capabilities
    pub fn provides(&self) -> &Arc<DependencySet> {
        &self.provides
    }

    /// Bloom filter over installed file paths
    pub fn files(&self) -> &Arc<BloomFilter> {
        &self.files
    }

    /// Transaction color bits
    pub fn color(&self) -> u32 {
        self.color
    }

    /// Caller's associated key, returned by queries
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Set of packages available for installation
#[derive(Debug, Clone)]
pub struct Pool<K> {
    pub(crate) packages: Vec<Option<AvailablePackage<K>>>,
    pub(crate) index: Option<Vec<IndexEntry>>,
    /// Occupied slots in `packages`
    live: usize,
    delta: NonZeroUsize,
    color: u32,
}

impl<K> Pool<K> {
    /// Create an empty pool growing by [`DEFAULT_DELTA`] slots
    pub fn new() -> Self {
        Self::with_delta(DEFAULT_DELTA)
    }

    /// Create an empty pool growing by `delta` slots at a time
    pub fn with_delta(delta: NonZeroUsize) -> Self {
        Self {
            packages: Vec::with_capacity(delta.get()),
            index: None,
            live: 0,
            delta,
            color: 0,
        }
    }

    /// Register a candidate package and return its handle.
    ///
    /// When `existing` names an allocated slot, its occupant is released
    /// and the slot is reused; otherwise a new slot is appended.
    pub fn add(
        &mut self,
        existing: Option<PackageKey>,
        key: K,
        provides: Arc<DependencySet>,
        files: Arc<BloomFilter>,
        color: u32,
    ) -> PackageKey {
        let package = AvailablePackage {
            provides,
            files,
            color,
            key,
        };

        let pkg_key = match existing {
            Some(pkg_key) if pkg_key.index() < self.packages.len() => {
                self.delete(pkg_key);
                self.packages[pkg_key.index()] = Some(package);
                self.live += 1;
                pkg_key
            }
            _ => {
                if self.packages.len() == self.packages.capacity() {
                    self.packages.reserve(self.delta.get());
                }
                self.packages.push(Some(package));
                self.live += 1;
                PackageKey(self.packages.len() - 1)
            }
        };

        debug!(
            "Added package slot {} ({} provides, color {:#x})",
            pkg_key.index(),
            self.packages[pkg_key.index()]
                .as_ref()
                .map_or(0, |p| p.provides.count()),
            color
        );

        self.free_index();
        pkg_key
    }

    /// Release the package in slot `pkg_key`.
    ///
    /// Out-of-range or already empty slots are ignored.
    pub fn delete(&mut self, pkg_key: PackageKey) {
        let Some(slot) = self.packages.get_mut(pkg_key.index()) else {
            return;
        };
        if slot.take().is_some() {
            self.live -= 1;
            debug!("Deleted package slot {}", pkg_key.index());
            self.free_index();
        }
    }

    /// Release every package and the index
    pub fn clear(&mut self) {
        self.packages.clear();
        self.live = 0;
        self.free_index();
    }

    /// Look up a live package
    pub fn get(&self, pkg_key: PackageKey) -> Option<&AvailablePackage<K>> {
        self.packages.get(pkg_key.index()).and_then(Option::as_ref)
    }

    /// Iterate live packages in slot order
    pub fn iter(&self) -> impl Iterator<Item = (PackageKey, &AvailablePackage<K>)> {
        self.packages
            .iter()
            .enumerate()
            .filter_map(|(ix, slot)| slot.as_ref().map(|p| (PackageKey(ix), p)))
    }

    /// Number of live packages
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of allocated slots, live or not
    pub fn slots(&self) -> usize {
        self.packages.len()
    }

    /// Pool-wide transaction color used by uncolored queries
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    /// Growth increment for the package array
    pub fn delta(&self) -> NonZeroUsize {
        self.delta
    }

    pub(crate) fn free_index(&mut self) {
        self.index = None;
    }
}

impl<K> Default for Pool<K> {
    fn default() -> Self {
        Self::new()
    }
}
