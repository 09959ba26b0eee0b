// src/query.rs

//! Dependency satisfaction queries
//!
//! A query first tries the file fast path for absolute-path dependencies:
//! every live package whose file Bloom filter may contain the path is a
//! satisfier, false positives included. When that finds nothing, the
//! capability index is searched for Provides with the same name, and each
//! one is checked against the dependency's version range and color.

use crate::dependency::Dependency;
use crate::pool::{PackageKey, Pool};
use tracing::debug;

/// Packages satisfying one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Satisfiers<K> {
    /// Associated keys of every satisfying package
    pub keys: Vec<K>,
    /// Representative package: the first one matched
    pub matched: Option<PackageKey>,
}

impl<K> Satisfiers<K> {
    fn none() -> Self {
        Self {
            keys: Vec::new(),
            matched: None,
        }
    }

    fn push(&mut self, pkg_key: PackageKey, key: K) {
        if self.matched.is_none() {
            self.matched = Some(pkg_key);
        }
        self.keys.push(key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// First satisfier with its pool handle
    pub fn into_first(self) -> Option<(PackageKey, K)> {
        let matched = self.matched?;
        self.keys.into_iter().next().map(|key| (matched, key))
    }
}

impl<K: Clone> Pool<K> {
    /// Every live package whose file list may contain `dep`'s path.
    ///
    /// Empty unless `dep` names an absolute path.
    pub fn all_file_satisfies_depend(&self, dep: &Dependency) -> Satisfiers<K> {
        let mut found = Satisfiers::none();
        if !dep.is_file() {
            return found;
        }

        for (pkg_key, pkg) in self.iter() {
            if !pkg.files.check(&dep.name) {
                continue;
            }
            debug!("{} (added files) slot {}", dep, pkg_key.index());
            found.push(pkg_key, pkg.key.clone());
        }

        found
    }

    /// Every live package satisfying `dep`.
    ///
    /// A file dependency contained in some package's file list is answered
    /// from the file lists alone. Otherwise Provides with the same name are
    /// checked for range overlap and color compatibility. The query's color
    /// falls back to the pool color when unset; an uncolored Provides
    /// matches any color.
    pub fn all_satisfies_depend(&self, dep: &Dependency) -> Satisfiers<K> {
        if dep.name.is_empty() {
            return Satisfiers::none();
        }

        if dep.is_file() {
            let found = self.all_file_satisfies_depend(dep);
            if !found.is_empty() {
                return found;
            }
        }

        let color = if dep.color != 0 { dep.color } else { self.color() };
        let mut found = Satisfiers::none();

        for entry in self.index_range(&dep.name) {
            let pkg = self.get(entry.owner).unwrap_or_else(|| {
                panic!(
                    "capability index entry '{}' refers to empty slot {}",
                    entry.name,
                    entry.owner.index()
                )
            });

            if color != 0 && entry.color != 0 && color & entry.color == 0 {
                continue;
            }

            let mut cursor = pkg.provides.cursor();
            cursor.set_ix(entry.ordinal);
            let Some((_, provide)) = cursor.next() else {
                panic!(
                    "capability index entry '{}' past end of slot {} provides",
                    entry.name,
                    entry.owner.index()
                );
            };

            if provide.overlaps(dep) {
                debug!("{} (added provide) slot {}", dep, entry.owner.index());
                found.push(entry.owner, pkg.key.clone());
            }
        }

        found
    }

    /// Any one live package satisfying `dep`
    pub fn satisfies_depend(&self, dep: &Dependency) -> Option<(PackageKey, K)> {
        self.all_satisfies_depend(dep).into_first()
    }
}
