// src/index.rs

//! Capability index
//!
//! A flattened array of every live package's Provides, sorted by name
//! length first and then by name bytes. Length-first ordering lets most
//! comparisons finish without touching the strings; it is not
//! lexicographic, so lookups must use [`compare_names`] as well.

use crate::dependency::DependencySet;
use crate::pool::{PackageKey, Pool};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// One Provides entry of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Package declaring the capability
    pub owner: PackageKey,
    pub name: Arc<str>,
    pub name_len: usize,
    /// Position of the capability within the owner's Provides set
    pub ordinal: usize,
    /// The capability's own color; 0 matches any query color
    pub color: u32,
}

impl IndexEntry {
    /// Order against a name with a precomputed length
    pub fn cmp_name(&self, name: &str) -> Ordering {
        self.name_len
            .cmp(&name.len())
            .then_with(|| self.name.as_bytes().cmp(name.as_bytes()))
    }
}

/// Index order: shorter names first, equal lengths byte-wise.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Does a capability colored `dscolor` belong to a package colored `tscolor`?
pub fn colors_compatible(tscolor: u32, dscolor: u32) -> bool {
    tscolor == 0 || dscolor == 0 || tscolor & dscolor != 0
}

/// Unsorted staging area for index entries
#[derive(Debug, Default)]
pub struct IndexBuilder {
    entries: Vec<IndexEntry>,
}

impl IndexBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Stage one entry per capability of `provides`.
    ///
    /// Colored capabilities outside the package's color are skipped.
    pub fn add_provides(&mut self, owner: PackageKey, provides: &DependencySet, tscolor: u32) {
        self.entries.reserve(provides.count());

        for (ordinal, dep) in provides.cursor() {
            if !colors_compatible(tscolor, dep.color) {
                continue;
            }

            self.entries.push(IndexEntry {
                owner,
                name: Arc::clone(&dep.name),
                name_len: dep.name.len(),
                ordinal,
                color: dep.color,
            });
        }
    }

    /// Number of staged entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort the staged entries into index order.
    ///
    /// The sort is stable: duplicates keep slot order.
    pub fn finish(mut self) -> Vec<IndexEntry> {
        self.entries
            .sort_by(|a, b| a.name_len.cmp(&b.name_len).then_with(|| a.name.cmp(&b.name)));
        self.entries
    }
}

impl<K> Pool<K> {
    /// Rebuild the capability index from every live package
    pub fn make_index(&mut self) {
        let capacity: usize = self
            .packages
            .iter()
            .flatten()
            .map(|p| p.provides.count())
            .sum();

        let mut builder = IndexBuilder::with_capacity(capacity);
        for (pkg_key, pkg) in self.iter() {
            builder.add_provides(pkg_key, &pkg.provides, pkg.color);
        }

        let entries = builder.finish();
        debug!(
            "Built capability index: {} entries from {} packages",
            entries.len(),
            self.len()
        );
        self.index = Some(entries);
    }

    /// Has the index been built since the last mutation?
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Number of index entries, 0 when stale
    pub fn index_len(&self) -> usize {
        self.index.as_ref().map_or(0, Vec::len)
    }

    /// Current index entries, `None` when stale
    pub fn index(&self) -> Option<&[IndexEntry]> {
        self.index.as_deref()
    }

    /// Entries whose name equals `name`, in index order
    pub(crate) fn index_range(&self, name: &str) -> &[IndexEntry] {
        let Some(index) = self.index.as_deref() else {
            return &[];
        };

        let first = index.partition_point(|e| e.cmp_name(name) == Ordering::Less);
        let len = index[first..]
            .iter()
            .take_while(|e| e.cmp_name(name) == Ordering::Equal)
            .count();
        &index[first..first + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::BloomFilter;
    use crate::dependency::Dependency;

    fn set(deps: &[(&str, u32)]) -> Arc<DependencySet> {
        Arc::new(
            deps.iter()
                .map(|(n, c)| Dependency::new(*n).with_color(*c))
                .collect(),
        )
    }

    fn pool_with(packages: Vec<(Vec<(&str, u32)>, u32)>) -> Pool<usize> {
        let mut pool = Pool::new();
        for (i, (deps, color)) in packages.into_iter().enumerate() {
            pool.add(None, i, set(&deps), Arc::new(BloomFilter::default()), color);
        }
        pool
    }

    #[test]
    fn test_compare_names_length_first() {
        assert_eq!(compare_names("zz", "aaa"), Ordering::Less);
        assert_eq!(compare_names("abc", "abd"), Ordering::Less);
        assert_eq!(compare_names("abc", "abc"), Ordering::Equal);
        assert_eq!(compare_names("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_index_ordering() {
        let mut pool = pool_with(vec![
            (vec![("libzzz", 0), ("a", 0), ("bash", 0)], 0),
            (vec![("python3", 0), ("b", 0), ("awk", 0)], 0),
        ]);
        pool.make_index();

        let index = pool.index().unwrap();
        assert_eq!(index.len(), 6);
        for pair in index.windows(2) {
            assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
        let names: Vec<&str> = index.iter().map(|e| &*e.name).collect();
        assert_eq!(names, vec!["a", "b", "awk", "bash", "libzzz", "python3"]);
    }

    #[test]
    fn test_duplicates_keep_slot_order() {
        let mut pool = pool_with(vec![
            (vec![("dup", 0)], 0),
            (vec![("other", 0)], 0),
            (vec![("dup", 0)], 0),
        ]);
        pool.make_index();

        let owners: Vec<usize> = pool
            .index_range("dup")
            .iter()
            .map(|e| e.owner.index())
            .collect();
        assert_eq!(owners, vec![0, 2]);
        assert!(pool.index_range("missing").is_empty());
    }

    #[test]
    fn test_ordinal_matches_provides_position() {
        let mut pool = pool_with(vec![(vec![("x", 0), ("y", 0), ("z", 0)], 0)]);
        pool.make_index();
        let entry = &pool.index_range("z")[0];
        assert_eq!(entry.ordinal, 2);
    }

    #[test]
    fn test_build_skips_foreign_colors() {
        let mut pool = pool_with(vec![(
            vec![("lib32", 0x1), ("lib64", 0x2), ("any", 0)],
            0x2,
        )]);
        pool.make_index();

        assert_eq!(pool.index_len(), 2);
        assert!(pool.index_range("lib32").is_empty());
        // uncolored capabilities stay uncolored in a colored package
        assert_eq!(pool.index_range("any")[0].color, 0);
        assert_eq!(pool.index_range("lib64")[0].color, 0x2);
    }

    #[test]
    fn test_uncolored_package_keeps_all_provides() {
        let mut pool = pool_with(vec![(vec![("lib32", 0x1), ("lib64", 0x2)], 0)]);
        pool.make_index();
        assert_eq!(pool.index_len(), 2);
    }

    #[test]
    fn test_empty_pool_index() {
        let mut pool: Pool<usize> = Pool::new();
        assert!(!pool.is_indexed());
        pool.make_index();
        assert!(pool.is_indexed());
        assert_eq!(pool.index_len(), 0);
    }

    #[test]
    fn test_mutation_invalidates_index() {
        let mut pool = pool_with(vec![(vec![("a", 0)], 0)]);
        pool.make_index();
        assert!(pool.is_indexed());

        let key = pool.add(None, 9, set(&[("b", 0)]), Arc::new(BloomFilter::default()), 0);
        assert!(!pool.is_indexed());

        pool.make_index();
        pool.delete(key);
        assert!(!pool.is_indexed());
    }

    #[test]
    fn test_builder_sizes_itself() {
        let mut builder = IndexBuilder::default();
        let provides: DependencySet = ["a", "b"].into_iter().map(Dependency::new).collect();
        builder.add_provides(PackageKey::from_index(0), &provides, 0);
        builder.add_provides(PackageKey::from_index(1), &provides, 0);
        assert_eq!(builder.len(), 4);
        assert_eq!(builder.finish().len(), 4);
    }
}
