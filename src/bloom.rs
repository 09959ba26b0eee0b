// src/bloom.rs

//! Bloom filter over strings
//!
//! Used to approximate the set of file paths a package installs. Lookups
//! may report false positives but never false negatives.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// Default population estimate when no bit count is given
const DEFAULT_ESTIMATE: usize = 1024;

/// Default number of probes per item
const DEFAULT_PROBES: usize = 16;

/// False-positive rate used when sizing a filter for a file list
pub const FILE_LIST_ERROR_RATE: f64 = 1.0e-4;

/// A fixed-size Bloom filter using double hashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Number of bits
    m: usize,
    /// Number of probes per item
    k: usize,
    /// Population estimate
    n: usize,
    bits: Vec<u64>,
}

impl BloomFilter {
    /// Create a filter with `m` bits and `k` probes.
    ///
    /// `k == 0` selects 16 probes and `m == 0` sizes the filter for about
    /// 1024 items.
    pub fn new(m: usize, k: usize) -> Self {
        let k = if k == 0 { DEFAULT_PROBES } else { k };
        let m = if m == 0 { (3 * DEFAULT_ESTIMATE * k) / 2 } else { m };

        Self {
            m,
            k,
            n: 0,
            bits: vec![0; m.div_ceil(64)],
        }
    }

    /// Size a filter for `n` items at false-positive rate `e`
    pub fn with_estimate(n: usize, e: f64) -> Self {
        let (m, k) = Self::params(n, e);
        Self::new(m, k)
    }

    /// Optimal `(m, k)` for `n` items at false-positive rate `e`
    pub fn params(n: usize, e: f64) -> (usize, usize) {
        let n = n.max(1) as f64;
        let e = if e > 0.0 && e < 1.0 { e } else { FILE_LIST_ERROR_RATE };
        let ln2 = std::f64::consts::LN_2;

        let m = (-n * e.ln() / (ln2 * ln2)).ceil().max(1.0);
        let k = ((m / n) * ln2).round().max(1.0);

        (m as usize, k as usize)
    }

    /// Build a filter containing every path in `paths`
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths: Vec<S> = paths.into_iter().collect();
        let mut bf = Self::with_estimate(paths.len(), FILE_LIST_ERROR_RATE);
        for path in &paths {
            bf.add(path.as_ref());
        }
        bf
    }

    /// Number of bits
    pub fn bit_count(&self) -> usize {
        self.m
    }

    /// Number of probes per item
    pub fn probe_count(&self) -> usize {
        self.k
    }

    /// Population estimate
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn add(&mut self, s: &str) {
        for ix in self.probes(s) {
            self.bits[ix / 64] |= 1u64 << (ix % 64);
        }
        self.n += 1;
    }

    /// Might `s` be a member?
    pub fn check(&self, s: &str) -> bool {
        self.probes(s)
            .all(|ix| self.bits[ix / 64] & (1u64 << (ix % 64)) != 0)
    }

    /// Clear the bits for `s`.
    ///
    /// Other members sharing those bits stop matching as well.
    pub fn remove(&mut self, s: &str) {
        for ix in self.probes(s) {
            self.bits[ix / 64] &= !(1u64 << (ix % 64));
        }
        self.n = self.n.saturating_sub(1);
    }

    /// Discard all memberships
    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = 0);
        self.n = 0;
    }

    /// Add every member of `other` to this filter
    pub fn union(&mut self, other: &BloomFilter) -> Result<()> {
        self.same_geometry(other)?;
        for (a, b) in self.bits.iter_mut().zip(&other.bits) {
            *a |= *b;
        }
        self.n += other.n;
        Ok(())
    }

    /// Keep only members common to both filters
    pub fn intersect(&mut self, other: &BloomFilter) -> Result<()> {
        self.same_geometry(other)?;
        for (a, b) in self.bits.iter_mut().zip(&other.bits) {
            *a &= *b;
        }
        // population of an intersection can't be recovered from the bits
        self.n = self.n.min(other.n);
        Ok(())
    }

    fn same_geometry(&self, other: &BloomFilter) -> Result<()> {
        if self.m == other.m && self.k == other.k {
            Ok(())
        } else {
            Err(Error::BloomMismatch {
                left_m: self.m,
                left_k: self.k,
                right_m: other.m,
                right_k: other.k,
            })
        }
    }

    fn probes(&self, s: &str) -> impl Iterator<Item = usize> + use<> {
        let digest = Sha256::digest(s.as_bytes());
        let h0 = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
        let h1 = u32::from_le_bytes([digest[4], digest[5], digest[6], digest[7]]);
        let m = self.m as u64;

        (0..self.k as u32).map(move |i| {
            let h = h0.wrapping_add(i.wrapping_mul(h1));
            (u64::from(h) % m) as usize
        })
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
