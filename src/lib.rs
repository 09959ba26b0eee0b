// src/lib.rs

//! Available package index for dependency resolution
//!
//! Given a growing set of install candidates, answers "which candidates
//! satisfy dependency D?" with RPM range and multilib color semantics.
//!
//! # Architecture
//!
//! - Pool: candidate packages with shared Provides sets and file Bloom filters
//! - Index: every Provides flattened and sorted by name length, then bytes
//! - Query: file-path fast path through Bloom filters, then index search
//!   with range and color filtering
//!
//! ```
//! use std::sync::Arc;
//! use rpmal::{BloomFilter, Dependency, DependencySet, Pool};
//!
//! let provides: DependencySet = ["foo = 1.0-1".parse::<Dependency>().unwrap()]
//!     .into_iter()
//!     .collect();
//! let mut pool = Pool::new();
//! pool.add(None, "foo.rpm", Arc::new(provides), Arc::new(BloomFilter::default()), 0);
//! pool.make_index();
//!
//! let found = pool.all_satisfies_depend(&"foo >= 0.5".parse().unwrap());
//! assert_eq!(found.keys, vec!["foo.rpm"]);
//! ```

pub mod bloom;
pub mod check;
pub mod dependency;
mod error;
pub mod evr;
pub mod index;
pub mod packages;
pub mod pool;
pub mod query;

pub use bloom::BloomFilter;
pub use dependency::{Dependency, DependencySet, Sense};
pub use error::{Error, Result};
pub use evr::{Evr, rpmvercmp};
pub use index::{IndexBuilder, IndexEntry};
pub use pool::{AvailablePackage, PackageKey, Pool};
pub use query::Satisfiers;
