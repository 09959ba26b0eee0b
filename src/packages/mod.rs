// src/packages/mod.rs

//! Install candidate sources
//!
//! Candidates come from RPM package files or JSON manifests. Each source
//! implements the `CandidatePackage` trait, and [`load_pool`] registers a
//! batch of candidates in an available-package [`Pool`].

pub mod manifest;
pub mod rpm;
pub mod traits;

pub use manifest::{Manifest, ManifestPackage, ManifestProvide};
pub use self::rpm::RpmPackage;
pub use traits::CandidatePackage;

use crate::bloom::BloomFilter;
use crate::error::{Error, Result};
use crate::pool::Pool;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Color bit for 32-bit ELF payloads
pub const COLOR_ELF32: u32 = 0x1;

/// Color bit for 64-bit ELF payloads
pub const COLOR_ELF64: u32 = 0x2;

/// Multilib color of an architecture; 0 for noarch and unknown arches
pub fn arch_color(arch: Option<&str>) -> u32 {
    match arch {
        Some("i386" | "i486" | "i586" | "i686" | "athlon" | "armv7hl" | "armv7l" | "ppc"
        | "s390") => COLOR_ELF32,
        Some("x86_64" | "amd64" | "aarch64" | "ppc64" | "ppc64le" | "s390x" | "riscv64") => {
            COLOR_ELF64
        }
        _ => 0,
    }
}

/// Load candidates from `.rpm` files and `.json` manifests
pub fn load_candidates(path: &str) -> Result<Vec<Box<dyn CandidatePackage>>> {
    if path.ends_with(".json") {
        let packages = Manifest::load(path)?.into_packages()?;
        debug!("Loaded {} candidates from {}", packages.len(), path);
        return Ok(packages
            .into_iter()
            .map(|p| Box::new(p) as Box<dyn CandidatePackage>)
            .collect());
    }

    if path.ends_with(".rpm") {
        return Ok(vec![Box::new(RpmPackage::parse(path)?)]);
    }

    Err(Error::PackageParse(format!(
        "Unable to detect candidate format for: {}",
        path
    )))
}

/// Register every candidate in a new pool and build its index.
///
/// The associated key of each package is its position in `candidates`.
pub fn load_pool(candidates: &[Box<dyn CandidatePackage>], delta: NonZeroUsize) -> Pool<usize> {
    let mut pool = Pool::with_delta(delta);

    for (i, candidate) in candidates.iter().enumerate() {
        let files = BloomFilter::from_paths(candidate.files());
        pool.add(
            None,
            i,
            candidate.provides(),
            Arc::new(files),
            candidate.color(),
        );
    }

    pool.make_index();
    pool
}
