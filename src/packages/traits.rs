// src/packages/traits.rs

//! Common interface for install candidates

use crate::dependency::{Dependency, DependencySet, Sense};
use crate::evr::Evr;
use std::sync::Arc;

use super::arch_color;

/// A package under consideration for installation
pub trait CandidatePackage {
    /// Get the package name
    fn name(&self) -> &str;

    /// Get the package epoch:version-release
    fn evr(&self) -> &Evr;

    /// Get the package architecture (e.g., "x86_64", "noarch")
    fn architecture(&self) -> Option<&str>;

    /// Capabilities this package supplies, shared with the pool
    fn provides(&self) -> Arc<DependencySet>;

    /// Capabilities this package needs
    fn requires(&self) -> &[Dependency];

    /// Absolute paths of the files this package installs
    fn files(&self) -> &[String];

    /// Transaction color bits, derived from the architecture by default
    fn color(&self) -> u32 {
        arch_color(self.architecture())
    }

    /// `name-[epoch:]version-release[.arch]`
    fn nevra(&self) -> String {
        match self.architecture() {
            Some(arch) => format!("{}-{}.{}", self.name(), self.evr(), arch),
            None => format!("{}-{}", self.name(), self.evr()),
        }
    }
}

/// Append the implicit `name = evr` provide unless the package already
/// provides its own name.
pub(crate) fn with_self_provide(name: &str, evr: &Evr, mut provides: DependencySet) -> DependencySet {
    if !provides.contains_name(name) {
        provides.push(Dependency::versioned(name, Sense::EQUAL, evr.clone()));
    }
    provides
}
