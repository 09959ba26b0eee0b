// src/check.rs

//! Transaction dependency check
//!
//! Walks every candidate's Requires and asks the pool which candidates
//! satisfy them, the way an installer validates a set of added packages
//! before ordering them.

use crate::packages::CandidatePackage;
use crate::pool::Pool;
use serde::Serialize;
use tracing::debug;

/// A requirement and the candidates satisfying it
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub requirement: String,
    pub providers: Vec<String>,
}

/// Check results for one candidate
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub package: String,
    pub resolved: Vec<Resolution>,
    pub unresolved: Vec<String>,
}

/// Check results for a whole candidate set
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub packages: Vec<PackageReport>,
}

impl CheckReport {
    /// Total unresolved requirements
    pub fn unresolved_count(&self) -> usize {
        self.packages.iter().map(|p| p.unresolved.len()).sum()
    }

    /// Are all requirements satisfied?
    pub fn is_satisfied(&self) -> bool {
        self.unresolved_count() == 0
    }
}

/// Is this an rpmlib() feature dependency, satisfied by rpm itself?
fn is_rpmlib(name: &str) -> bool {
    name.starts_with("rpmlib(")
}

/// Resolve every Requires of every candidate against `pool`.
///
/// `pool` must be indexed, with associated keys being positions in
/// `candidates` (see [`crate::packages::load_pool`]). Uncolored
/// requirements take the requiring package's color, so they only exclude
/// Provides restricted to a different color.
pub fn check(candidates: &[Box<dyn CandidatePackage>], pool: &Pool<usize>) -> CheckReport {
    let mut report = CheckReport::default();

    for candidate in candidates {
        let mut package = PackageReport {
            package: candidate.nevra(),
            resolved: Vec::new(),
            unresolved: Vec::new(),
        };

        for require in candidate.requires() {
            if is_rpmlib(&require.name) {
                continue;
            }

            let query = if require.color == 0 {
                require.clone().with_color(candidate.color())
            } else {
                require.clone()
            };

            let found = pool.all_satisfies_depend(&query);
            if found.is_empty() {
                debug!("{} requires {}: unresolved", package.package, require);
                package.unresolved.push(require.to_string());
                continue;
            }

            package.resolved.push(Resolution {
                requirement: require.to_string(),
                providers: found
                    .keys
                    .iter()
                    .filter_map(|&ix| candidates.get(ix))
                    .map(|c| c.nevra())
                    .collect(),
            });
        }

        report.packages.push(package);
    }

    report
}
