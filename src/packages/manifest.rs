// src/packages/manifest.rs

//! JSON candidate manifests
//!
//! A manifest describes install candidates without package files:
//!
//! ```json
//! {
//!   "packages": [
//!     {
//!       "name": "tool",
//!       "version": "1.0",
//!       "release": "1",
//!       "arch": "x86_64",
//!       "provides": ["tool-api = 2", {"capability": "libtool.so.1", "color": 2}],
//!       "requires": ["libfoo >= 1.2", "/bin/sh"],
//!       "files": ["/usr/bin/tool"]
//!     }
//!   ]
//! }
//! ```
//!
//! A provide is a dependency string, or an object pairing one with the
//! color bits it is restricted to.

use crate::dependency::{Dependency, DependencySet};
use crate::error::Result;
use crate::evr::Evr;
use crate::packages::traits::{CandidatePackage, with_self_provide};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Top-level manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub packages: Vec<ManifestEntry>,
}

/// One package as written in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub epoch: Option<u32>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    /// Overrides the color derived from `arch`
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub provides: Vec<ManifestProvide>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A provide as written in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestProvide {
    Plain(String),
    Colored { capability: String, color: u32 },
}

impl ManifestProvide {
    fn to_dependency(&self) -> Result<Dependency> {
        match self {
            ManifestProvide::Plain(s) => s.parse(),
            ManifestProvide::Colored { capability, color } => {
                Ok(capability.parse::<Dependency>()?.with_color(*color))
            }
        }
    }
}

impl Manifest {
    /// Read and decode a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading manifest: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Decode a manifest from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Convert every entry into a candidate, validating dependency strings
    pub fn into_packages(self) -> Result<Vec<ManifestPackage>> {
        self.packages
            .into_iter()
            .map(ManifestPackage::try_from)
            .collect()
    }
}

/// A validated manifest entry
#[derive(Debug, Clone)]
pub struct ManifestPackage {
    name: String,
    evr: Evr,
    architecture: Option<String>,
    color: Option<u32>,
    provides: Arc<DependencySet>,
    requires: Vec<Dependency>,
    files: Vec<String>,
}

impl TryFrom<ManifestEntry> for ManifestPackage {
    type Error = crate::error::Error;

    fn try_from(entry: ManifestEntry) -> Result<Self> {
        let evr = Evr::new(entry.epoch, entry.version, entry.release);

        let provides = entry
            .provides
            .iter()
            .map(ManifestProvide::to_dependency)
            .collect::<Result<DependencySet>>()?;
        let provides = with_self_provide(&entry.name, &evr, provides);

        let requires = entry
            .requires
            .iter()
            .map(|s| s.parse::<Dependency>())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: entry.name,
            evr,
            architecture: entry.arch,
            color: entry.color,
            provides: Arc::new(provides),
            requires,
            files: entry.files,
        })
    }
}

impl CandidatePackage for ManifestPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn evr(&self) -> &Evr {
        &self.evr
    }

    fn architecture(&self) -> Option<&str> {
        self.architecture.as_deref()
    }

    fn provides(&self) -> Arc<DependencySet> {
        Arc::clone(&self.provides)
    }

    fn requires(&self) -> &[Dependency] {
        &self.requires
    }

    fn files(&self) -> &[String] {
        &self.files
    }

    fn color(&self) -> u32 {
        self.color
            .unwrap_or_else(|| super::arch_color(self.architecture()))
    }
}
