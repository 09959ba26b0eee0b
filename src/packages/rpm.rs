// src/packages/rpm.rs

//! RPM package format parser

use crate::dependency::{Dependency, DependencySet, Sense};
use crate::error::{Error, Result};
use crate::evr::Evr;
use crate::packages::traits::{CandidatePackage, with_self_provide};
use rpm::Package;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tracing::debug;

/// RPM package representation
pub struct RpmPackage {
    name: String,
    evr: Evr,
    architecture: Option<String>,
    provides: Arc<DependencySet>,
    requires: Vec<Dependency>,
    files: Vec<String>,
}

impl RpmPackage {
    /// Parse an RPM package file
    pub fn parse(path: &str) -> Result<Self> {
        debug!("Parsing RPM package: {}", path);

        let file = File::open(path)
            .map_err(|e| Error::PackageParse(format!("Failed to open RPM file: {}", e)))?;

        let mut buf_reader = BufReader::new(file);

        let pkg = Package::parse(&mut buf_reader)
            .map_err(|e| Error::PackageParse(format!("Failed to parse RPM: {}", e)))?;

        let name = pkg
            .metadata
            .get_name()
            .map_err(|e| Error::PackageParse(format!("Failed to get package name: {}", e)))?
            .to_string();

        let version = pkg
            .metadata
            .get_version()
            .map_err(|e| Error::PackageParse(format!("Failed to get package version: {}", e)))?
            .to_string();

        let epoch = pkg.metadata.get_epoch().ok();
        let release = pkg.metadata.get_release().ok().map(|s| s.to_string());
        let evr = Evr::new(epoch, version, release);

        let architecture = pkg.metadata.get_arch().ok().map(|s| s.to_string());

        let provides = with_self_provide(&name, &evr, Self::extract_provides(&pkg));
        let requires = Self::extract_requires(&pkg);
        let files = Self::extract_files(&pkg);

        debug!(
            "Parsed RPM: {}-{} ({} provides, {} requires, {} files)",
            name,
            evr,
            provides.count(),
            requires.len(),
            files.len()
        );

        Ok(Self {
            name,
            evr,
            architecture,
            provides: Arc::new(provides),
            requires,
            files,
        })
    }

    /// Extract installed file paths
    fn extract_files(pkg: &Package) -> Vec<String> {
        match pkg.metadata.get_file_entries() {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| entry.path.to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Extract Provides
    fn extract_provides(pkg: &Package) -> DependencySet {
        match pkg.metadata.get_provides() {
            Ok(provides) => provides.iter().map(Self::convert_dependency).collect(),
            Err(_) => DependencySet::new(),
        }
    }

    /// Extract Requires, keeping file paths and rpmlib() features
    fn extract_requires(pkg: &Package) -> Vec<Dependency> {
        match pkg.metadata.get_requires() {
            Ok(requires) => requires.iter().map(Self::convert_dependency).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn convert_dependency(dep: &rpm::Dependency) -> Dependency {
        let sense = Sense::from_bits_truncate(dep.flags.bits());

        if dep.version.is_empty() || sense.is_empty() {
            Dependency::new(dep.name.as_str())
        } else {
            Dependency::versioned(dep.name.as_str(), sense, Evr::parse(&dep.version))
        }
    }
}

impl CandidatePackage for RpmPackage {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RpmPackage {
        let evr = Evr::parse("1:2.4-3.fc40");
        let provides = with_self_provide(
            "test-package",
            &evr,
            ["libtest.so.1()(64bit)"].into_iter().map(Dependency::new).collect(),
        );
        RpmPackage {
            name: "test-package".to_string(),
            evr,
            architecture: Some("x86_64".to_string()),
            provides: Arc::new(provides),
            requires: vec![Dependency::new("/bin/sh")],
            files: vec!["/usr/lib64/libtest.so.1".to_string()],
        }
    }

    #[test]
    fn test_candidate_trait_implemented() {
        fn assert_implements_candidate<T: CandidatePackage>() {}
        assert_implements_candidate::<RpmPackage>();
    }

    #[test]
    fn test_self_provide_added() {
        let rpm = sample();
        let provides = rpm.provides();
        assert_eq!(provides.count(), 2);

        let own = provides.get(1).unwrap();
        assert_eq!(&*own.name, "test-package");
        assert_eq!(own.sense, Sense::EQUAL);
        assert_eq!(own.to_string(), "test-package = 1:2.4-3.fc40");
    }

    #[test]
    fn test_accessors() {
        let rpm = sample();
        assert_eq!(rpm.name(), "test-package");
        assert_eq!(rpm.nevra(), "test-package-1:2.4-3.fc40.x86_64");
        assert_eq!(rpm.color(), 0x2);
        assert_eq!(rpm.files().len(), 1);
        assert_eq!(rpm.requires().len(), 1);
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = RpmPackage::parse("/nonexistent/file.rpm");
        assert!(matches!(result, Err(Error::PackageParse(_))));
    }
}
