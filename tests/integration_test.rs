// tests/integration_test.rs

//! Integration tests for rpmal
//!
//! These tests drive the pool, index and query layers through the public
//! API, and load candidates from manifests on disk.

use rpmal::packages::{self, CandidatePackage};
use rpmal::{BloomFilter, Dependency, DependencySet, PackageKey, Pool, Sense};
use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn dep(s: &str) -> Dependency {
    s.parse().unwrap()
}

fn provides(deps: &[&str]) -> Arc<DependencySet> {
    Arc::new(deps.iter().map(|d| dep(d)).collect())
}

fn files(paths: &[&str]) -> Arc<BloomFilter> {
    Arc::new(BloomFilter::from_paths(paths.iter().copied()))
}

fn write_manifest(json: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_versioned_provide_scenario() {
    let mut pool = Pool::new();
    pool.add(None, "foo", provides(&["foo = 1.0-1"]), files(&[]), 0);
    pool.make_index();

    let found = pool.all_satisfies_depend(&dep("foo >= 0.5"));
    assert_eq!(found.keys, vec!["foo"]);
    assert!(pool.all_satisfies_depend(&dep("foo >= 2.0")).is_empty());
}

#[test]
fn test_unversioned_duplicates_scenario() {
    let mut pool = Pool::new();
    pool.add(None, "first", provides(&["bar"]), files(&[]), 0);
    pool.add(None, "second", provides(&["bar"]), files(&[]), 0);
    pool.make_index();

    let mut keys = pool.all_satisfies_depend(&dep("bar")).keys;
    keys.sort();
    assert_eq!(keys, vec!["first", "second"]);
}

#[test]
fn test_duplicate_rewind_with_many_providers() {
    // enough neighbours that a binary search lands mid-run
    let mut pool = Pool::new();
    let mut expected = Vec::new();
    for i in 0..64 {
        let name = if i % 3 == 0 { "cap" } else { "pad" };
        let filler = format!("filler{}", i);
        pool.add(None, i, provides(&[name, filler.as_str()]), files(&[]), 0);
        if name == "cap" {
            expected.push(i);
        }
    }
    pool.make_index();

    assert_eq!(pool.all_satisfies_depend(&dep("cap")).keys, expected);
}

#[test]
fn test_file_dependency_scenario() {
    let mut pool = Pool::new();
    pool.add(None, "a", provides(&["a"]), files(&["/usr/bin/tool"]), 0);
    pool.add(None, "b", provides(&["b"]), files(&["/usr/share/b/data"]), 0);
    pool.make_index();

    let found = pool.all_satisfies_depend(&dep("/usr/bin/tool"));
    assert!(found.keys.contains(&"a"));
    assert!(!found.keys.contains(&"b"));
    assert_eq!(found.matched, Some(PackageKey::from_index(0)));
}

#[test]
fn test_color_scenario() {
    let mut pool = Pool::new();
    let set: DependencySet = std::iter::once(dep("libfoo.so.1").with_color(0x2)).collect();
    pool.add(None, "lib.x86_64", Arc::new(set), files(&[]), 0x2);
    pool.make_index();

    let query = dep("libfoo.so.1").with_color(0x1);
    assert!(pool.all_satisfies_depend(&query).is_empty());
}

#[test]
fn test_uncolored_provide_ignores_package_color() {
    let mut pool = Pool::new();
    pool.add(None, "pkg", provides(&["data"]), files(&[]), 0x2);
    pool.make_index();

    let query = Dependency::new("data").with_color(0x1);
    assert_eq!(pool.all_satisfies_depend(&query).keys, vec!["pkg"]);
}

#[test]
fn test_double_delete_scenario() {
    let mut pool = Pool::new();
    let key = pool.add(None, (), provides(&["x"]), files(&[]), 0);
    pool.delete(key);
    pool.delete(key);
    pool.make_index();
    assert!(pool.all_satisfies_depend(&dep("x")).is_empty());
}

#[test]
fn test_no_false_negatives_on_exact_match() {
    let mut pool = Pool::with_delta(NonZeroUsize::new(2).unwrap());
    let cases = [
        ("p0", "foo = 1.0", "foo = 1.0"),
        ("p1", "foo = 2:0.1", "foo >= 1:9"),
        ("p2", "foo = 3.0-4", "foo > 3.0-3"),
        ("p3", "foo", "foo < 0.0.1"),
    ];
    for (key, provide, _) in cases {
        pool.add(None, key, provides(&[provide]), files(&[]), 0);
    }
    pool.make_index();

    for (key, _, query) in cases {
        assert!(
            pool.all_satisfies_depend(&dep(query)).keys.contains(&key),
            "{} should satisfy {}",
            key,
            query
        );
    }
}

#[test]
fn test_explicit_color_on_provide() {
    let mut pool = Pool::new();
    let set: DependencySet = [
        Dependency::new("libc.so.6").with_color(0x1),
        Dependency::new("libc.so.6()(64bit)").with_color(0x2),
    ]
    .into_iter()
    .collect();
    pool.add(None, "glibc", Arc::new(set), files(&[]), 0);
    pool.make_index();

    assert!(pool
        .all_satisfies_depend(&Dependency::new("libc.so.6").with_color(0x2))
        .is_empty());
    assert_eq!(
        pool.all_satisfies_depend(&Dependency::new("libc.so.6").with_color(0x3))
            .len(),
        1
    );
}

#[test]
fn test_manifest_candidates_on_disk() {
    let manifest = write_manifest(
        r#"{"packages": [
            {"name": "editor", "version": "9.1", "release": "2", "arch": "x86_64",
             "requires": ["libterm.so.6", "/usr/bin/sh", "editor-data = 9.1-2"],
             "files": ["/usr/bin/editor"]},
            {"name": "editor-data", "version": "9.1", "release": "2", "arch": "noarch",
             "files": ["/usr/share/editor/syntax.vim"]},
            {"name": "libterm", "version": "6.4", "arch": "x86_64",
             "provides": ["libterm.so.6"]},
            {"name": "sh", "version": "5.2", "arch": "x86_64", "files": ["/usr/bin/sh"]}
        ]}"#,
    );

    let candidates = packages::load_candidates(manifest.path().to_str().unwrap()).unwrap();
    assert_eq!(candidates.len(), 4);

    let pool = packages::load_pool(&candidates, NonZeroUsize::new(5).unwrap());
    let report = rpmal::check::check(&candidates, &pool);
    assert!(report.is_satisfied(), "unexpected: {:?}", report);

    let editor = &report.packages[0];
    assert_eq!(editor.package, "editor-9.1-2.x86_64");
    assert_eq!(editor.resolved.len(), 3);
    assert_eq!(editor.resolved[1].providers, vec!["sh-5.2.x86_64"]);
}

#[test]
fn test_manifest_missing_requirement() {
    let manifest = write_manifest(
        r#"{"packages": [
            {"name": "app", "version": "1", "requires": ["runtime >= 2"]},
            {"name": "runtime", "version": "1.9"}
        ]}"#,
    );

    let candidates = packages::load_candidates(manifest.path().to_str().unwrap()).unwrap();
    let pool = packages::load_pool(&candidates, NonZeroUsize::new(1).unwrap());
    let report = rpmal::check::check(&candidates, &pool);

    assert_eq!(report.unresolved_count(), 1);
    assert_eq!(report.packages[0].unresolved, vec!["runtime >= 2"]);
    assert_eq!(candidates[1].provides().get(0).unwrap().sense, Sense::EQUAL);
}

#[test]
fn test_manifest_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let result = packages::load_candidates(path.to_str().unwrap());
    assert!(matches!(result, Err(rpmal::Error::Io(_))));
}
