//! End-to-end tests for rewriting a manifest on disk against a fake
//! site-packages directory.

use std::path::Path;

use semsearch_pin::{update_requirements_file, PinError, SitePackages};
use tempfile::TempDir;

fn install(site: &Path, name: &str, version: &str) {
    let dist = site.join(format!("{}-{}.dist-info", name.replace('-', "_"), version));
    std::fs::create_dir_all(&dist).unwrap();
    std::fs::write(
        dist.join("METADATA"),
        format!("Metadata-Version: 2.1\nName: {}\nVersion: {}\n", name, version),
    )
    .unwrap();
}

#[test]
fn test_manifest_rewritten_in_place() {
    let workdir = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();
    install(site.path(), "requests", "2.31.0");

    let manifest = workdir.path().join("requirements.txt");
    std::fs::write(&manifest, "-e .\n\nrequests>=2.0\nnonexistentpkg==1.0\n").unwrap();

    let packages = SitePackages::scan(&[site.path()]);
    let report = update_requirements_file(&manifest, &packages).unwrap();

    let rewritten = std::fs::read_to_string(&manifest).unwrap();
    assert_eq!(rewritten, "-e .\n\nrequests==2.31.0\nnonexistentpkg==1.0\n");
    assert_eq!(report.unresolved(), vec!["nonexistentpkg"]);
}

#[test]
fn test_rewrite_is_idempotent() {
    let workdir = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();
    install(site.path(), "numpy", "1.26.4");
    install(site.path(), "qdrant-client", "1.9.0");

    let manifest = workdir.path().join("requirements.txt");
    std::fs::write(
        &manifest,
        "--extra-index-url https://example.com/simple\nnumpy<2\nqdrant_client>=1.7\nunknown\n",
    )
    .unwrap();

    let packages = SitePackages::scan(&[site.path()]);
    update_requirements_file(&manifest, &packages).unwrap();
    let first = std::fs::read(&manifest).unwrap();
    update_requirements_file(&manifest, &packages).unwrap();
    let second = std::fs::read(&manifest).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(second).unwrap(),
        "--extra-index-url https://example.com/simple\nnumpy==1.26.4\nqdrant_client==1.9.0\nunknown\n"
    );
}

#[test]
fn test_missing_manifest_is_a_read_error() {
    let workdir = TempDir::new().unwrap();
    let manifest = workdir.path().join("requirements.txt");

    let result = update_requirements_file(&manifest, &SitePackages::default());

    match result {
        Err(PinError::Read { path, .. }) => assert_eq!(path, manifest),
        other => panic!("expected read error, got {:?}", other),
    }
}
