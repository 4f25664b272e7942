//! End-to-end tests of the mesh-tool subprocess boundary using stub
//! executables, covering the distinct failure modes: success, non-zero
//! exit, zero batches and timeout.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use solid_builder::{assemble, make_solid_file, AsciiRasterGeometry, MeshTool};
use subset_common::{Grid3, SubsetError};
use tempfile::TempDir;

fn stub_tool(dir: &TempDir, script_body: &str) -> MeshTool {
    let path = dir.path().join("mask-to-solid");
    fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    MeshTool::new(path)
}

fn domain_mask() -> Grid3 {
    let mut mask = Grid3::new_filled(1, 4, 4, 0.0);
    for y in 1..=2 {
        for x in 1..=2 {
            mask.set(0, y, x, 1.0);
        }
    }
    mask
}

#[test]
fn test_successful_conversion_parses_batches() {
    let dir = TempDir::new().unwrap();
    let tool = stub_tool(
        &dir,
        "echo 'Number of triangles in patch 1 = 16'\n\
         echo 'Number of triangles in patch 2 = 8'",
    );
    let finalized = make_solid_file(
        &domain_mask(),
        &tool,
        dir.path(),
        "region",
        &AsciiRasterGeometry::default(),
        100.0,
        0.0,
    )
    .unwrap();
    assert_eq!(finalized.batch_counts, vec![16, 8]);
    assert_eq!(finalized.batch_string(), "16 8");
    assert!(finalized.solid_path.ends_with("region.sol"));
    assert!(finalized.vtk_path.ends_with("region.vtk"));
}

#[test]
fn test_zero_batches_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tool = stub_tool(&dir, "echo 'no patches today'");
    let err = make_solid_file(
        &domain_mask(),
        &tool,
        dir.path(),
        "region",
        &AsciiRasterGeometry::default(),
        100.0,
        0.0,
    );
    assert!(matches!(err, Err(SubsetError::EmptyBatches)));
}

#[test]
fn test_non_zero_exit_is_distinct() {
    let dir = TempDir::new().unwrap();
    let tool = stub_tool(&dir, "echo 'broken input' >&2\nexit 3");
    let assembled = assemble(&domain_mask()).unwrap();
    let files = assembled
        .write_patches(dir.path(), "region", &AsciiRasterGeometry::default())
        .unwrap();
    let err = assembled.finalize(&tool, &files, dir.path(), "region", 100.0, 0.0);
    match err {
        Err(SubsetError::MeshToolFailed { status, stderr }) => {
            assert_eq!(status, 3);
            assert!(stderr.contains("broken input"));
        }
        other => panic!("expected MeshToolFailed, got {other:?}"),
    }
}

#[test]
fn test_timeout_kills_the_tool() {
    let dir = TempDir::new().unwrap();
    let tool = stub_tool(&dir, "sleep 30").with_timeout(Duration::from_millis(200));
    let assembled = assemble(&domain_mask()).unwrap();
    let files = assembled
        .write_patches(dir.path(), "region", &AsciiRasterGeometry::default())
        .unwrap();
    let err = assembled.finalize(&tool, &files, dir.path(), "region", 100.0, 0.0);
    assert!(matches!(err, Err(SubsetError::MeshToolTimeout { .. })));
}

#[test]
fn test_missing_executable_is_distinct() {
    let tool = MeshTool::new(PathBuf::from("/does/not/exist/mask-to-solid"));
    let dir = TempDir::new().unwrap();
    let err = make_solid_file(
        &domain_mask(),
        &tool,
        dir.path(),
        "region",
        &AsciiRasterGeometry::default(),
        100.0,
        0.0,
    );
    assert!(matches!(err, Err(SubsetError::MeshToolNotFound(_))));
}
