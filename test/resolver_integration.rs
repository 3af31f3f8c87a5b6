//! Library Resolver Integration Tests
//!
//! Uses the fixture libraries compiled by build.rs. Each test returns early
//! when the fixtures could not be built.

use std::fs;
use std::path::{Path, PathBuf};

use hwacc_bind::ffi::{EntryPoint, LibraryResolver, LIBRARY_FILENAME};
use hwacc_bind::{ConfigError, LoadError};
use tempfile::TempDir;

fn fixture(name: &str) -> Option<PathBuf> {
    let dir = option_env!("HWACC_FIXTURE_DIR");
    if dir.is_none() {
        eprintln!("skipping: fixture libraries were not built (HWACC_FIXTURE_DIR unset)");
    }
    dir.map(|dir| PathBuf::from(dir).join(name))
}

/// Copy a fixture library into a fresh candidate directory
fn candidate_with(fixture_dir: &Path) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        fixture_dir.join(LIBRARY_FILENAME),
        dir.path().join(LIBRARY_FILENAME),
    )
    .unwrap();
    dir
}

#[test]
fn test_skips_invalid_candidate_for_valid_one() {
    let (Some(full), Some(debug_only)) = (fixture("full"), fixture("debug_only")) else {
        return;
    };
    let a = candidate_with(&debug_only);
    let b = candidate_with(&full);

    let library = LibraryResolver::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .resolve()
        .unwrap();

    assert_eq!(library.path(), b.path().join(LIBRARY_FILENAME));
    let attempts = library.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(
        attempts[0].outcome,
        Err(LoadError::MissingEntryPoint("matmul_f32".to_string()))
    );
    assert_eq!(attempts[1].outcome, Ok(()));
    assert!(library.entry_point(EntryPoint::HwaccDebug).is_ok());
    assert!(library.entry_point(EntryPoint::MatmulF32).is_ok());
}

#[test]
fn test_skips_garbage_and_missing_candidates() {
    let Some(full) = fixture("full") else {
        return;
    };
    let missing = tempfile::tempdir().unwrap();
    let garbage = tempfile::tempdir().unwrap();
    fs::write(garbage.path().join(LIBRARY_FILENAME), b"\x7fELF truncated").unwrap();
    let good = candidate_with(&full);

    let library = LibraryResolver::new(vec![
        missing.path().to_path_buf(),
        garbage.path().to_path_buf(),
        good.path().to_path_buf(),
    ])
    .resolve()
    .unwrap();

    let outcomes: Vec<_> = library.attempts().iter().map(|a| a.outcome.clone()).collect();
    assert_eq!(outcomes[0], Err(LoadError::NotFound));
    assert!(matches!(outcomes[1], Err(LoadError::Open(_))));
    assert_eq!(outcomes[2], Ok(()));
}

#[test]
fn test_first_valid_candidate_wins() {
    let Some(full) = fixture("full") else {
        return;
    };
    let first = candidate_with(&full);
    let second = candidate_with(&full);

    let library = LibraryResolver::new(vec![
        first.path().to_path_buf(),
        second.path().to_path_buf(),
    ])
    .resolve()
    .unwrap();

    assert_eq!(library.path(), first.path().join(LIBRARY_FILENAME));
    assert_eq!(library.attempts().len(), 1);
}

#[test]
fn test_all_invalid_candidates_is_configuration_error() {
    let Some(debug_only) = fixture("debug_only") else {
        return;
    };
    let a = candidate_with(&debug_only);
    let b = tempfile::tempdir().unwrap();

    let err = LibraryResolver::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
        .resolve()
        .unwrap_err();

    let message = err.to_string();
    let ConfigError::NoCompatibleLibrary { attempts, .. } = err else {
        panic!("expected exhausted search path");
    };
    assert_eq!(attempts.len(), 2);
    assert!(message.contains("missing entry point `matmul_f32`"));
}
