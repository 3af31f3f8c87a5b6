//! Build script for hwacc-bind test fixtures
//!
//! Compiles small accelerator libraries with the host C compiler so the
//! resolver and registrar tests can load real shared objects. Each fixture
//! lands in its own directory as `libEslHwacc.so`. When no compiler is
//! available the fixtures are skipped and the tests that need them return
//! early.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const FIXTURES: &[(&str, &str)] = &[
    ("full", "fixtures/hwacc_full.c"),
    ("debug_only", "fixtures/hwacc_debug_only.c"),
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=fixtures/");

    if env::var_os("CARGO_CFG_UNIX").is_none() {
        println!("cargo:warning=fixture libraries are only built on unix targets");
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let fixture_root = out_dir.join("fixtures");

    for (name, source) in FIXTURES {
        if let Err(e) = build_fixture(&fixture_root.join(name), Path::new(source)) {
            println!("cargo:warning=skipping fixture libraries: {}", e);
            return;
        }
    }

    println!(
        "cargo:rustc-env=HWACC_FIXTURE_DIR={}",
        fixture_root.display()
    );
}

/// Compile `source` into `<dir>/libEslHwacc.so`
fn build_fixture(dir: &Path, source: &Path) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;

    let compiler = cc::Build::new()
        .cargo_metadata(false)
        .try_get_compiler()
        .map_err(|e| e.to_string())?;

    let status = compiler
        .to_command()
        .args(["-shared", "-fPIC", "-O0", "-o"])
        .arg(dir.join("libEslHwacc.so"))
        .arg(source)
        .status()
        .map_err(|e| format!("failed to run C compiler: {}", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("compiling {} failed: {}", source.display(), status))
    }
}
