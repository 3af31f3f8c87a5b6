//! Accelerator Library Loader
//!
//! Safe wrapper around libloading plus the search-path probe that locates a
//! compatible accelerator library.

use std::ffi::CString;
use std::fmt;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, LoadError, ProbeAttempt};

/// File name probed in every candidate directory
pub const LIBRARY_FILENAME: &str = "libEslHwacc.so";

/// Entry points a library must export to be accepted
pub const REQUIRED_ENTRY_POINTS: [EntryPoint; 2] = [EntryPoint::HwaccDebug, EntryPoint::MatmulF32];

/// Entry points exported by the accelerator library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntryPoint {
    /// Debug stub that accepts any signature
    #[default]
    #[serde(rename = "hwacc_debug")]
    HwaccDebug,
    /// Single-precision matmul kernel
    #[serde(rename = "matmul_f32")]
    MatmulF32,
}

impl EntryPoint {
    pub fn symbol(&self) -> &'static str {
        match self {
            EntryPoint::HwaccDebug => "hwacc_debug",
            EntryPoint::MatmulF32 => "matmul_f32",
        }
    }

    pub fn from_symbol(name: &str) -> Option<Self> {
        match name {
            "hwacc_debug" => Some(EntryPoint::HwaccDebug),
            "matmul_f32" => Some(EntryPoint::MatmulF32),
            _ => None,
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A dynamically loaded library
pub struct DynamicLibrary {
    /// Path to the library
    path: PathBuf,
    /// The loaded library handle; dropping it unloads the library
    library: Library,
}

impl DynamicLibrary {
    /// Load a library from the given path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();

        // Safety: loading runs the library's initializers. Candidates come
        // from the configured search path, which the user controls.
        let library =
            unsafe { Library::new(&path).map_err(|e| LoadError::Open(e.to_string()))? };

        Ok(Self { path, library })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of an exported symbol
    pub fn symbol_address(&self, name: &str) -> Result<usize, LoadError> {
        let c_name =
            CString::new(name).map_err(|_| LoadError::MissingEntryPoint(name.to_string()))?;

        // Safety: the symbol is only read as an address here. Callers that
        // invoke it are responsible for using the matching signature.
        let symbol: Symbol<*const ()> = unsafe {
            self.library
                .get(c_name.as_bytes_with_nul())
                .map_err(|_| LoadError::MissingEntryPoint(name.to_string()))?
        };

        Ok(*symbol as usize)
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbol_address(name).is_ok()
    }
}

impl fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("path", &self.path)
            .finish()
    }
}

/// A library that exports every required entry point
#[derive(Debug)]
pub struct ValidatedLibrary {
    library: DynamicLibrary,
    attempts: Vec<ProbeAttempt>,
}

impl ValidatedLibrary {
    pub fn path(&self) -> &Path {
        self.library.path()
    }

    /// Every candidate probed up to and including the accepted one
    pub fn attempts(&self) -> &[ProbeAttempt] {
        &self.attempts
    }

    /// Address of a required entry point
    pub fn entry_point(&self, entry: EntryPoint) -> Result<usize, LoadError> {
        self.library.symbol_address(entry.symbol())
    }
}

/// Probes candidate directories in order and keeps the first library that
/// loads and exports all required entry points.
#[derive(Debug, Clone)]
pub struct LibraryResolver {
    candidates: Vec<PathBuf>,
    filename: String,
}

impl LibraryResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            filename: LIBRARY_FILENAME.to_string(),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Scan the candidates. Per-candidate failures are recorded and
    /// skipped; only running out of candidates is an error.
    pub fn resolve(&self) -> Result<ValidatedLibrary, ConfigError> {
        let mut attempts = Vec::new();

        for dir in &self.candidates {
            let path = dir.join(&self.filename);
            match self.probe(&path) {
                Ok(library) => {
                    info!(path = %path.display(), "validated accelerator library");
                    attempts.push(ProbeAttempt {
                        path,
                        outcome: Ok(()),
                    });
                    return Ok(ValidatedLibrary { library, attempts });
                }
                Err(LoadError::NotFound) => {
                    debug!(path = %path.display(), "no library in candidate");
                    attempts.push(ProbeAttempt {
                        path,
                        outcome: Err(LoadError::NotFound),
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "rejected library candidate");
                    attempts.push(ProbeAttempt {
                        path,
                        outcome: Err(e),
                    });
                }
            }
        }

        Err(ConfigError::NoCompatibleLibrary {
            library: self.filename.clone(),
            search_path: self.candidates.clone(),
            attempts,
        })
    }

    /// Load one candidate file and check its entry points. A library that
    /// lacks an entry point is dropped (and unloaded) before returning.
    pub fn probe(&self, path: &Path) -> Result<DynamicLibrary, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound);
        }

        let library = DynamicLibrary::load(path)?;
        for entry in REQUIRED_ENTRY_POINTS {
            library.symbol_address(entry.symbol())?;
        }
        Ok(library)
    }
}
