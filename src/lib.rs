//! hwacc-bind - Accelerator Symbol Binding
//!
//! Binds accelerator functions declared by a compiled module to a native
//! accelerator library at process start. Function names carry their own
//! calling signature:
//!
//! ```text
//! linalg_matmul_4x8xf32_8x16xf32_4x16xf32
//!               └──┬──┘ └──┬───┘ └──┬───┘
//!        memref<?xf32>*  memref<?xf32>*  memref<?xf32>*
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────┐
//! │ Compiled module │  symbol names (SymbolSource)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  NameGrammar    │  prefix + TypeTokens
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐      ┌──────────────────┐
//! │SignatureBuilder │      │ LibraryResolver  │  LD_LIBRARY_PATH
//! └────────┬────────┘      └────────┬─────────┘
//!          ▼                        ▼
//! ┌──────────────────────────────────────────┐
//! │ Registrar → ExecutionEngine::register    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hwacc_bind::{RecordingEngine, Registrar};
//!
//! let registrar = Registrar::from_env()?;
//! let mut engine = RecordingEngine::new();
//! let module = vec!["linalg_matmul_f32", "linalg_matmul_2x3xf32", "other_func"];
//! registrar.register(&mut engine, &module)?;
//! assert_eq!(engine.names(), vec!["linalg_matmul_f32", "linalg_matmul_2x3xf32"]);
//! # Ok::<(), hwacc_bind::BindError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod ffi;
pub mod registrar;

// Re-export commonly used types
pub use config::BindConfig;
pub use error::{BindError, ConfigError, GrammarError, LoadError, ProbeAttempt, Result};
pub use ffi::{
    EntryPoint, LibraryResolver, NameGrammar, NativeType, SignatureBuilder, SignatureDescriptor,
    TypeToken,
};
pub use registrar::{BoundFunction, ExecutionEngine, RecordingEngine, Registrar, SymbolSource};
