//! FFI Module for hwacc-bind
//!
//! Decodes accelerator symbol names into native signatures and locates the
//! accelerator library that implements them.
//!
//! # Architecture
//!
//! ```text
//! "linalg_matmul_2x3xf32_f32"
//!       │
//!       ▼
//! NameGrammar ──── TypeVocabulary
//!       │  [MemrefView{rank 1, f32}, Scalar(f32)]
//!       ▼
//! SignatureBuilder
//!       │  void (*memref<rank 1, f32>, f32)
//!       ▼
//! Registrar ◄──── LibraryResolver (libloading)
//! ```
//!
//! # Example
//!
//! ```
//! use hwacc_bind::ffi::{NameGrammar, NativeType, ScalarType, SignatureBuilder};
//!
//! let decoded = NameGrammar::new()
//!     .decode("linalg_matmul_2x3xf32")
//!     .unwrap()
//!     .unwrap();
//! let sig = SignatureBuilder::default().build(&decoded).unwrap();
//! assert_eq!(
//!     sig.params(),
//!     &[NativeType::RankedMemRefPtr { rank: 1, element: ScalarType::F32 }]
//! );
//! ```

mod grammar;
mod loader;
pub mod memref;
mod signature;
mod vocabulary;

pub use grammar::{
    normalize_symbol, DecodedFunctionName, NameGrammar, TypeToken, SYMBOL_PREFIX, TOKEN_SEPARATOR,
};
pub use loader::{
    DynamicLibrary, EntryPoint, LibraryResolver, ValidatedLibrary, LIBRARY_FILENAME,
    REQUIRED_ENTRY_POINTS,
};
pub use signature::{NativeType, SignatureBuilder, SignatureDescriptor};
pub use vocabulary::{ScalarType, TypeVocabulary, MEMREF_ELEMENT_TYPES, SCALAR_TYPES};
