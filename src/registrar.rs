//! Symbol Registrar
//!
//! Ties the pipeline together: list the symbols of a compiled module, decode
//! the eligible ones, build their native signatures and hand each one, bound
//! to an entry point of the validated accelerator library, to the execution
//! engine.
//!
//! A pass is atomic. Every symbol is decoded and built before the first one
//! is registered, so a grammar error leaves the engine untouched.

use std::fmt;
use std::mem;

use tracing::{debug, info, warn};

use crate::config::BindConfig;
use crate::error::{BindError, Result};
use crate::ffi::{
    normalize_symbol, EntryPoint, LibraryResolver, NameGrammar, SignatureBuilder,
    SignatureDescriptor, ValidatedLibrary,
};

/// A compiled module that can enumerate its function symbols
pub trait SymbolSource {
    /// Symbol names as the module prints them, possibly quoted
    fn symbol_names(&self) -> Vec<String>;
}

impl<S: AsRef<str>> SymbolSource for [S] {
    fn symbol_names(&self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> SymbolSource for Vec<S> {
    fn symbol_names(&self) -> Vec<String> {
        self.as_slice().symbol_names()
    }
}

/// The host that invokes registered functions
pub trait ExecutionEngine {
    /// Make `function` callable under `name`
    fn register_runtime(&mut self, name: &str, function: BoundFunction);
}

/// A native entry point typed with a decoded signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFunction {
    /// Symbol name the function is registered under
    pub name: String,
    /// Native signature decoded from the name
    pub signature: SignatureDescriptor,
    /// Library entry point the address belongs to
    pub entry_point: EntryPoint,
    /// Address of the entry point; valid while the owning [`Registrar`] lives
    pub address: usize,
}

impl BoundFunction {
    /// Reinterpret the address as a concrete function pointer type.
    ///
    /// # Safety
    ///
    /// `F` must be an `extern "C" fn` type matching `signature`, and the
    /// [`Registrar`] that produced this binding must still be alive.
    pub unsafe fn cast<F: Copy>(&self) -> F {
        assert_eq!(
            mem::size_of::<F>(),
            mem::size_of::<usize>(),
            "function pointer type must be pointer sized"
        );
        mem::transmute_copy::<usize, F>(&self.address)
    }
}

impl fmt::Display for BoundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} @ {} ({:#x})",
            self.name, self.signature, self.entry_point, self.address
        )
    }
}

/// Engine that only records registrations, in order
#[derive(Debug, Default)]
pub struct RecordingEngine {
    registered: Vec<BoundFunction>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self) -> &[BoundFunction] {
        &self.registered
    }

    pub fn get(&self, name: &str) -> Option<&BoundFunction> {
        self.registered.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.registered.iter().map(|f| f.name.as_str()).collect()
    }
}

impl ExecutionEngine for RecordingEngine {
    fn register_runtime(&mut self, name: &str, function: BoundFunction) {
        debug_assert_eq!(name, function.name);
        self.registered.push(function);
    }
}

/// Binds decoded accelerator symbols to a validated library
#[derive(Debug)]
pub struct Registrar {
    grammar: NameGrammar,
    builder: SignatureBuilder,
    library: ValidatedLibrary,
    entry_point: EntryPoint,
}

impl Registrar {
    /// Resolve the accelerator library from the configured search path.
    pub fn new(config: &BindConfig) -> Result<Self> {
        let library = LibraryResolver::new(config.search_path.clone()).resolve()?;
        Ok(Self::with_library(library, config.entry_point))
    }

    /// Resolve using `LD_LIBRARY_PATH`.
    pub fn from_env() -> Result<Self> {
        Self::new(&BindConfig::from_env()?)
    }

    pub fn with_library(library: ValidatedLibrary, entry_point: EntryPoint) -> Self {
        let grammar = NameGrammar::new();
        let builder = SignatureBuilder::new(*grammar.vocabulary());
        Self {
            grammar,
            builder,
            library,
            entry_point,
        }
    }

    pub fn library(&self) -> &ValidatedLibrary {
        &self.library
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    /// Eligible symbols of `module`, unquoted, in module order.
    pub fn discover<M: SymbolSource + ?Sized>(&self, module: &M) -> Vec<String> {
        discover(&self.grammar, module)
    }

    /// Decode and build every eligible symbol without touching the library.
    pub fn signatures<M: SymbolSource + ?Sized>(
        &self,
        module: &M,
    ) -> Result<Vec<(String, SignatureDescriptor)>> {
        signatures(&self.grammar, &self.builder, module)
    }

    /// Register every eligible symbol of `module` with `engine`.
    ///
    /// Returns the bindings handed to the engine, in registration order.
    pub fn register<E, M>(&self, engine: &mut E, module: &M) -> Result<Vec<BoundFunction>>
    where
        E: ExecutionEngine + ?Sized,
        M: SymbolSource + ?Sized,
    {
        let staged = self.signatures(module)?;

        let address = self
            .library
            .entry_point(self.entry_point)
            .map_err(|e| BindError::EntryPoint {
                name: self.entry_point.symbol().to_string(),
                reason: e.to_string(),
            })?;

        let bound: Vec<BoundFunction> = staged
            .into_iter()
            .map(|(name, signature)| {
                if signature.has_unranked() {
                    warn!(symbol = %name, "unranked memref parameters are not implemented natively");
                }
                BoundFunction {
                    name,
                    signature,
                    entry_point: self.entry_point,
                    address,
                }
            })
            .collect();

        for function in &bound {
            engine.register_runtime(&function.name, function.clone());
        }

        info!(
            count = bound.len(),
            entry_point = %self.entry_point,
            library = %self.library.path().display(),
            "registered accelerator symbols"
        );
        Ok(bound)
    }
}

/// Eligible symbols of `module` under `grammar`.
pub fn discover<M: SymbolSource + ?Sized>(grammar: &NameGrammar, module: &M) -> Vec<String> {
    module
        .symbol_names()
        .iter()
        .map(|raw| normalize_symbol(raw))
        .filter(|name| grammar.is_eligible(name))
        .collect()
}

/// Decode and build the signature of every eligible symbol, stopping at the
/// first symbol that breaks the grammar.
pub fn signatures<M: SymbolSource + ?Sized>(
    grammar: &NameGrammar,
    builder: &SignatureBuilder,
    module: &M,
) -> Result<Vec<(String, SignatureDescriptor)>> {
    let mut staged = Vec::new();
    for name in discover(grammar, module) {
        let decoded = grammar.decode_strict(&name)?;
        let signature = builder.build(&decoded)?;
        debug!(symbol = %name, signature = %signature, "decoded accelerator symbol");
        staged.push((name, signature));
    }
    Ok(staged)
}
