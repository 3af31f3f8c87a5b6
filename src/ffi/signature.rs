//! Native Signatures
//!
//! Maps decoded [`TypeToken`]s onto the native parameter types a bound
//! function is called with. Slot 0 is always `void`: bound functions never
//! return a value natively.

use std::fmt;
use std::mem;

use super::grammar::{DecodedFunctionName, TypeToken};
use super::memref::{ranked_descriptor_align, ranked_descriptor_size, UnrankedMemRef};
use super::vocabulary::{ScalarType, TypeVocabulary};
use crate::error::GrammarError;

/// A native parameter or return type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// No value
    Void,
    /// Scalar passed by value
    Scalar(ScalarType),
    /// Pointer to a ranked strided memref descriptor
    RankedMemRefPtr { rank: usize, element: ScalarType },
    /// Pointer to an unranked memref descriptor
    UnrankedMemRefPtr { element: ScalarType },
}

impl NativeType {
    /// Size in bytes of the value passed in this slot
    pub fn size(&self) -> usize {
        match self {
            NativeType::Void => 0,
            NativeType::Scalar(ty) => ty.size(),
            NativeType::RankedMemRefPtr { .. } | NativeType::UnrankedMemRefPtr { .. } => {
                mem::size_of::<usize>()
            }
        }
    }

    /// Byte size of the descriptor a pointer slot points at
    pub fn pointee_size(&self) -> Option<usize> {
        match self {
            NativeType::RankedMemRefPtr { rank, .. } => Some(ranked_descriptor_size(*rank)),
            NativeType::UnrankedMemRefPtr { .. } => Some(mem::size_of::<UnrankedMemRef>()),
            _ => None,
        }
    }

    /// Alignment of the descriptor a pointer slot points at
    pub fn pointee_align(&self) -> Option<usize> {
        match self {
            NativeType::RankedMemRefPtr { .. } => Some(ranked_descriptor_align()),
            NativeType::UnrankedMemRefPtr { .. } => Some(mem::align_of::<UnrankedMemRef>()),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            NativeType::RankedMemRefPtr { .. } | NativeType::UnrankedMemRefPtr { .. }
        )
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Void => write!(f, "void"),
            NativeType::Scalar(ty) => write!(f, "{}", ty),
            NativeType::RankedMemRefPtr { rank, element } => {
                write!(f, "*memref<rank {}, {}>", rank, element)
            }
            NativeType::UnrankedMemRefPtr { element } => write!(f, "*memref<*, {}>", element),
        }
    }
}

/// Ordered native slots of a bound function; slot 0 is the return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureDescriptor {
    slots: Vec<NativeType>,
}

impl SignatureDescriptor {
    /// Signature with no parameters
    pub fn empty() -> Self {
        Self {
            slots: vec![NativeType::Void],
        }
    }

    pub fn slots(&self) -> &[NativeType] {
        &self.slots
    }

    pub fn return_type(&self) -> NativeType {
        self.slots[0]
    }

    pub fn params(&self) -> &[NativeType] {
        &self.slots[1..]
    }

    /// Whether any parameter is an unranked memref, which native
    /// implementations do not accept yet
    pub fn has_unranked(&self) -> bool {
        self.params()
            .iter()
            .any(|p| matches!(p, NativeType::UnrankedMemRefPtr { .. }))
    }
}

impl fmt::Display for SignatureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.return_type())?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// Turns decoded tokens into a [`SignatureDescriptor`]
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    vocabulary: TypeVocabulary,
}

impl SignatureBuilder {
    pub fn new(vocabulary: TypeVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn build(&self, decoded: &DecodedFunctionName) -> Result<SignatureDescriptor, GrammarError> {
        self.build_tokens(&decoded.symbol, &decoded.tokens)
    }

    /// Build from raw tokens. Element codes are resolved again here, so a
    /// token list not produced by the grammar cannot smuggle in a type.
    pub fn build_tokens(
        &self,
        symbol: &str,
        tokens: &[TypeToken],
    ) -> Result<SignatureDescriptor, GrammarError> {
        let mut slots = Vec::with_capacity(tokens.len() + 1);
        slots.push(NativeType::Void);

        for token in tokens {
            let unsupported = || GrammarError::UnsupportedElementType {
                symbol: symbol.to_string(),
                token: token.to_string(),
                element: token.element_code().to_string(),
            };

            let slot = match token {
                TypeToken::Scalar(code) => {
                    NativeType::Scalar(self.vocabulary.scalar(code).ok_or_else(unsupported)?)
                }
                TypeToken::MemrefUnranked(code) => NativeType::UnrankedMemRefPtr {
                    element: self
                        .vocabulary
                        .memref_element(code)
                        .ok_or_else(unsupported)?,
                },
                TypeToken::MemrefView { rank, element } => NativeType::RankedMemRefPtr {
                    rank: *rank,
                    element: self.vocabulary.scalar(element).ok_or_else(unsupported)?,
                },
            };
            slots.push(slot);
        }

        Ok(SignatureDescriptor { slots })
    }
}
