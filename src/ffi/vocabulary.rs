//! Element Type Vocabulary
//!
//! Closed lookup tables from the short element codes used in symbol names to
//! native scalar types. Adding a type means adding a [`ScalarType`] variant
//! and a table row; the grammar picks it up without further changes.

use std::fmt;

/// Native scalar types a parameter or memref element can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 32-bit floating point (`float`)
    F32,
}

impl ScalarType {
    /// Size in bytes
    pub fn size(&self) -> usize {
        match self {
            ScalarType::F32 => std::mem::size_of::<f32>(),
        }
    }

    /// Alignment in bytes
    pub fn align(&self) -> usize {
        match self {
            ScalarType::F32 => std::mem::align_of::<f32>(),
        }
    }

    /// C spelling of the type
    pub fn c_name(&self) -> &'static str {
        match self {
            ScalarType::F32 => "float",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::F32 => write!(f, "f32"),
        }
    }
}

/// Element code -> scalar parameter type.
pub const SCALAR_TYPES: &[(&str, ScalarType)] = &[
    // ("i1", ScalarType::I1),
    // ("i8", ScalarType::I8),
    // ("i64", ScalarType::I64),
    ("f32", ScalarType::F32),
    // ("f64", ScalarType::F64),
];

/// Element code -> unranked memref element type.
pub const MEMREF_ELEMENT_TYPES: &[(&str, ScalarType)] = &[
    // ("mrf16", ScalarType::F16),
    // ("mrf32", ScalarType::F32),
    // ("mrf64", ScalarType::F64),
    // ("mri1", ScalarType::I1),
    // ("mri8", ScalarType::I8),
    // ("mri32", ScalarType::I32),
    // ("mri64", ScalarType::I64),
    // ("mrc32", ScalarType::C32),
    // ("mrc64", ScalarType::C64),
];

/// The pair of lookup tables consulted by the grammar and signature builder
#[derive(Debug, Clone, Copy)]
pub struct TypeVocabulary {
    scalars: &'static [(&'static str, ScalarType)],
    memref_elements: &'static [(&'static str, ScalarType)],
}

impl TypeVocabulary {
    /// The built-in tables
    pub const fn standard() -> Self {
        Self {
            scalars: SCALAR_TYPES,
            memref_elements: MEMREF_ELEMENT_TYPES,
        }
    }

    /// Build a vocabulary from custom tables
    pub const fn with_tables(
        scalars: &'static [(&'static str, ScalarType)],
        memref_elements: &'static [(&'static str, ScalarType)],
    ) -> Self {
        Self {
            scalars,
            memref_elements,
        }
    }

    pub fn is_scalar(&self, code: &str) -> bool {
        self.scalar(code).is_some()
    }

    /// Look up a scalar parameter code
    pub fn scalar(&self, code: &str) -> Option<ScalarType> {
        lookup(self.scalars, code)
    }

    pub fn is_memref_element(&self, code: &str) -> bool {
        self.memref_element(code).is_some()
    }

    /// Look up an unranked memref element code
    pub fn memref_element(&self, code: &str) -> Option<ScalarType> {
        lookup(self.memref_elements, code)
    }

    /// All scalar codes, in table order
    pub fn scalar_codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scalars.iter().map(|(code, _)| *code)
    }
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

fn lookup(table: &[(&str, ScalarType)], code: &str) -> Option<ScalarType> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, ty)| *ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables() {
        let vocab = TypeVocabulary::standard();
        assert_eq!(vocab.scalar("f32"), Some(ScalarType::F32));
        assert!(vocab.is_scalar("f32"));
        assert!(!vocab.is_scalar("f64"));
        assert!(!vocab.is_scalar("F32"));
        assert!(!vocab.is_memref_element("mrf32"));
        assert_eq!(vocab.scalar_codes().collect::<Vec<_>>(), vec!["f32"]);
    }

    #[test]
    fn test_scalar_layout() {
        assert_eq!(ScalarType::F32.size(), 4);
        assert_eq!(ScalarType::F32.align(), 4);
        assert_eq!(ScalarType::F32.c_name(), "float");
        assert_eq!(ScalarType::F32.to_string(), "f32");
    }
}
