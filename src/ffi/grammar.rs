//! Symbol Name Grammar
//!
//! Decodes the calling signature that a producing compiler encodes into a
//! function name:
//!
//! ```text
//! linalg_matmul_<token>_<token>_...
//!
//! token := <scalar code>                 f32
//!        | <memref element code>         (none enabled)
//!        | [view](<digits>x)+<element code>    4x8xf32, view4x8xf32
//! ```
//!
//! Each token describes one parameter. Only the number of dimension groups
//! of a view token is kept; the sizes themselves are erased.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use super::vocabulary::TypeVocabulary;
use crate::error::GrammarError;

/// Prefix every eligible symbol starts with
pub const SYMBOL_PREFIX: &str = "linalg_matmul_";

/// Separator between type tokens
pub const TOKEN_SEPARATOR: char = '_';

lazy_static! {
    static ref MEMREF_VIEW: Regex =
        Regex::new(r"^(?:view)?((?:\d+x)+)([A-Za-z][A-Za-z0-9]*)$")
            .expect("memref view pattern is valid");
}

/// One decoded parameter of a symbol's signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeToken {
    /// A plain scalar passed by value
    Scalar(String),
    /// A memref with a fixed rank and dynamic sizes
    MemrefView { rank: usize, element: String },
    /// A memref whose rank is not known statically
    MemrefUnranked(String),
}

impl TypeToken {
    /// The element code the token refers to
    pub fn element_code(&self) -> &str {
        match self {
            TypeToken::Scalar(code) => code,
            TypeToken::MemrefView { element, .. } => element,
            TypeToken::MemrefUnranked(code) => code,
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeToken::Scalar(code) => write!(f, "{}", code),
            TypeToken::MemrefView { rank, element } => {
                write!(f, "memref<{}x{}>", vec!["?"; *rank].join("x"), element)
            }
            TypeToken::MemrefUnranked(code) => write!(f, "memref<*x{}>", code),
        }
    }
}

/// A symbol name split into its prefix and decoded parameter tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFunctionName {
    /// Full symbol name
    pub symbol: String,
    /// The matched prefix
    pub prefix: String,
    /// Parameter tokens in declaration order
    pub tokens: Vec<TypeToken>,
}

/// Remove the quotes an attribute printer wraps around symbol names.
pub fn normalize_symbol(raw: &str) -> String {
    raw.replace('"', "")
}

/// Parser for the symbol naming grammar
#[derive(Debug, Clone)]
pub struct NameGrammar {
    prefix: String,
    vocabulary: TypeVocabulary,
}

impl NameGrammar {
    /// Grammar with the standard prefix and vocabulary
    pub fn new() -> Self {
        Self::with_vocabulary(TypeVocabulary::standard())
    }

    pub fn with_vocabulary(vocabulary: TypeVocabulary) -> Self {
        Self {
            prefix: SYMBOL_PREFIX.to_string(),
            vocabulary,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn vocabulary(&self) -> &TypeVocabulary {
        &self.vocabulary
    }

    /// Byte-for-byte prefix check
    pub fn is_eligible(&self, symbol: &str) -> bool {
        symbol.as_bytes().starts_with(self.prefix.as_bytes())
    }

    /// Decode a symbol, ignoring it if the prefix does not match.
    ///
    /// Returns `Ok(None)` for ineligible symbols and an error for the first
    /// token that cannot be parsed.
    pub fn decode(&self, symbol: &str) -> Result<Option<DecodedFunctionName>, GrammarError> {
        if !self.is_eligible(symbol) {
            return Ok(None);
        }
        self.decode_strict(symbol).map(Some)
    }

    /// Decode a symbol that must carry the prefix.
    pub fn decode_strict(&self, symbol: &str) -> Result<DecodedFunctionName, GrammarError> {
        let remainder =
            symbol
                .strip_prefix(self.prefix.as_str())
                .ok_or_else(|| GrammarError::MissingPrefix {
                    symbol: symbol.to_string(),
                    prefix: self.prefix.clone(),
                })?;

        let tokens = remainder
            .split(TOKEN_SEPARATOR)
            .map(|token| self.parse_token(symbol, token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedFunctionName {
            symbol: symbol.to_string(),
            prefix: self.prefix.clone(),
            tokens,
        })
    }

    /// Parse a single token of `symbol`.
    ///
    /// Scalar codes win over memref element codes, which win over the view
    /// pattern.
    pub fn parse_token(&self, symbol: &str, token: &str) -> Result<TypeToken, GrammarError> {
        if self.vocabulary.is_scalar(token) {
            return Ok(TypeToken::Scalar(token.to_string()));
        }
        if self.vocabulary.is_memref_element(token) {
            return Ok(TypeToken::MemrefUnranked(token.to_string()));
        }

        let caps = MEMREF_VIEW
            .captures(token)
            .ok_or_else(|| GrammarError::UnsupportedType {
                symbol: symbol.to_string(),
                token: token.to_string(),
            })?;

        let element = &caps[2];
        if !self.vocabulary.is_scalar(element) {
            return Err(GrammarError::UnsupportedElementType {
                symbol: symbol.to_string(),
                token: token.to_string(),
                element: element.to_string(),
            });
        }

        Ok(TypeToken::MemrefView {
            rank: view_rank(&caps[1]),
            element: element.to_string(),
        })
    }
}

impl Default for NameGrammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank of a `(<digits>x)+` dimension run.
///
/// The trailing group is an artifact of the encoding and is dropped when
/// more than one group is present.
fn view_rank(dims: &str) -> usize {
    let groups = dims.matches('x').count();
    if groups > 1 {
        groups - 1
    } else {
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::vocabulary::ScalarType;

    fn view(rank: usize) -> TypeToken {
        TypeToken::MemrefView {
            rank,
            element: "f32".to_string(),
        }
    }

    #[test]
    fn test_view_rank_rule() {
        assert_eq!(view_rank("3x"), 1);
        assert_eq!(view_rank("2x3x"), 1);
        assert_eq!(view_rank("2x3x4x"), 2);
        assert_eq!(view_rank("16x16x16x16x"), 3);
    }

    #[test]
    fn test_token_precedence() {
        let g = NameGrammar::new();
        assert_eq!(
            g.parse_token("s", "f32").unwrap(),
            TypeToken::Scalar("f32".to_string())
        );
        assert_eq!(g.parse_token("s", "3xf32").unwrap(), view(1));
        assert_eq!(g.parse_token("s", "2x3xf32").unwrap(), view(1));
        assert_eq!(g.parse_token("s", "10x20x30xf32").unwrap(), view(2));
    }

    #[test]
    fn test_unsupported_tokens() {
        let g = NameGrammar::new();
        for token in [
            "",
            "f64",
            "i8",
            "xf32",
            "2x3",
            "viewf32",
            "vie2xf32",
            "viewview2xf32",
            "2y3xf32",
        ] {
            assert!(
                matches!(
                    g.parse_token("s", token),
                    Err(GrammarError::UnsupportedType { .. })
                ),
                "token {:?} should be unsupported",
                token
            );
        }
    }

    #[test]
    fn test_view_prefixed_tokens() {
        let g = NameGrammar::new();
        assert_eq!(g.parse_token("s", "view2x3xf32").unwrap(), view(1));
        assert_eq!(g.parse_token("s", "view3xf32").unwrap(), view(1));
        assert_eq!(g.parse_token("s", "view2x3x4xf32").unwrap(), view(2));
        assert!(matches!(
            g.parse_token("s", "view2x2xf64"),
            Err(GrammarError::UnsupportedElementType { .. })
        ));
    }

    #[test]
    fn test_view_with_unknown_element() {
        let g = NameGrammar::new();
        assert!(matches!(
            g.parse_token("s", "2x3xf32x"),
            Err(GrammarError::UnsupportedElementType { .. })
        ));

        let err = g.parse_token("linalg_matmul_2x2xf64", "2x2xf64").unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnsupportedElementType {
                symbol: "linalg_matmul_2x2xf64".to_string(),
                token: "2x2xf64".to_string(),
                element: "f64".to_string(),
            }
        );
    }

    #[test]
    fn test_memref_element_codes() {
        static SCALARS: &[(&str, ScalarType)] = &[("f32", ScalarType::F32)];
        static MEMREFS: &[(&str, ScalarType)] = &[("mrf32", ScalarType::F32)];
        let g = NameGrammar::with_vocabulary(TypeVocabulary::with_tables(SCALARS, MEMREFS));

        assert_eq!(
            g.parse_token("s", "mrf32").unwrap(),
            TypeToken::MemrefUnranked("mrf32".to_string())
        );
    }

    #[test]
    fn test_decode_ignores_other_symbols() {
        let g = NameGrammar::new();
        assert_eq!(g.decode("other_func").unwrap(), None);
        assert_eq!(g.decode("linalg_matmul").unwrap(), None);
        assert_eq!(g.decode("Linalg_matmul_f32").unwrap(), None);
        assert_eq!(g.decode("xlinalg_matmul_f32").unwrap(), None);
    }

    #[test]
    fn test_decode_strict_requires_prefix() {
        let g = NameGrammar::new();
        assert!(matches!(
            g.decode_strict("other_func"),
            Err(GrammarError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn test_decode_full_symbol() {
        let g = NameGrammar::new();
        let decoded = g
            .decode("linalg_matmul_4x8xf32_8x16xf32_4x16xf32_f32")
            .unwrap()
            .unwrap();
        assert_eq!(decoded.prefix, SYMBOL_PREFIX);
        assert_eq!(
            decoded.tokens,
            vec![view(1), view(1), view(1), TypeToken::Scalar("f32".to_string())]
        );
    }

    #[test]
    fn test_empty_remainder_is_unsupported() {
        let g = NameGrammar::new();
        assert!(matches!(
            g.decode("linalg_matmul_"),
            Err(GrammarError::UnsupportedType { .. })
        ));
        assert!(matches!(
            g.decode("linalg_matmul_f32__f32"),
            Err(GrammarError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("\"linalg_matmul_f32\""), "linalg_matmul_f32");
        assert_eq!(normalize_symbol("plain"), "plain");
    }

    #[test]
    fn test_token_display() {
        assert_eq!(view(2).to_string(), "memref<?x?xf32>");
        assert_eq!(TypeToken::Scalar("f32".to_string()).to_string(), "f32");
        assert_eq!(
            TypeToken::MemrefUnranked("mrf32".to_string()).to_string(),
            "memref<*xmrf32>"
        );
    }
}
