//! Syntax kinds for the schema language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `OracleLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("{")]
    BraceOpen = 0,

    #[token("}")]
    BraceClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(",")]
    Comma,

    #[token("=")]
    Equals,

    #[token("?")]
    Question,

    /// Hard optional `??`. Defined as its own token so `?` never pairs up by accident.
    #[token("??")]
    QuestionQuestion,

    /// Field omission `-name`
    #[token("-")]
    Minus,

    #[token("@")]
    At,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    #[doc(hidden)]
    StringLiteral, // Lexer-internal only

    DoubleQuote,
    SingleQuote,
    /// String content between quotes
    StrVal,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"-?[0-9]+")]
    Int,

    /// Identifier, possibly qualified (`label.Label`). Keywords are contextual,
    /// so `struct`, `enum`, `import` and friends lex as identifiers too.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Id,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Import,
    Domain,
    Expression,
    Value,
    StructDef,
    AliasDef,
    DistinctDef,
    EnumDef,
    TypeParams,
    TypeParam,
    Extends,
    FieldDef,
    FieldOmit,
    EnumValueDef,
    TypeRef,
    TypeArgs,
    ArraySuffix,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OracleLang {}

impl Language for OracleLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<OracleLang>;
pub type SyntaxToken = rowan::SyntaxToken<OracleLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..64u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Contextual keywords, matched against `Id` text.
pub mod keywords {
    pub const IMPORT: &str = "import";
    pub const STRUCT: &str = "struct";
    pub const ENUM: &str = "enum";
    pub const EXTENDS: &str = "extends";
    pub const MAP: &str = "map";
    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const STRING_START: TokenSet = TokenSet::new(&[DoubleQuote, SingleQuote]);

    /// FIRST set of an expression value.
    pub const VALUE_FIRST: TokenSet = TokenSet::new(&[DoubleQuote, SingleQuote, Int, Float, Id]);

    pub const OPTIONAL_MARKERS: TokenSet = TokenSet::new(&[Question, QuestionQuestion]);

    /// Tokens a top-level item can start with.
    pub const ROOT_RECOVERY: TokenSet = TokenSet::new(&[Id, At]);

    /// Where a member of a `{ ... }` body may resume after an error.
    pub const BODY_RECOVERY: TokenSet = TokenSet::new(&[BraceClose, At, Minus]);

    /// Inside `{ ... }` blocks that hold only domains.
    pub const DOMAIN_BLOCK_RECOVERY: TokenSet = TokenSet::new(&[BraceClose, At]);

    /// Inside an expression block of a domain.
    pub const EXPRESSION_RECOVERY: TokenSet = TokenSet::new(&[BraceClose, Id]);

    pub const TYPE_ARGS_RECOVERY: TokenSet = TokenSet::new(&[AngleClose, BraceOpen, BraceClose]);
}
