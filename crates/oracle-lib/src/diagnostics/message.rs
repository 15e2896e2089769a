use oracle_core::{SourceId, Span};
use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// Syntax problems come first since everything downstream of them is guesswork,
/// then import failures, then semantic errors. Advisory kinds are last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Unclosed delimiters swallow the rest of the file
    UnclosedBrace,
    UnclosedAngle,

    // User omitted something required
    ExpectedDefinition,
    ExpectedTypeRef,
    ExpectedIdent,
    ExpectedValue,
    ExpectedString,
    UnexpectedToken,

    // Import graph
    ImportNotFound,
    ImportFailed,

    // Collection
    DuplicateType,
    DuplicateField,
    DuplicateEnumValue,
    MixedEnumValues,

    // Inheritance
    UnresolvedParent,
    NonStructParent,
    SelfExtension,
    CircularInheritance,
    GenericArity,
    OmitUnknownField,

    // Advisory: generation can proceed with an untyped reference
    UnresolvedType,
    UnresolvedConstraint,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnresolvedType | Self::UnresolvedConstraint => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_syntax_error(&self) -> bool {
        *self <= Self::UnexpectedToken
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExpectedDefinition => Some("e.g., `Name struct { ... }` or `Name enum { ... }`"),
            Self::MixedEnumValues => Some("the first value decides the enum's kind"),
            Self::CircularInheritance => Some("diamond shapes are fine; cycles are not"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnclosedAngle => "missing closing `>`",

            Self::ExpectedDefinition => "expected a definition",
            Self::ExpectedTypeRef => "expected a type",
            Self::ExpectedIdent => "expected a name",
            Self::ExpectedValue => "expected a value",
            Self::ExpectedString => "expected a string literal",
            Self::UnexpectedToken => "unexpected token",

            Self::ImportNotFound => "import not found",
            Self::ImportFailed => "import failed",

            Self::DuplicateType => "duplicate type",
            Self::DuplicateField => "duplicate field",
            Self::DuplicateEnumValue => "duplicate enum value",
            Self::MixedEnumValues => "enum mixes integer and string values",

            Self::UnresolvedParent => "cannot extend an undefined type",
            Self::NonStructParent => "can only extend structs",
            Self::SelfExtension => "struct cannot extend itself",
            Self::CircularInheritance => "circular inheritance",
            Self::GenericArity => "too few type arguments",
            Self::OmitUnknownField => "omitted field is not inherited",

            Self::UnresolvedType => "unresolved type",
            Self::UnresolvedConstraint => "unresolved type parameter constraint",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnclosedBrace | Self::UnclosedAngle => {
                format!("{}; {{}}", self.fallback_message())
            }

            Self::ImportNotFound => "`{}` could not be found".to_string(),
            Self::DuplicateType => "`{}` is already defined".to_string(),
            Self::DuplicateField => "field `{}` is already declared".to_string(),
            Self::DuplicateEnumValue => "enum value `{}` is already declared".to_string(),

            Self::SelfExtension => "`{}` cannot extend itself".to_string(),
            Self::GenericArity => "{}".to_string(),
            Self::OmitUnknownField => "cannot omit `{}`: no parent declares it".to_string(),

            Self::UnresolvedType => "`{}` is not defined".to_string(),
            Self::UnresolvedConstraint => "constraint `{}` is not defined".to_string(),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(source: SourceId, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            span: Span::new(source, range),
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Which source this diagnostic belongs to.
    pub(crate) source: SourceId,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(
        source: SourceId,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source,
            range,
            message: message.into(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(
        source: SourceId,
        kind: DiagnosticKind,
        range: TextRange,
    ) -> Self {
        Self::new(source, kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.span.range.start()),
                u32::from(related.span.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
