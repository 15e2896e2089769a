//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken, keywords};
use super::lexer::unescape;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }

            pub fn text_range(&self) -> TextRange {
                self.0.text_range()
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Import, Import);
ast_node!(Domain, Domain);
ast_node!(Expression, Expression);
ast_node!(Value, Value);
ast_node!(StructDef, StructDef);
ast_node!(AliasDef, AliasDef);
ast_node!(DistinctDef, DistinctDef);
ast_node!(EnumDef, EnumDef);
ast_node!(TypeParams, TypeParams);
ast_node!(TypeParam, TypeParam);
ast_node!(Extends, Extends);
ast_node!(FieldDef, FieldDef);
ast_node!(FieldOmit, FieldOmit);
ast_node!(EnumValueDef, EnumValueDef);
ast_node!(TypeRef, TypeRef);
ast_node!(TypeArgs, TypeArgs);
ast_node!(ArraySuffix, ArraySuffix);

/// Top-level type definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Definition {
    Struct(StructDef),
    Alias(AliasDef),
    Distinct(DistinctDef),
    Enum(EnumDef),
}

impl Definition {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::StructDef => StructDef::cast(node).map(Definition::Struct),
            SyntaxKind::AliasDef => AliasDef::cast(node).map(Definition::Alias),
            SyntaxKind::DistinctDef => DistinctDef::cast(node).map(Definition::Distinct),
            SyntaxKind::EnumDef => EnumDef::cast(node).map(Definition::Enum),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Definition::Struct(n) => n.as_cst(),
            Definition::Alias(n) => n.as_cst(),
            Definition::Distinct(n) => n.as_cst(),
            Definition::Enum(n) => n.as_cst(),
        }
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(self.as_cst())
    }
}

/// Member of a struct body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructMember {
    Field(FieldDef),
    Omit(FieldOmit),
    Domain(Domain),
}

impl StructMember {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FieldDef => FieldDef::cast(node).map(StructMember::Field),
            SyntaxKind::FieldOmit => FieldOmit::cast(node).map(StructMember::Omit),
            SyntaxKind::Domain => Domain::cast(node).map(StructMember::Domain),
            _ => None,
        }
    }
}

fn first_id(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::Id)
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| t.kind() == kind)
}

fn is_quoted(node: &SyntaxNode) -> bool {
    has_token(node, SyntaxKind::DoubleQuote) || has_token(node, SyntaxKind::SingleQuote)
}

impl Root {
    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        self.0.children().filter_map(Import::cast)
    }

    /// File-level domains.
    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }

    pub fn definitions(&self) -> impl Iterator<Item = Definition> + '_ {
        self.0.children().filter_map(Definition::cast)
    }
}

impl Import {
    pub fn path_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::StrVal)
    }

    /// Import path with escapes resolved. `None` when the string is missing.
    pub fn path(&self) -> Option<String> {
        if !is_quoted(&self.0) {
            return None;
        }
        Some(
            self.path_token()
                .map(|t| unescape(t.text()))
                .unwrap_or_default(),
        )
    }
}

impl Domain {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    /// Both the inline expression and every expression of a `{ ... }` block.
    pub fn expressions(&self) -> impl Iterator<Item = Expression> + '_ {
        self.0.children().filter_map(Expression::cast)
    }

    pub fn is_block(&self) -> bool {
        has_token(&self.0, SyntaxKind::BraceOpen)
    }
}

impl Expression {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.children().filter_map(Value::cast)
    }
}

/// Literal shape of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    String(String),
    Int(String),
    Float(String),
    Bool(bool),
    Ident(String),
}

impl Value {
    pub fn is_string(&self) -> bool {
        is_quoted(&self.0)
    }

    /// Numbers stay textual; range checks belong to the caller.
    pub fn kind(&self) -> Option<ValueKind> {
        if self.is_string() {
            let text = self
                .0
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .find(|t| t.kind() == SyntaxKind::StrVal)
                .map(|t| unescape(t.text()))
                .unwrap_or_default();
            return Some(ValueKind::String(text));
        }

        let token = self
            .0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())?;
        let text = token.text().to_string();
        match token.kind() {
            SyntaxKind::Int => Some(ValueKind::Int(text)),
            SyntaxKind::Float => Some(ValueKind::Float(text)),
            SyntaxKind::Id if text == keywords::TRUE => Some(ValueKind::Bool(true)),
            SyntaxKind::Id if text == keywords::FALSE => Some(ValueKind::Bool(false)),
            SyntaxKind::Id => Some(ValueKind::Ident(text)),
            _ => None,
        }
    }
}

impl StructDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn type_params(&self) -> Option<TypeParams> {
        self.0.children().find_map(TypeParams::cast)
    }

    pub fn extends(&self) -> Option<Extends> {
        self.0.children().find_map(Extends::cast)
    }

    pub fn members(&self) -> impl Iterator<Item = StructMember> + '_ {
        self.0.children().filter_map(StructMember::cast)
    }
}

impl Extends {
    /// Parents in declaration order.
    pub fn parents(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.0.children().filter_map(TypeRef::cast)
    }
}

impl AliasDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn type_params(&self) -> Option<TypeParams> {
        self.0.children().find_map(TypeParams::cast)
    }

    pub fn target(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }
}

impl DistinctDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn type_params(&self) -> Option<TypeParams> {
        self.0.children().find_map(TypeParams::cast)
    }

    pub fn base(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }
}

impl EnumDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn values(&self) -> impl Iterator<Item = EnumValueDef> + '_ {
        self.0.children().filter_map(EnumValueDef::cast)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }
}

impl EnumValueDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn value(&self) -> Option<Value> {
        self.0.children().find_map(Value::cast)
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }
}

impl TypeParams {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        self.0.children().filter_map(TypeParam::cast)
    }
}

impl TypeParam {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    /// `extends` bound. Type references before `=` are constraints.
    pub fn constraint(&self) -> Option<TypeRef> {
        self.split_refs().0
    }

    /// `= Default`.
    pub fn default(&self) -> Option<TypeRef> {
        self.split_refs().1
    }

    fn split_refs(&self) -> (Option<TypeRef>, Option<TypeRef>) {
        let mut constraint = None;
        let mut default = None;
        let mut after_equals = false;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::Equals => {
                    after_equals = true;
                }
                rowan::NodeOrToken::Node(n) => {
                    let Some(ty) = TypeRef::cast(n) else { continue };
                    let slot = if after_equals {
                        &mut default
                    } else {
                        &mut constraint
                    };
                    slot.get_or_insert(ty);
                }
                _ => {}
            }
        }
        (constraint, default)
    }
}

impl FieldDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    pub fn is_hard_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::QuestionQuestion)
    }

    /// Inline domains followed by those of the trailing block.
    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.children().filter_map(Domain::cast)
    }
}

impl FieldOmit {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }
}

impl TypeRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_id(&self.0)
    }

    pub fn type_args(&self) -> Option<TypeArgs> {
        self.0.children().find_map(TypeArgs::cast)
    }

    pub fn array_suffix(&self) -> Option<ArraySuffix> {
        self.0.children().find_map(ArraySuffix::cast)
    }
}

impl TypeArgs {
    pub fn args(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.0.children().filter_map(TypeRef::cast)
    }
}

impl ArraySuffix {
    /// Literal size of `T[N]`.
    pub fn size(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::Int)
    }
}
