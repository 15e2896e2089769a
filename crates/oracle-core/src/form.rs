//! The closed set of shapes a declared type can take.

use serde::Serialize;

use crate::domain::Domains;
use crate::primitives::{BuiltinGeneric, Primitive};
use crate::source::Span;
use crate::type_ref::{TypeParam, TypeRef};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Form {
    Struct(StructForm),
    Enum(EnumForm),
    Alias(AliasForm),
    Distinct(DistinctForm),
    Builtin { generic: BuiltinGeneric },
    Primitive { primitive: Primitive },
}

impl Form {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Form::Struct(_) => "struct",
            Form::Enum(_) => "enum",
            Form::Alias(_) => "alias",
            Form::Distinct(_) => "distinct",
            Form::Builtin { .. } => "builtin",
            Form::Primitive { .. } => "primitive",
        }
    }

    pub fn as_struct(&self) -> Option<&StructForm> {
        match self {
            Form::Struct(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructForm> {
        match self {
            Form::Struct(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumForm> {
        match self {
            Form::Enum(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Form::Primitive { primitive } => Some(*primitive),
            _ => None,
        }
    }

    pub fn type_params(&self) -> &[TypeParam] {
        match self {
            Form::Struct(form) => &form.type_params,
            Form::Alias(form) => &form.type_params,
            Form::Distinct(form) => &form.type_params,
            Form::Enum(_) | Form::Builtin { .. } | Form::Primitive { .. } => &[],
        }
    }

    /// Every type reference held by this form, including parameter constraints
    /// and defaults.
    pub fn type_refs(&self) -> Vec<&TypeRef> {
        let mut refs = Vec::new();
        for param in self.type_params() {
            refs.extend(param.constraint.iter());
            refs.extend(param.default.iter());
        }
        match self {
            Form::Struct(form) => {
                refs.extend(form.extends.iter());
                refs.extend(form.fields.iter().map(|f| &f.ty));
            }
            Form::Alias(form) => refs.push(&form.target),
            Form::Distinct(form) => refs.push(&form.base),
            Form::Enum(_) | Form::Builtin { .. } | Form::Primitive { .. } => {}
        }
        refs
    }

    /// Mutable counterpart of [`Form::type_refs`].
    pub fn type_refs_mut(&mut self) -> Vec<&mut TypeRef> {
        let mut refs = Vec::new();
        let (params, rest): (&mut Vec<TypeParam>, Vec<&mut TypeRef>) = match self {
            Form::Struct(form) => (
                &mut form.type_params,
                form.extends
                    .iter_mut()
                    .chain(form.fields.iter_mut().map(|f| &mut f.ty))
                    .collect(),
            ),
            Form::Alias(form) => (&mut form.type_params, vec![&mut form.target]),
            Form::Distinct(form) => (&mut form.type_params, vec![&mut form.base]),
            Form::Enum(_) | Form::Builtin { .. } | Form::Primitive { .. } => return refs,
        };
        for param in params.iter_mut() {
            refs.extend(param.constraint.iter_mut());
            refs.extend(param.default.iter_mut());
        }
        refs.extend(rest);
        refs
    }
}

/// Field optionality. `?` and `??` are exclusive, not additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Optionality {
    #[default]
    Required,
    Optional,
    HardOptional,
}

impl Optionality {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Required => "",
            Self::Optional => "?",
            Self::HardOptional => "??",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub domains: Domains,
    pub optionality: Optionality,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            domains: Domains::new(),
            optionality: Optionality::Required,
            span: None,
        }
    }

    pub fn with_optionality(mut self, optionality: Optionality) -> Self {
        self.optionality = optionality;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optionality == Optionality::Optional
    }

    pub fn is_hard_optional(&self) -> bool {
        self.optionality == Optionality::HardOptional
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructForm {
    pub type_params: Vec<TypeParam>,
    pub fields: Vec<Field>,
    pub extends: Vec<TypeRef>,
    pub omitted_fields: Vec<String>,
    pub has_key_domain: bool,
    pub is_recursive: bool,
}

impl StructForm {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn type_param(&self, name: &str) -> Option<&TypeParam> {
        self.type_params.iter().find(|p| p.name == name)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn has_extends(&self) -> bool {
        !self.extends.is_empty()
    }

    pub fn is_field_omitted(&self, name: &str) -> bool {
        self.omitted_fields.iter().any(|f| f == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumLiteral {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub value: EnumLiteral,
    pub domains: Domains,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: EnumLiteral) -> Self {
        Self {
            name: name.into(),
            value,
            domains: Domains::new(),
            span: None,
        }
    }

    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            EnumLiteral::Int(v) => Some(v),
            EnumLiteral::Str(_) => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            EnumLiteral::Str(s) => Some(s),
            EnumLiteral::Int(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnumForm {
    /// Decided by the first value's literal kind.
    pub is_int_enum: bool,
    pub values: Vec<EnumValue>,
}

impl EnumForm {
    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Transparent rename: `Name = Target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasForm {
    pub target: TypeRef,
    pub type_params: Vec<TypeParam>,
}

/// Nominal wrapper: `Name Base`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctForm {
    pub base: TypeRef,
    pub type_params: Vec<TypeParam>,
}
