//! References to types, as written in fields, `extends` lists, alias targets
//! and distinct bases.
//!
//! A reference starts out holding the raw text (`label.Label`, `uuid`, `T`).
//! Resolution rewrites `name` into a key of the table (qualified name or
//! builtin tag), or clears it and sets `type_param` when the text names a
//! parameter of the enclosing type. Exactly one of the two is meaningful.

use std::fmt;

use serde::Serialize;

use crate::primitives::BuiltinGeneric;
use crate::source::Span;

#[derive(Debug, Clone, Serialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_param: Option<String>,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
            array_size: None,
            type_param: None,
            span: None,
        }
    }

    /// Back-reference to a parameter of the enclosing type.
    pub fn param(name: impl Into<String>) -> Self {
        Self {
            type_param: Some(name.into()),
            ..Self::named("")
        }
    }

    /// `T[]` / `T[N]` desugared.
    pub fn array(element: TypeRef, size: Option<i64>) -> Self {
        Self {
            type_args: vec![element],
            array_size: size,
            ..Self::named(BuiltinGeneric::Array.name())
        }
    }

    /// `map<K, V>` desugared.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self {
            type_args: vec![key, value],
            ..Self::named(BuiltinGeneric::Map.name())
        }
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.type_args = args;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_type_param(&self) -> bool {
        self.type_param.is_some()
    }

    pub fn is_array(&self) -> bool {
        self.type_param.is_none() && self.name == BuiltinGeneric::Array.name()
    }

    pub fn is_map(&self) -> bool {
        self.type_param.is_none() && self.name == BuiltinGeneric::Map.name()
    }

    /// Splits `ns.Name` into its namespace and name. Unqualified names have no namespace.
    pub fn split_name(&self) -> (Option<&str>, &str) {
        match self.name.split_once('.') {
            Some((namespace, name)) => (Some(namespace), name),
            None => (None, &self.name),
        }
    }

    /// Visit this reference and every nested type argument, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TypeRef)) {
        f(self);
        for arg in &self.type_args {
            arg.walk(f);
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_args == other.type_args
            && self.array_size == other.array_size
            && self.type_param == other.type_param
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(param) = &self.type_param {
            return f.write_str(param);
        }
        f.write_str(&self.name)?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        if let Some(size) = self.array_size {
            write!(f, "[{}]", size)?;
        }
        Ok(())
    }
}

/// Generic parameter declared by a struct, alias or distinct type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParam {
    pub name: String,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            constraint: None,
            default: None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A parameter that callers must supply an argument for.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, " extends {}", constraint)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
