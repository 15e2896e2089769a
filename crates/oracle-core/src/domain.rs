//! Domains: named metadata blocks attached to files, types, fields and enum values.
//!
//! A domain is a list of expressions (`@validate { required  max_length 255 }`).
//! The analyzer does not interpret them; it only merges them:
//! when two domains share a name, the overriding side's expressions replace the
//! base side's expressions of the same name, everything else accumulates.

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;
use serde::Serialize;

/// Domains keyed by name, in declaration order.
pub type Domains = IndexMap<String, Domain>;

/// Literal value attached to an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpressionValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(String),
}

impl ExpressionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ExpressionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Ident(s) => f.write_str(s),
        }
    }
}

/// `name value*` inside a domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub name: String,
    pub values: Vec<ExpressionValue>,
}

impl Expression {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: ExpressionValue) -> Self {
        self.values.push(value);
        self
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

/// Ordered expressions of a domain. Names are not unique until merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Expressions(Vec<Expression>);

impl Expressions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, expression: Expression) {
        self.0.push(expression);
    }

    /// First expression with the given name.
    pub fn find(&self, name: &str) -> Option<&Expression> {
        self.0.iter().find(|e| e.name == name)
    }

    pub fn into_vec(self) -> Vec<Expression> {
        self.0
    }
}

impl Deref for Expressions {
    type Target = [Expression];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Expression> for Expressions {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Expressions {
    type Item = &'a Expression;
    type IntoIter = std::slice::Iter<'a, Expression>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    pub name: String,
    pub expressions: Expressions,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expressions: Expressions::new(),
        }
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Merge `self` over `base`.
    ///
    /// Expressions of `base` keep their position unless `self` declares one with
    /// the same name, in which case all of `self`'s same-named expressions take
    /// that position. Expressions only `self` declares are appended.
    pub fn merge(&self, base: &Domain) -> Domain {
        let mut merged = Expressions::new();
        let mut taken: HashSet<&str> = HashSet::new();

        for expression in &base.expressions {
            if self.expressions.find(&expression.name).is_none() {
                merged.push(expression.clone());
                continue;
            }
            if taken.insert(expression.name.as_str()) {
                for own in self.expressions.iter().filter(|e| e.name == expression.name) {
                    merged.push(own.clone());
                }
            }
        }

        for expression in &self.expressions {
            if !taken.contains(expression.name.as_str()) {
                merged.push(expression.clone());
            }
        }

        Domain {
            name: self.name.clone(),
            expressions: merged,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.expressions.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, expression) in self.expressions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", expression)?;
        }
        f.write_str(")")
    }
}

/// Merge `overriding` over `base`, domain by domain.
pub fn merge_domains(base: &Domains, overriding: &Domains) -> Domains {
    let mut merged = base.clone();
    for (name, domain) in overriding {
        let combined = match base.get(name) {
            Some(existing) => domain.merge(existing),
            None => domain.clone(),
        };
        merged.insert(name.clone(), combined);
    }
    merged
}

/// Insert a domain, merging it over an earlier one with the same name.
pub fn insert_domain(domains: &mut Domains, domain: Domain) {
    let combined = match domains.get(&domain.name) {
        Some(existing) => domain.merge(existing),
        None => domain,
    };
    domains.insert(combined.name.clone(), combined);
}
