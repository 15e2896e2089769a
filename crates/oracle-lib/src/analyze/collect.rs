//! Collection: one parsed file into table entries.
//!
//! File-level domains are merged first and copied under every type's own
//! domains. Definitions that clash with an existing qualified name are
//! reported and skipped; the rest of the file still lands in the table.
//! Type references are stored raw and resolved by a later pass.

use oracle_core::{
    AliasForm, DistinctForm, Domain, Domains, EnumForm, EnumLiteral, EnumValue, Expression,
    ExpressionValue, Field, Form, Optionality, SourceId, Span, StructForm, Table, TableError,
    Type, TypeParam, TypeRef, insert_domain, merge_domains,
};
use rowan::TextRange;
use tracing::{debug, trace};

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;
use crate::parser::SyntaxToken;
use crate::parser::ast::{self, Definition, StructMember, ValueKind};
use crate::parser::cst::keywords;

/// Name of the domain that marks a struct as keyed.
pub(crate) const KEY_DOMAIN: &str = "key";

/// Where a collected file lives.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub source: SourceId,
    pub namespace: &'a str,
    pub file_path: Option<&'a str>,
}

/// Add every definition of `root` to `table`. Returns the number of types added.
pub fn collect_file(
    root: &ast::Root,
    ctx: FileContext<'_>,
    table: &mut Table,
    diag: &mut Diagnostics,
) -> usize {
    let mut collector = Collector {
        ctx,
        table,
        diag,
        file_domains: Domains::new(),
    };
    collector.collect(root)
}

struct Collector<'a, 'd> {
    ctx: FileContext<'a>,
    table: &'a mut Table,
    diag: &'d mut Diagnostics,
    file_domains: Domains,
}

impl Collector<'_, '_> {
    fn collect(&mut self, root: &ast::Root) -> usize {
        for node in root.domains() {
            if let Some(domain) = self.domain(&node) {
                insert_domain(&mut self.file_domains, domain);
            }
        }

        let mut added = 0;
        for def in root.definitions() {
            let Some(ty) = self.definition(&def) else {
                continue;
            };
            let name_range = ty
                .span
                .map(|s| s.range)
                .unwrap_or_else(|| def.as_cst().text_range());
            match self.table.add(ty) {
                Ok(_) => added += 1,
                Err(TableError::DuplicateType(qualified)) => {
                    self.diag
                        .report(self.ctx.source, DiagnosticKind::DuplicateType, name_range)
                        .message(qualified)
                        .emit();
                }
            }
        }

        debug!(
            namespace = self.ctx.namespace,
            types = added,
            file_domains = self.file_domains.len(),
            "collected file"
        );
        added
    }

    fn definition(&mut self, def: &Definition) -> Option<Type> {
        let name = def.name()?;
        let (form, own_domains) = match def {
            Definition::Struct(node) => self.struct_form(node),
            Definition::Enum(node) => self.enum_form(node),
            Definition::Alias(node) => {
                let target = self.type_ref(&node.target()?)?;
                let form = AliasForm {
                    target,
                    type_params: self.type_params(node.type_params()),
                };
                (Form::Alias(form), self.domains(node.domains()))
            }
            Definition::Distinct(node) => {
                let base = self.type_ref(&node.base()?)?;
                let form = DistinctForm {
                    base,
                    type_params: self.type_params(node.type_params()),
                };
                (Form::Distinct(form), self.domains(node.domains()))
            }
        };

        trace!(name = name.text(), form = form.kind_name(), "definition");
        let mut ty = Type::new(self.ctx.namespace, name.text(), form)
            .with_domains(merge_domains(&self.file_domains, &own_domains))
            .with_span(self.span(name.text_range()));
        if let Some(path) = self.ctx.file_path {
            ty = ty.with_file_path(path);
        }
        Some(ty)
    }

    fn struct_form(&mut self, node: &ast::StructDef) -> (Form, Domains) {
        let mut form = StructForm {
            type_params: self.type_params(node.type_params()),
            ..StructForm::default()
        };
        if let Some(extends) = node.extends() {
            form.extends = extends
                .parents()
                .filter_map(|parent| self.type_ref(&parent))
                .collect();
        }

        let mut domains = Domains::new();
        for member in node.members() {
            match member {
                StructMember::Field(field_node) => {
                    let Some(field) = self.field(&field_node) else {
                        continue;
                    };
                    if form.field(&field.name).is_some() {
                        self.report_name(DiagnosticKind::DuplicateField, &field_node.name());
                        continue;
                    }
                    form.fields.push(field);
                }
                StructMember::Omit(omit) => {
                    let Some(name) = omit.name() else { continue };
                    if !form.is_field_omitted(name.text()) {
                        form.omitted_fields.push(name.text().to_owned());
                    }
                }
                StructMember::Domain(domain_node) => {
                    if let Some(domain) = self.domain(&domain_node) {
                        insert_domain(&mut domains, domain);
                    }
                }
            }
        }

        form.has_key_domain = form
            .fields
            .iter()
            .any(|f| f.domains.contains_key(KEY_DOMAIN));
        (Form::Struct(form), domains)
    }

    fn field(&mut self, node: &ast::FieldDef) -> Option<Field> {
        let name = node.name()?;
        let ty = self.type_ref(&node.type_ref()?)?;
        let optionality = if node.is_hard_optional() {
            Optionality::HardOptional
        } else if node.is_optional() {
            Optionality::Optional
        } else {
            Optionality::Required
        };

        let mut field = Field::new(name.text(), ty).with_optionality(optionality);
        field.domains = self.domains(node.domains());
        field.span = Some(self.span(name.text_range()));
        Some(field)
    }

    fn enum_form(&mut self, node: &ast::EnumDef) -> (Form, Domains) {
        let mut form = EnumForm::default();
        for value_node in node.values() {
            let Some(name) = value_node.name() else {
                continue;
            };
            let Some(value) = value_node.value() else {
                continue;
            };
            let Some(literal) = self.enum_literal(&value) else {
                continue;
            };

            if form.value(name.text()).is_some() {
                self.report_name(DiagnosticKind::DuplicateEnumValue, &Some(name));
                continue;
            }

            let is_int = matches!(literal, EnumLiteral::Int(_));
            if form.values.is_empty() {
                form.is_int_enum = is_int;
            } else if form.is_int_enum != is_int {
                let expected = if form.is_int_enum { "integers" } else { "strings" };
                self.diag
                    .report(self.ctx.source, DiagnosticKind::MixedEnumValues, value.text_range())
                    .message(format!("earlier values are {}", expected))
                    .emit();
                continue;
            }

            let mut enum_value = EnumValue::new(name.text(), literal);
            enum_value.domains = self.domains(value_node.domains());
            enum_value.span = Some(self.span(name.text_range()));
            form.values.push(enum_value);
        }

        (Form::Enum(form), self.domains(node.domains()))
    }

    fn enum_literal(&mut self, value: &ast::Value) -> Option<EnumLiteral> {
        match value.kind()? {
            ValueKind::Int(text) => match text.parse() {
                Ok(v) => Some(EnumLiteral::Int(v)),
                Err(_) => {
                    self.report_value(value, "integer out of range");
                    None
                }
            },
            ValueKind::String(s) => Some(EnumLiteral::Str(s)),
            // The parser already rejected anything else.
            _ => None,
        }
    }

    fn type_params(&mut self, node: Option<ast::TypeParams>) -> Vec<TypeParam> {
        let Some(node) = node else {
            return Vec::new();
        };
        node.params()
            .filter_map(|param_node| {
                let name = param_node.name()?;
                let mut param = TypeParam::new(name.text());
                param.optional = param_node.is_optional();
                param.constraint = param_node.constraint().and_then(|c| self.type_ref(&c));
                param.default = param_node.default().and_then(|d| self.type_ref(&d));
                Some(param)
            })
            .collect()
    }

    /// Raw reference, with `T[]`, `T[N]` and `map<K, V>` desugared.
    fn type_ref(&mut self, node: &ast::TypeRef) -> Option<TypeRef> {
        let name = node.name()?;
        let args: Vec<TypeRef> = node
            .type_args()
            .map(|list| list.args().filter_map(|arg| self.type_ref(&arg)).collect())
            .unwrap_or_default();
        let span = self.span(node.text_range());

        let mut ty = if name.text() == keywords::MAP {
            match <[TypeRef; 2]>::try_from(args) {
                Ok([key, value]) => TypeRef::map(key, value),
                Err(args) => TypeRef::named(name.text()).with_args(args),
            }
        } else {
            TypeRef::named(name.text()).with_args(args)
        };
        ty = ty.with_span(span);

        if let Some(suffix) = node.array_suffix() {
            let size = suffix.size().and_then(|token| self.array_size(&token));
            ty = TypeRef::array(ty, size).with_span(span);
        }
        Some(ty)
    }

    fn array_size(&mut self, token: &SyntaxToken) -> Option<i64> {
        match token.text().parse::<i64>() {
            Ok(size) if size >= 0 => Some(size),
            _ => {
                self.diag
                    .report(self.ctx.source, DiagnosticKind::ExpectedValue, token.text_range())
                    .message("array size must be a non-negative integer")
                    .emit();
                None
            }
        }
    }

    fn domains(&mut self, nodes: impl Iterator<Item = ast::Domain>) -> Domains {
        let mut domains = Domains::new();
        for node in nodes {
            if let Some(domain) = self.domain(&node) {
                insert_domain(&mut domains, domain);
            }
        }
        domains
    }

    fn domain(&mut self, node: &ast::Domain) -> Option<Domain> {
        let name = node.name()?;
        let mut domain = Domain::new(name.text());
        for expression_node in node.expressions() {
            if let Some(expression) = self.expression(&expression_node) {
                domain.expressions.push(expression);
            }
        }
        Some(domain)
    }

    fn expression(&mut self, node: &ast::Expression) -> Option<Expression> {
        let name = node.name()?;
        let mut expression = Expression::new(name.text());
        for value in node.values() {
            let Some(kind) = value.kind() else { continue };
            let converted = match kind {
                ValueKind::String(s) => ExpressionValue::String(s),
                ValueKind::Int(text) => match text.parse() {
                    Ok(v) => ExpressionValue::Int(v),
                    Err(_) => {
                        self.report_value(&value, "integer out of range");
                        continue;
                    }
                },
                ValueKind::Float(text) => match text.parse() {
                    Ok(v) => ExpressionValue::Float(v),
                    Err(_) => {
                        self.report_value(&value, "malformed number");
                        continue;
                    }
                },
                ValueKind::Bool(b) => ExpressionValue::Bool(b),
                ValueKind::Ident(ident) => ExpressionValue::Ident(ident),
            };
            expression = expression.with_value(converted);
        }
        Some(expression)
    }

    fn report_name(&mut self, kind: DiagnosticKind, name: &Option<SyntaxToken>) {
        let Some(name) = name else { return };
        self.diag
            .report(self.ctx.source, kind, name.text_range())
            .message(name.text())
            .emit();
    }

    fn report_value(&mut self, value: &ast::Value, msg: &str) {
        self.diag
            .report(self.ctx.source, DiagnosticKind::ExpectedValue, value.text_range())
            .message(msg)
            .emit();
    }

    fn span(&self, range: TextRange) -> Span {
        Span::new(self.ctx.source, range)
    }
}
