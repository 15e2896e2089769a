//! Reference resolution: raw names into table keys.
//!
//! For every reference held by a declared type:
//! 1. Already a parameter back-reference: left alone.
//! 2. Unqualified name of one of the owner's type parameters: becomes a
//!    back-reference.
//! 3. Otherwise an unqualified builtin (`uuid`, `Array`) keeps its tag, and
//!    anything else is looked up as `namespace.Name` (the owner's namespace
//!    when the name has none) and rewritten to the found qualified name.
//!
//! Misses are warnings and leave the raw name in place. Top-level `extends`
//! entries are not reported here; inheritance validation owns those.
//! Resolution is idempotent, so running it over the whole table after every
//! file is collected gives the same result as running it per namespace.

use oracle_core::{Form, Span, Table, TypeParam, TypeRef};
use tracing::{debug, trace};

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

/// What a reference is used for, which decides how a miss is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Reference,
    Constraint,
    Parent,
}

/// Resolve every reference of every declared type in place.
pub fn resolve_type_refs(table: &mut Table, diag: &mut Diagnostics) {
    let mut unresolved = 0;
    for id in table.user_type_ids() {
        let form = {
            let ty = table.by_id(id);
            let mut resolver = Resolver {
                table: &*table,
                diag: &mut *diag,
                namespace: &ty.namespace,
                params: ty.form.type_params(),
                owner_span: ty.span,
                unresolved: 0,
            };
            let mut form = ty.form.clone();
            resolver.resolve_form(&mut form);
            unresolved += resolver.unresolved;
            form
        };
        table.by_id_mut(id).form = form;
    }
    debug!(unresolved, "resolved type references");
}

struct Resolver<'a, 'd> {
    table: &'a Table,
    diag: &'d mut Diagnostics,
    namespace: &'a str,
    params: &'a [TypeParam],
    owner_span: Option<Span>,
    unresolved: usize,
}

impl Resolver<'_, '_> {
    fn resolve_form(&mut self, form: &mut Form) {
        match form {
            Form::Struct(s) => {
                self.resolve_params(&mut s.type_params);
                for parent in &mut s.extends {
                    self.resolve(parent, Role::Parent);
                }
                for field in &mut s.fields {
                    self.resolve(&mut field.ty, Role::Reference);
                }
            }
            Form::Alias(a) => {
                self.resolve_params(&mut a.type_params);
                self.resolve(&mut a.target, Role::Reference);
            }
            Form::Distinct(d) => {
                self.resolve_params(&mut d.type_params);
                self.resolve(&mut d.base, Role::Reference);
            }
            Form::Enum(_) | Form::Builtin { .. } | Form::Primitive { .. } => {}
        }
    }

    fn resolve_params(&mut self, params: &mut [TypeParam]) {
        for param in params {
            if let Some(constraint) = &mut param.constraint {
                self.resolve(constraint, Role::Constraint);
            }
            if let Some(default) = &mut param.default {
                self.resolve(default, Role::Reference);
            }
        }
    }

    fn resolve(&mut self, ty: &mut TypeRef, role: Role) {
        if ty.type_param.is_none() {
            if !ty.name.contains('.') && self.params.iter().any(|p| p.name == ty.name) {
                trace!(param = %ty.name, "type parameter reference");
                ty.type_param = Some(std::mem::take(&mut ty.name));
            } else if let Some(qualified) = self.lookup(ty) {
                trace!(reference = %ty.name, resolved = %qualified, "resolved reference");
                ty.name = qualified;
            } else if role != Role::Parent {
                self.report_unresolved(ty, role);
            }
        }

        let arg_role = match role {
            Role::Constraint => Role::Constraint,
            Role::Reference | Role::Parent => Role::Reference,
        };
        for arg in &mut ty.type_args {
            self.resolve(arg, arg_role);
        }
    }

    fn lookup(&self, ty: &TypeRef) -> Option<String> {
        let found = match ty.split_name() {
            (Some(namespace), name) => self.table.lookup(namespace, name),
            // Builtins shadow same-named declarations.
            (None, name) => self
                .table
                .get(name)
                .filter(|t| t.is_builtin())
                .or_else(|| self.table.lookup(self.namespace, name)),
        }?;
        Some(found.qualified_name.clone())
    }

    fn report_unresolved(&mut self, ty: &TypeRef, role: Role) {
        self.unresolved += 1;
        let (source, range) = ty
            .span
            .or(self.owner_span)
            .map(|span| (span.source, span.range))
            .unwrap_or_default();
        let kind = match role {
            Role::Constraint => DiagnosticKind::UnresolvedConstraint,
            Role::Reference | Role::Parent => DiagnosticKind::UnresolvedType,
        };
        self.diag
            .report(source, kind, range)
            .message(&ty.name)
            .emit();
    }
}
