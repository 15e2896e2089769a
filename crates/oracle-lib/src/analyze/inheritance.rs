//! Inheritance validation.
//!
//! Runs on resolved `extends` lists, per struct:
//! - every parent is a declared struct
//! - no struct extends itself
//! - generic parents get at least their required type arguments
//! - no cycle through any parent edge
//! - every `-field` omission names an inherited field

use indexmap::IndexSet;
use oracle_core::{Form, StructForm, Table, Type, TypeRef, inherited_field_names};
use rowan::TextRange;
use tracing::debug;

use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

pub fn validate_inheritance(table: &Table, diag: &mut Diagnostics) {
    let mut validator = InheritanceValidator {
        table,
        diag,
        in_reported_cycle: IndexSet::new(),
    };
    for ty in table.user_types() {
        if let Form::Struct(form) = &ty.form {
            validator.validate_struct(ty, form);
        }
    }
}

struct InheritanceValidator<'a, 'd> {
    table: &'a Table,
    diag: &'d mut Diagnostics,
    /// Members of cycles already reported, so a cycle is reported once.
    in_reported_cycle: IndexSet<String>,
}

impl<'a> InheritanceValidator<'a, '_> {
    fn validate_struct(&mut self, ty: &'a Type, form: &'a StructForm) {
        if !form.has_extends() {
            self.check_omissions(ty, form, true);
            return;
        }

        let mut parents_ok = true;
        let mut extends_self = false;
        for (idx, parent_ref) in form.extends.iter().enumerate() {
            let position = idx + 1;
            let range = self.range_of(ty, parent_ref);

            if parent_ref.name == ty.qualified_name {
                extends_self = true;
                parents_ok = false;
                self.report(ty, DiagnosticKind::SelfExtension, range, &ty.name);
                continue;
            }

            let Some(parent) = self.table.get(&parent_ref.name) else {
                parents_ok = false;
                let detail = format!("`{}` (parent {})", parent_ref.name, position);
                self.report(ty, DiagnosticKind::UnresolvedParent, range, &detail);
                continue;
            };

            let Form::Struct(parent_form) = &parent.form else {
                parents_ok = false;
                let detail = format!(
                    "`{}` is declared as {} (parent {})",
                    parent_ref.name,
                    parent.form.kind_name(),
                    position
                );
                self.report(ty, DiagnosticKind::NonStructParent, range, &detail);
                continue;
            };

            self.check_arity(ty, parent, parent_form, parent_ref, range);
        }

        if !extends_self {
            self.check_cycle(ty);
        }
        self.check_omissions(ty, form, parents_ok);
    }

    fn check_arity(
        &mut self,
        ty: &Type,
        parent: &Type,
        parent_form: &StructForm,
        parent_ref: &TypeRef,
        range: TextRange,
    ) {
        let given = parent_ref.type_args.len();
        let required = parent_form
            .type_params
            .iter()
            .filter(|p| p.is_required())
            .count();
        // Surplus arguments are never substituted.
        if given >= required {
            return;
        }
        let detail = format!(
            "`{}` extends `{}` with {} type arguments, but {} are required",
            ty.name, parent.name, given, required
        );
        self.report(ty, DiagnosticKind::GenericArity, range, &detail);
    }

    fn check_cycle(&mut self, ty: &'a Type) {
        if self.in_reported_cycle.contains(&ty.qualified_name) {
            return;
        }
        let mut path = vec![ty.qualified_name.as_str()];
        let mut visited = IndexSet::new();
        let Some(cycle) = self.find_cycle(ty, &mut path, &mut visited) else {
            return;
        };

        debug!(start = %ty.qualified_name, length = cycle.len(), "inheritance cycle");
        let chain = cycle.join(" -> ");
        self.in_reported_cycle
            .extend(cycle.iter().map(|name| name.to_string()));
        let range = ty.span.map(|s| s.range).unwrap_or_default();
        self.report(ty, DiagnosticKind::CircularInheritance, range, &chain);
    }

    /// Depth-first walk over every parent edge. Returns the path back to the
    /// start, start included at both ends.
    fn find_cycle(
        &self,
        current: &'a Type,
        path: &mut Vec<&'a str>,
        visited: &mut IndexSet<&'a str>,
    ) -> Option<Vec<&'a str>> {
        let Form::Struct(form) = &current.form else {
            return None;
        };
        for parent_ref in &form.extends {
            let Some(parent) = self.table.get(&parent_ref.name) else {
                continue;
            };
            let name = parent.qualified_name.as_str();
            if Some(&name) == path.first() {
                let mut cycle = path.clone();
                cycle.push(name);
                return Some(cycle);
            }
            // A cycle not through the start is reported from one of its members.
            if path.contains(&name) || !visited.insert(name) {
                continue;
            }
            path.push(name);
            let found = self.find_cycle(parent, path, visited);
            path.pop();
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn check_omissions(&mut self, ty: &Type, form: &StructForm, parents_ok: bool) {
        if form.omitted_fields.is_empty() || !parents_ok {
            return;
        }
        let inherited = inherited_field_names(form, self.table);
        let range = ty.span.map(|s| s.range).unwrap_or_default();
        for name in &form.omitted_fields {
            if !inherited.contains(name) {
                self.report(ty, DiagnosticKind::OmitUnknownField, range, name);
            }
        }
    }

    fn range_of(&self, ty: &Type, parent_ref: &TypeRef) -> TextRange {
        parent_ref
            .span
            .or(ty.span)
            .map(|s| s.range)
            .unwrap_or_default()
    }

    /// Types built outside a source fall back to the default source id.
    fn report(&mut self, ty: &Type, kind: DiagnosticKind, range: TextRange, detail: &str) {
        let source = ty.span.map(|s| s.source).unwrap_or_default();
        self.diag.report(source, kind, range).message(detail).emit();
    }
}
