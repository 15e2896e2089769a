//! Field unification across `extends` chains.
//!
//! Policy:
//! - parents are walked left to right, each flattened recursively first
//! - a name inherited from several parents keeps the first parent's field
//! - a field redeclared on the child replaces the inherited one in place,
//!   with domains merged (child expressions win)
//! - omitted names are dropped at every depth
//! - type arguments on an `extends` entry are substituted into the parent's
//!   parameter-typed fields

use indexmap::{IndexMap, IndexSet};

use crate::domain::merge_domains;
use crate::form::{Field, Form, StructForm};
use crate::table::{Table, Type};
use crate::type_ref::{TypeParam, TypeRef};

/// Parameter name to the concrete reference bound to it.
pub type Bindings = IndexMap<String, TypeRef>;

/// Flattened, ordered fields of a struct. Empty for other forms.
///
/// Parents missing from the table, or that are not structs, contribute nothing.
/// Inheritance cycles are cut at the first revisit.
pub fn unified_fields(ty: &Type, table: &Table) -> Vec<Field> {
    let mut path = IndexSet::new();
    unify(ty, table, &mut path)
}

fn unify(ty: &Type, table: &Table, path: &mut IndexSet<String>) -> Vec<Field> {
    let Form::Struct(form) = &ty.form else {
        return Vec::new();
    };
    if !path.insert(ty.qualified_name.clone()) {
        return Vec::new();
    }

    let mut fields: Vec<Field> = Vec::new();
    for parent_ref in &form.extends {
        for field in inherited_from(parent_ref, table, path) {
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(field);
            }
        }
    }

    for own in &form.fields {
        match fields.iter_mut().find(|f| f.name == own.name) {
            Some(slot) => {
                let domains = merge_domains(&slot.domains, &own.domains);
                *slot = Field {
                    domains,
                    ..own.clone()
                };
            }
            None => fields.push(own.clone()),
        }
    }

    fields.retain(|f| !form.is_field_omitted(&f.name));
    path.shift_remove(&ty.qualified_name);
    fields
}

fn inherited_from(parent_ref: &TypeRef, table: &Table, path: &mut IndexSet<String>) -> Vec<Field> {
    let Some(parent) = table.get(&parent_ref.name) else {
        return Vec::new();
    };
    let Form::Struct(parent_form) = &parent.form else {
        return Vec::new();
    };

    let mut fields = unify(parent, table, path);
    let bindings = bind_type_args(&parent_form.type_params, &parent_ref.type_args);
    if !bindings.is_empty() {
        for field in &mut fields {
            field.ty = substitute_type_ref(&field.ty, &bindings);
        }
    }
    fields
}

/// Pair parameters with supplied arguments, falling back to parameter defaults.
pub fn bind_type_args(params: &[TypeParam], args: &[TypeRef]) -> Bindings {
    params
        .iter()
        .enumerate()
        .filter_map(|(idx, param)| {
            let bound = args.get(idx).or(param.default.as_ref())?;
            Some((param.name.clone(), bound.clone()))
        })
        .collect()
}

/// Replace parameter references with their bindings, recursively through type arguments.
pub fn substitute_type_ref(ty: &TypeRef, bindings: &Bindings) -> TypeRef {
    if let Some(param) = &ty.type_param {
        return match bindings.get(param) {
            Some(bound) => bound.clone(),
            None => ty.clone(),
        };
    }
    TypeRef {
        type_args: ty
            .type_args
            .iter()
            .map(|arg| substitute_type_ref(arg, bindings))
            .collect(),
        ..ty.clone()
    }
}

/// Union of field names reachable through any parent of `form`.
pub fn inherited_field_names(form: &StructForm, table: &Table) -> IndexSet<String> {
    let mut path = IndexSet::new();
    form.extends
        .iter()
        .flat_map(|parent_ref| inherited_from(parent_ref, table, &mut path))
        .map(|field| field.name)
        .collect()
}
