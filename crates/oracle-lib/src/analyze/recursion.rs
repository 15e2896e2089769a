//! Recursive type detection.
//!
//! A struct is recursive when one of its unified fields reaches the struct
//! again, directly or through other structs' fields, type arguments included
//! (`children Array<Node>`). Aliases and distinct types are seen through.
//! The flag only informs generators that need indirection; nothing is
//! reported.

use indexmap::IndexSet;
use oracle_core::{Form, Table, Type, TypeRef, unified_fields};
use tracing::debug;

use super::collect::KEY_DOMAIN;

/// Set `is_recursive` and `has_key_domain` on every declared struct.
///
/// The key flag is recomputed over unified fields so inherited `@key` fields count.
pub fn detect_recursive_types(table: &mut Table) {
    let mut flags = Vec::new();
    for id in table.user_type_ids() {
        let ty = table.by_id(id);
        if !matches!(ty.form, Form::Struct(_)) {
            continue;
        }
        let is_recursive = reaches(ty, &ty.qualified_name, table, &mut IndexSet::new());
        let has_key_domain = unified_fields(ty, table)
            .iter()
            .any(|f| f.domains.contains_key(KEY_DOMAIN));
        flags.push((id, is_recursive, has_key_domain));
    }

    let mut recursive = 0;
    for (id, is_recursive, has_key_domain) in flags {
        if let Form::Struct(form) = &mut table.by_id_mut(id).form {
            form.is_recursive = is_recursive;
            form.has_key_domain = has_key_domain;
        }
        recursive += usize::from(is_recursive);
    }
    debug!(recursive, "detected recursive types");
}

/// Whether `ty` leads to `target` through struct fields, alias targets or
/// distinct bases. `visited` holds types already expanded on this search.
fn reaches(ty: &Type, target: &str, table: &Table, visited: &mut IndexSet<String>) -> bool {
    if !visited.insert(ty.qualified_name.clone()) {
        return false;
    }
    match &ty.form {
        Form::Struct(_) => unified_fields(ty, table)
            .iter()
            .any(|field| ref_reaches(&field.ty, target, table, visited)),
        Form::Alias(alias) => ref_reaches(&alias.target, target, table, visited),
        Form::Distinct(distinct) => ref_reaches(&distinct.base, target, table, visited),
        Form::Enum(_) | Form::Builtin { .. } | Form::Primitive { .. } => false,
    }
}

fn ref_reaches(ty: &TypeRef, target: &str, table: &Table, visited: &mut IndexSet<String>) -> bool {
    if ty.type_args.iter().any(|arg| ref_reaches(arg, target, table, visited)) {
        return true;
    }
    if ty.is_type_param() {
        return false;
    }
    if ty.name == target {
        return true;
    }
    // Unresolved references are skipped.
    match table.get(&ty.name) {
        Some(next) => reaches(next, target, table, visited),
        None => false,
    }
}
