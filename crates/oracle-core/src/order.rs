//! Dependency ordering of types for generators that must emit dependencies first.

use indexmap::{IndexMap, IndexSet};

use crate::table::{Table, Type};

impl Table {
    /// Reorder `types` so every type comes after the types it references.
    ///
    /// Dependencies are field types (including nested type arguments), `extends`
    /// entries, alias targets and distinct bases. Only dependencies present in
    /// `types` constrain the order; independent types keep their input order and
    /// cycles are broken at the first revisit.
    pub fn topological_sort<'t>(&self, types: &[&'t Type]) -> Vec<&'t Type> {
        let by_name: IndexMap<&str, &'t Type> = types
            .iter()
            .map(|&ty| (ty.qualified_name.as_str(), ty))
            .collect();

        let mut sorter = TopoSorter {
            by_name: &by_name,
            visiting: IndexSet::new(),
            done: IndexSet::new(),
            sorted: Vec::with_capacity(types.len()),
        };
        for ty in types {
            sorter.visit(ty);
        }
        sorter.sorted
    }
}

/// Qualified names a type depends on, in declaration order, without duplicates.
pub fn dependencies(ty: &Type) -> IndexSet<&str> {
    let mut deps = IndexSet::new();
    for type_ref in ty.form.type_refs() {
        type_ref.walk(&mut |r| {
            if r.type_param.is_none() && r.name != ty.qualified_name {
                deps.insert(r.name.as_str());
            }
        });
    }
    deps
}

struct TopoSorter<'m, 't> {
    by_name: &'m IndexMap<&'t str, &'t Type>,
    visiting: IndexSet<&'t str>,
    done: IndexSet<&'t str>,
    sorted: Vec<&'t Type>,
}

impl<'t> TopoSorter<'_, 't> {
    fn visit(&mut self, ty: &'t Type) {
        let name = ty.qualified_name.as_str();
        if self.done.contains(name) || !self.visiting.insert(name) {
            return;
        }
        for dep in dependencies(ty) {
            if let Some(&dep_ty) = self.by_name.get(dep) {
                self.visit(dep_ty);
            }
        }
        self.visiting.shift_remove(name);
        self.done.insert(name);
        self.sorted.push(ty);
    }
}
