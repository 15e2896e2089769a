//! Resolution table: every type of one analysis run, keyed by qualified name.
//!
//! Types live in an insertion-ordered arena. [`TypeId`] is the arena index, so
//! passes can hold ids while re-borrowing the table mutably.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::domain::Domains;
use crate::form::Form;
use crate::primitives::{BuiltinGeneric, Primitive};
use crate::source::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate type `{0}`")]
    DuplicateType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub name: String,
    pub namespace: String,
    pub qualified_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub form: Form,
    pub domains: Domains,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl Type {
    /// Builtins have an empty namespace and are keyed by their bare name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, form: Form) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let qualified_name = qualify(&namespace, &name);
        Self {
            name,
            namespace,
            qualified_name,
            file_path: None,
            form,
            domains: Domains::new(),
            span: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_domains(mut self, domains: Domains) -> Self {
        self.domains = domains;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.form, Form::Builtin { .. } | Form::Primitive { .. })
    }
}

pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", namespace, name)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    types: IndexMap<String, Type>,
    namespaces: IndexMap<String, Vec<TypeId>>,
    imported: IndexSet<String>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates a table with primitives and builtin generics registered.
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for primitive in Primitive::ALL {
            let ty = Type::new("", primitive.name(), Form::Primitive { primitive });
            types.insert(ty.qualified_name.clone(), ty);
        }
        for generic in BuiltinGeneric::ALL {
            let ty = Type::new("", generic.name(), Form::Builtin { generic });
            types.insert(ty.qualified_name.clone(), ty);
        }
        Self {
            types,
            namespaces: IndexMap::new(),
            imported: IndexSet::new(),
        }
    }

    pub fn add(&mut self, ty: Type) -> Result<TypeId, TableError> {
        if self.types.contains_key(&ty.qualified_name) {
            return Err(TableError::DuplicateType(ty.qualified_name));
        }
        let id = TypeId(self.types.len() as u32);
        self.namespaces
            .entry(ty.namespace.clone())
            .or_default()
            .push(id);
        self.types.insert(ty.qualified_name.clone(), ty);
        Ok(id)
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Type> {
        self.types.get(qualified_name)
    }

    pub fn get_mut(&mut self, qualified_name: &str) -> Option<&mut Type> {
        self.types.get_mut(qualified_name)
    }

    /// Like [`Table::get`], for callers that already know the type exists.
    ///
    /// # Panics
    ///
    /// Panics if no type has this qualified name.
    pub fn must_get(&self, qualified_name: &str) -> &Type {
        match self.types.get(qualified_name) {
            Some(ty) => ty,
            None => panic!("type `{}` not found in table", qualified_name),
        }
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.types.contains_key(qualified_name)
    }

    pub fn id_of(&self, qualified_name: &str) -> Option<TypeId> {
        self.types
            .get_index_of(qualified_name)
            .map(|idx| TypeId(idx as u32))
    }

    pub fn by_id(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn by_id_mut(&mut self, id: TypeId) -> &mut Type {
        &mut self.types[id.index()]
    }

    /// `namespace.name`, falling back to builtins keyed by bare name.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&Type> {
        self.types
            .get(&qualify(namespace, name))
            .or_else(|| self.types.get(name).filter(|ty| ty.is_builtin()))
    }

    /// Every type, builtins first, then declarations in insertion order.
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    /// Declared (non-builtin) types in insertion order.
    pub fn user_types(&self) -> impl Iterator<Item = &Type> {
        self.types.values().filter(|ty| !ty.is_builtin())
    }

    /// Ids of declared types in insertion order.
    pub fn user_type_ids(&self) -> Vec<TypeId> {
        self.types
            .values()
            .enumerate()
            .filter(|(_, ty)| !ty.is_builtin())
            .map(|(idx, _)| TypeId(idx as u32))
            .collect()
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.user_types().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn types_in_namespace(&self, namespace: &str) -> Vec<&Type> {
        self.namespaces
            .get(namespace)
            .map(|ids| ids.iter().map(|&id| self.by_id(id)).collect())
            .unwrap_or_default()
    }

    pub fn struct_types(&self) -> Vec<&Type> {
        self.user_types()
            .filter(|ty| matches!(ty.form, Form::Struct(_)))
            .collect()
    }

    pub fn enum_types(&self) -> Vec<&Type> {
        self.user_types()
            .filter(|ty| matches!(ty.form, Form::Enum(_)))
            .collect()
    }

    pub fn distinct_types(&self) -> Vec<&Type> {
        self.user_types()
            .filter(|ty| matches!(ty.form, Form::Distinct(_)))
            .collect()
    }

    pub fn alias_types(&self) -> Vec<&Type> {
        self.user_types()
            .filter(|ty| matches!(ty.form, Form::Alias(_)))
            .collect()
    }

    pub fn structs_in_namespace(&self, namespace: &str) -> Vec<&Type> {
        self.types_in_namespace(namespace)
            .into_iter()
            .filter(|ty| matches!(ty.form, Form::Struct(_)))
            .collect()
    }

    pub fn enums_in_namespace(&self, namespace: &str) -> Vec<&Type> {
        self.types_in_namespace(namespace)
            .into_iter()
            .filter(|ty| matches!(ty.form, Form::Enum(_)))
            .collect()
    }

    pub fn types_with_domain(&self, domain: &str) -> Vec<&Type> {
        self.user_types()
            .filter(|ty| ty.domains.contains_key(domain))
            .collect()
    }

    pub fn is_primitive_type(&self, name: &str) -> bool {
        self.primitive(name).is_some()
    }

    pub fn is_string_primitive_type(&self, name: &str) -> bool {
        self.primitive(name).is_some_and(Primitive::is_string)
    }

    pub fn is_number_primitive_type(&self, name: &str) -> bool {
        self.primitive(name).is_some_and(Primitive::is_number)
    }

    fn primitive(&self, name: &str) -> Option<Primitive> {
        self.types.get(name).and_then(|ty| ty.form.as_primitive())
    }

    /// Import paths are normalized by the caller; the table compares them verbatim.
    pub fn is_imported(&self, path: &str) -> bool {
        self.imported.contains(path)
    }

    /// Returns `false` if the path was already marked.
    pub fn mark_imported(&mut self, path: &str) -> bool {
        self.imported.insert(path.to_owned())
    }

    pub fn imported(&self) -> impl Iterator<Item = &str> {
        self.imported.iter().map(String::as_str)
    }

    /// JSON export of declared types, for downstream generators.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let types: Vec<&Type> = self.user_types().collect();
        serde_json::to_string_pretty(&types)
    }
}
