#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Oracle schemas.
//!
//! The [`Table`] owns every type of one analysis run. Types have a closed
//! [`Form`]; references between them are [`TypeRef`]s keyed by qualified name,
//! so later passes can mutate forms in place through the table.
//!
//! ```
//! use oracle_core::{Field, Form, StructForm, Table, Type, TypeRef, unified_fields};
//!
//! let mut table = Table::new();
//! let form = StructForm {
//!     fields: vec![Field::new("key", TypeRef::named("uuid"))],
//!     ..StructForm::default()
//! };
//! table.add(Type::new("ranger", "Range", Form::Struct(form))).unwrap();
//!
//! let range = table.lookup("ranger", "Range").unwrap();
//! assert_eq!(unified_fields(range, &table).len(), 1);
//! ```

pub mod domain;
pub mod form;
pub mod inheritance;
pub mod order;
pub mod primitives;
pub mod printer;
pub mod source;
pub mod table;
pub mod type_ref;

#[cfg(test)]
mod table_tests;

pub use domain::{
    Domain, Domains, Expression, ExpressionValue, Expressions, insert_domain, merge_domains,
};
pub use form::{
    AliasForm, DistinctForm, EnumForm, EnumLiteral, EnumValue, Field, Form, Optionality,
    StructForm,
};
pub use inheritance::{
    Bindings, bind_type_args, inherited_field_names, substitute_type_ref, unified_fields,
};
pub use primitives::{
    BuiltinGeneric, Primitive, is_number_primitive, is_primitive, is_string_primitive,
};
pub use printer::TablePrinter;
pub use source::{SourceId, Span};
pub use table::{Table, TableError, Type, TypeId, qualify};
pub use type_ref::{TypeParam, TypeRef};
