use crate::domain::{Domain, Domains};
use crate::form::{AliasForm, DistinctForm, EnumForm, Form, StructForm};
use crate::primitives::{BuiltinGeneric, Primitive};
use crate::table::{Table, TableError, Type};
use crate::type_ref::TypeRef;

fn struct_type(namespace: &str, name: &str) -> Type {
    Type::new(namespace, name, Form::Struct(StructForm::default()))
}

fn filtered_table() -> Table {
    let mut table = Table::new();
    table.add(struct_type("auth", "User")).unwrap();
    table
        .add(Type::new("auth", "Status", Form::Enum(EnumForm::default())))
        .unwrap();
    table
        .add(Type::new(
            "auth",
            "UserID",
            Form::Distinct(DistinctForm {
                base: TypeRef::named("uuid"),
                type_params: Vec::new(),
            }),
        ))
        .unwrap();
    table
        .add(Type::new(
            "auth",
            "StringAlias",
            Form::Alias(AliasForm {
                target: TypeRef::named("string"),
                type_params: Vec::new(),
            }),
        ))
        .unwrap();
    table.add(struct_type("other", "Other")).unwrap();
    table
}

fn names(types: Vec<&Type>) -> Vec<&str> {
    types.into_iter().map(|ty| ty.name.as_str()).collect()
}

#[test]
fn registers_primitives() {
    let table = Table::new();
    for primitive in Primitive::ALL {
        let ty = table.get(primitive.name()).unwrap();
        assert_eq!(ty.form, Form::Primitive { primitive });
    }
    assert!(table.is_empty());
}

#[test]
fn registers_builtin_generics() {
    let table = Table::new();
    assert_eq!(
        table.get("Array").map(|ty| &ty.form),
        Some(&Form::Builtin {
            generic: BuiltinGeneric::Array
        })
    );
    assert_eq!(
        table.get("Map").map(|ty| &ty.form),
        Some(&Form::Builtin {
            generic: BuiltinGeneric::Map
        })
    );
}

#[test]
fn add_and_get() {
    let mut table = Table::new();
    table.add(struct_type("auth", "User")).unwrap();

    let ty = table.get("auth.User").unwrap();
    assert_eq!(ty.name, "User");
    assert_eq!(ty.namespace, "auth");
    assert_eq!(table.len(), 1);
}

#[test]
fn add_rejects_duplicate() {
    let mut table = Table::new();
    table.add(struct_type("auth", "User")).unwrap();

    let err = table.add(struct_type("auth", "User")).unwrap_err();

    assert_eq!(err, TableError::DuplicateType("auth.User".into()));
    assert!(err.to_string().contains("duplicate type"));
}

#[test]
fn get_missing() {
    let table = Table::new();
    assert!(table.get("nonexistent.Type").is_none());
}

#[test]
#[should_panic(expected = "not found")]
fn must_get_panics_when_missing() {
    Table::new().must_get("nonexistent.Type");
}

#[test]
fn lookup_by_namespace_and_name() {
    let mut table = Table::new();
    table.add(struct_type("auth", "User")).unwrap();

    assert_eq!(
        table.lookup("auth", "User").map(|ty| ty.qualified_name.as_str()),
        Some("auth.User")
    );
    assert_eq!(
        table.lookup("auth", "string").map(|ty| ty.name.as_str()),
        Some("string")
    );
    assert!(table.lookup("auth", "NonExistent").is_none());
    assert!(table.lookup("other", "User").is_none());
}

#[test]
fn ids_address_the_arena() {
    let mut table = Table::new();
    let id = table.add(struct_type("auth", "User")).unwrap();

    assert_eq!(table.id_of("auth.User"), Some(id));
    assert_eq!(table.by_id(id).name, "User");
    assert_eq!(table.user_type_ids(), vec![id]);
}

#[test]
fn kind_filters() {
    let table = filtered_table();

    assert_eq!(names(table.struct_types()), ["User", "Other"]);
    assert_eq!(names(table.enum_types()), ["Status"]);
    assert_eq!(names(table.distinct_types()), ["UserID"]);
    assert_eq!(names(table.alias_types()), ["StringAlias"]);
}

#[test]
fn namespace_filters() {
    let table = filtered_table();

    assert_eq!(table.types_in_namespace("auth").len(), 4);
    assert_eq!(names(table.structs_in_namespace("auth")), ["User"]);
    assert_eq!(names(table.enums_in_namespace("auth")), ["Status"]);
    assert!(table.types_in_namespace("missing").is_empty());
    assert_eq!(table.namespaces().collect::<Vec<_>>(), ["auth", "other"]);
}

#[test]
fn domain_filter() {
    let mut table = filtered_table();
    let mut domains = Domains::new();
    domains.insert("go".into(), Domain::new("go"));
    table
        .add(struct_type("pkg", "WithGo").with_domains(domains))
        .unwrap();

    assert_eq!(names(table.types_with_domain("go")), ["WithGo"]);
}

#[test]
fn primitive_checks() {
    let table = Table::new();

    assert!(table.is_primitive_type("string"));
    assert!(table.is_primitive_type("uuid"));
    assert!(!table.is_primitive_type("auth.User"));
    assert!(!table.is_primitive_type("Array"));

    assert!(table.is_string_primitive_type("uuid"));
    assert!(!table.is_string_primitive_type("bool"));

    assert!(table.is_number_primitive_type("uint32"));
    assert!(table.is_number_primitive_type("float64"));
    assert!(!table.is_number_primitive_type("bool"));
}

#[test]
fn import_tracking() {
    let mut table = Table::new();

    assert!(!table.is_imported("schema/core/label"));
    assert!(table.mark_imported("schema/core/label"));
    assert!(!table.mark_imported("schema/core/label"));
    assert!(table.is_imported("schema/core/label"));
    assert!(!table.is_imported("schema/core/channel"));
}

#[test]
fn json_export_skips_builtins() {
    let mut table = Table::new();
    table.add(struct_type("auth", "User")).unwrap();

    let json: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();

    let types = json.as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["qualified_name"], "auth.User");
    assert_eq!(types[0]["form"]["form"], "struct");
}
