use indoc::indoc;
use oracle_core::{Field, Form, SourceId, StructForm, Table, TablePrinter, Type, TypeRef};

use crate::Diagnostics;
use crate::analyze::{FileContext, collect_file, resolve_type_refs};
use crate::diagnostics::DiagnosticKind;
use crate::parser::parse;

/// Collect `(namespace, source)` pairs into one table, then resolve it.
fn resolve(files: &[(&str, &str)]) -> (Table, Diagnostics) {
    let mut table = Table::new();
    let mut diag = Diagnostics::new();
    for (idx, (namespace, source)) in files.iter().enumerate() {
        let id = SourceId::new(idx as u32);
        let parsed = parse(source, id).unwrap();
        assert!(parsed.diagnostics.is_empty(), "{}", parsed.diagnostics);
        let ctx = FileContext {
            source: id,
            namespace,
            file_path: None,
        };
        collect_file(&parsed.root, ctx, &mut table, &mut diag);
    }
    resolve_type_refs(&mut table, &mut diag);
    (table, diag)
}

#[test]
fn local_and_imported_names_are_qualified() {
    let label = indoc! {r#"
    Label struct {
        name string
    }
    "#};
    let ranger = indoc! {r#"
    Range struct {
        key uuid
        labels label.Label[]
        parent Range?
    }
    "#};

    let (table, diag) = resolve(&[("label", label), ("ranger", ranger)]);
    assert!(diag.is_empty(), "{}", diag);
    insta::assert_snapshot!(TablePrinter::new(&table).namespace("ranger").dump(), @r"
    struct ranger.Range
      key uuid
      labels Array<label.Label>
      parent ranger.Range?
    ");
}

#[test]
fn type_parameters_become_back_references() {
    let input = indoc! {r#"
    Status struct<D extends schema> {
        data D
        items D[]
    }
    "#};

    let (table, diag) = resolve(&[("test", input)]);
    insta::assert_snapshot!(diag.to_string(), @"warning at 24..30: constraint `schema` is not defined");
    assert!(diag.is_ok());

    let status = table.must_get("test.Status").form.as_struct().unwrap();
    let data = &status.fields[0].ty;
    assert_eq!(data.type_param.as_deref(), Some("D"));
    assert!(data.name.is_empty());
    let items = &status.fields[1].ty;
    assert_eq!(items.name, "Array");
    assert_eq!(items.type_args[0].type_param.as_deref(), Some("D"));
}

#[test]
fn unresolved_reference_is_a_warning() {
    let input = indoc! {r#"
    Range struct {
        owner user.User
    }
    "#};

    let (table, diag) = resolve(&[("test", input)]);
    assert!(diag.has_kind(DiagnosticKind::UnresolvedType));
    assert!(!diag.has_errors());
    let range = table.must_get("test.Range").form.as_struct().unwrap();
    assert_eq!(range.fields[0].ty.name, "user.User");
}

#[test]
fn nested_type_arguments_resolve() {
    let input = indoc! {r#"
    Range struct {
        key uuid
    }
    Lookup = map<string, Range[]>
    "#};

    let (table, diag) = resolve(&[("test", input)]);
    assert!(diag.is_empty(), "{}", diag);
    insta::assert_snapshot!(TablePrinter::new(&table).dump(), @r"
    struct test.Range
      key uuid
    alias test.Lookup = Map<string, Array<test.Range>>
    ");
}

#[test]
fn resolution_is_idempotent() {
    let input = indoc! {r#"
    Node struct<T> {
        value T
        children Node<T>[]
    }
    Tree = Node<string>
    "#};

    let (mut table, mut diag) = resolve(&[("test", input)]);
    let once = TablePrinter::new(&table).dump();
    resolve_type_refs(&mut table, &mut diag);
    assert_eq!(TablePrinter::new(&table).dump(), once);
    assert!(diag.is_empty(), "{}", diag);
}

#[test]
fn unresolved_parent_is_left_to_validation() {
    let input = indoc! {r#"
    Child struct extends Missing {
        name string
    }
    "#};

    let (_, diag) = resolve(&[("test", input)]);
    assert!(diag.is_empty());
}

#[test]
fn builtins_shadow_declarations() {
    let input = indoc! {r#"
    uuid struct {
        raw bytes
    }
    Range struct {
        key uuid
        own test.uuid
    }
    "#};

    let (table, diag) = resolve(&[("test", input)]);
    assert!(diag.is_empty(), "{}", diag);
    let range = table.must_get("test.Range").form.as_struct().unwrap();
    assert_eq!(range.fields[0].ty.name, "uuid");
    assert_eq!(range.fields[1].ty.name, "test.uuid");
}

#[test]
fn unresolved_without_span_is_still_reported() {
    let form = StructForm {
        fields: vec![Field::new("owner", TypeRef::named("Missing"))],
        ..StructForm::default()
    };
    let mut table = Table::new();
    table
        .add(Type::new("test", "Range", Form::Struct(form)))
        .unwrap();

    let mut diag = Diagnostics::new();
    resolve_type_refs(&mut table, &mut diag);
    insta::assert_snapshot!(diag.to_string(), @"warning at 0..0: `Missing` is not defined");
}
