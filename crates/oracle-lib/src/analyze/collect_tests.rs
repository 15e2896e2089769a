use indoc::indoc;
use oracle_core::{EnumLiteral, Form, Optionality, SourceId, Table, TablePrinter};

use crate::Diagnostics;
use crate::analyze::{FileContext, collect_file};
use crate::diagnostics::DiagnosticKind;
use crate::parser::parse;

fn collect(source: &str) -> (Table, Diagnostics, usize) {
    let parsed = parse(source, SourceId::new(0)).unwrap();
    assert!(parsed.diagnostics.is_empty(), "{}", parsed.diagnostics);

    let mut table = Table::new();
    let mut diag = Diagnostics::new();
    let ctx = FileContext {
        source: SourceId::new(0),
        namespace: "test",
        file_path: Some("test.oracle"),
    };
    let added = collect_file(&parsed.root, ctx, &mut table, &mut diag);
    (table, diag, added)
}

fn dump(table: &Table) -> String {
    TablePrinter::new(table).with_domains(true).dump()
}

#[test]
fn struct_fields_are_desugared() {
    let input = indoc! {r#"
    Range struct {
        key uuid @key
        labels uuid[]
        tags string[]?
        parent Range??
        grid float64[16]
        index map<string, int32>
    }
    "#};

    let (table, diag, added) = collect(input);
    assert!(diag.is_empty());
    assert_eq!(added, 1);
    insta::assert_snapshot!(dump(&table), @r"
    struct test.Range [key]
      key uuid @key
      labels Array<uuid>
      tags Array<string>?
      parent Range??
      grid Array<float64>[16]
      index Map<string, int32>
    ");

    let range = table.must_get("test.Range");
    assert_eq!(range.file_path.as_deref(), Some("test.oracle"));
    let form = range.form.as_struct().unwrap();
    let tags = form.field("tags").unwrap();
    assert!(tags.ty.is_array());
    assert_eq!(tags.optionality, Optionality::Optional);
    let labels = form.field("labels").unwrap();
    assert_eq!(labels.optionality, Optionality::Required);
    assert_eq!(labels.ty.type_args[0].name, "uuid");
}

#[test]
fn file_domains_merge_under_type_domains() {
    let input = indoc! {r#"
    @go output "core/pkg/ranger"
    @ts output "ranger"

    Range struct {
        key uuid
        @go output "override"
    }
    Status enum {
        active = 1
    }
    "#};

    let (table, diag, _) = collect(input);
    assert!(diag.is_empty());
    insta::assert_snapshot!(dump(&table), @r#"
    struct test.Range @go(output "override") @ts(output "ranger")
      key uuid
    enum test.Status (int) @go(output "core/pkg/ranger") @ts(output "ranger")
      active = 1
    "#);
}

#[test]
fn duplicate_type_keeps_first_definition() {
    let input = "Key uuid\nKey string\n";

    let (table, diag, added) = collect(input);
    assert_eq!(added, 1);
    insta::assert_snapshot!(diag.to_string(), @"error at 9..12: `test.Key` is already defined");
    let Form::Distinct(key) = &table.must_get("test.Key").form else {
        panic!("expected a distinct type");
    };
    assert_eq!(key.base.name, "uuid");
}

#[test]
fn duplicate_field_and_enum_value() {
    let input = indoc! {r#"
    User struct {
        name string
        name int32
    }
    Status enum {
        active = 1
        active = 2
    }
    "#};

    let (table, diag, _) = collect(input);
    insta::assert_snapshot!(diag.to_string(), @r"
    error at 34..38: field `name` is already declared
    error at 80..86: enum value `active` is already declared
    ");

    let user = table.must_get("test.User").form.as_struct().unwrap();
    assert_eq!(user.fields.len(), 1);
    assert_eq!(user.fields[0].ty.name, "string");
    let status = table.must_get("test.Status").form.as_enum().unwrap();
    assert_eq!(status.values.len(), 1);
    assert_eq!(status.values[0].int_value(), Some(1));
}

#[test]
fn mixed_enum_values_are_rejected() {
    let input = indoc! {r#"
    Status enum {
        active = 1
        failed = "failed"
    }
    "#};

    let (table, diag, _) = collect(input);
    assert!(diag.has_kind(DiagnosticKind::MixedEnumValues));
    let status = table.must_get("test.Status").form.as_enum().unwrap();
    assert!(status.is_int_enum);
    assert_eq!(status.values.len(), 1);
}

#[test]
fn string_enum() {
    let input = indoc! {r#"
    DataType enum {
        float32 = "float32"
        string = "string"
    }
    "#};

    let (table, diag, _) = collect(input);
    assert!(diag.is_empty());
    let data_type = table.must_get("test.DataType").form.as_enum().unwrap();
    assert!(!data_type.is_int_enum);
    assert_eq!(
        data_type.values[1].value,
        EnumLiteral::Str("string".to_string())
    );
}

#[test]
fn type_params_keep_raw_references() {
    let input = indoc! {r#"
    Status struct<D extends schema> {
        data D
    }
    Labels<T?> = map<string, T>
    "#};

    let (table, diag, _) = collect(input);
    assert!(diag.is_empty());
    insta::assert_snapshot!(dump(&table), @r"
    struct test.Status<D extends schema>
      data D
    alias test.Labels<T?> = Map<string, T>
    ");

    let status = table.must_get("test.Status").form.as_struct().unwrap();
    assert!(!status.fields[0].ty.is_type_param());
}

#[test]
fn field_block_domains_and_omissions() {
    let input = indoc! {r#"
    User struct extends Base {
        -age
        -age
        name string {
            @validate {
                required
                max_length 255
            }
        }
    }
    "#};

    let (table, diag, _) = collect(input);
    assert!(diag.is_empty());
    insta::assert_snapshot!(dump(&table), @r"
    struct test.User extends Base
      name string @validate(required, max_length 255)
      -age
    ");
}

#[test]
fn integer_out_of_range() {
    let input = "@meta size 99999999999999999999\n";

    let (_, diag, _) = collect(input);
    insta::assert_snapshot!(diag.to_string(), @"error at 11..31: expected a value: integer out of range");
}
