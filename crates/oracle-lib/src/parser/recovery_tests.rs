use indoc::indoc;
use oracle_core::SourceId;

use crate::Error;
use crate::diagnostics::DiagnosticKind;
use crate::parser::{ParseResult, dump_cst, parse, parse_with_limits};

fn parse_with_errors(input: &str) -> ParseResult {
    let result = parse(input, SourceId::new(0)).unwrap();
    assert!(result.diagnostics.has_errors());
    // Lossless even when malformed
    assert_eq!(result.root.as_cst().text().to_string(), input);
    result
}

#[test]
fn unclosed_struct_body() {
    let input = indoc! {r#"
    Range struct {
        key uuid
    "#};

    let result = parse_with_errors(input);
    insta::assert_snapshot!(result.diagnostics.to_string(), @"error at 13..28: missing closing `}` (related: block started here at 13..14)");
}

#[test]
fn unclosed_type_args() {
    let input = "Labels = Map<string, int32";

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::UnclosedAngle));
}

#[test]
fn missing_definition_kind() {
    let input = indoc! {r#"
    Orphan
    Key uuid
    "#};

    let result = parse_with_errors(input);
    insta::assert_snapshot!(result.diagnostics.to_string(), @"error at 0..6: expected a definition: `Orphan` needs `struct`, `enum`, `=` or a base type (hint: e.g., `Name struct { ... }` or `Name enum { ... }`)");
    assert_eq!(result.root.definitions().count(), 1);
}

#[test]
fn garbage_at_top_level_recovers() {
    let input = indoc! {r#"
    $$$
    Key uuid
    "#};

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::ExpectedDefinition));
    assert_eq!(result.root.definitions().count(), 1);
}

#[test]
fn field_without_type() {
    let input = indoc! {r#"
    Range struct {
        name
        key uuid
    }
    "#};

    let result = parse_with_errors(input);
    insta::assert_snapshot!(result.diagnostics.to_string(), @"error at 28..31: expected a type: after field name");
    insta::assert_snapshot!(dump_cst(result.root.as_cst(), false), @r#"
    Root
      StructDef
        Id "Range"
        Id "struct"
        BraceOpen "{"
        FieldDef
          Id "name"
        FieldDef
          Id "key"
          TypeRef
            Id "uuid"
        BraceClose "}"
    "#);
}

#[test]
fn stray_token_in_struct_body() {
    let input = indoc! {r#"
    Range struct {
        = 1
        key uuid
    }
    "#};

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::UnexpectedToken));
    let errors = result.diagnostics.error_count();
    assert_eq!(errors, 1);
}

#[test]
fn enum_value_needs_literal() {
    let input = indoc! {r#"
    Status enum {
        active = on
        inactive = 0
    }
    "#};

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::ExpectedValue));
}

#[test]
fn stray_minus_in_enum_does_not_hang() {
    let input = "Status enum { - }";

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::UnexpectedToken));
}

#[test]
fn omission_without_name() {
    let input = "Child struct extends Parent { - }";

    let result = parse_with_errors(input);
    assert!(result.diagnostics.has_kind(DiagnosticKind::ExpectedIdent));
}

#[test]
fn import_without_path_is_a_definition() {
    let input = "import uuid";

    let result = parse(input, SourceId::new(0)).unwrap();
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.root.imports().count(), 0);
    assert_eq!(result.root.definitions().count(), 1);
}

#[test]
fn exec_fuel_exhausted() {
    let input = "Key uuid\nName string\n";

    let result = parse_with_limits(input, SourceId::new(0), 2, 64);
    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn recursion_limit_exceeded() {
    let input = "Deep = Array<Array<Array<Array<int32>>>>";

    let result = parse_with_limits(input, SourceId::new(0), 1_000, 3);
    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));
}
