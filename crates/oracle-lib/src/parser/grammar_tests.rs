use indoc::indoc;
use oracle_core::SourceId;

use crate::parser::ast::{Definition, StructMember, ValueKind};
use crate::parser::{ParseResult, dump_cst, parse};

fn parse_ok(input: &str) -> ParseResult {
    let result = parse(input, SourceId::new(0)).unwrap();
    assert!(result.diagnostics.is_empty(), "{}", result.diagnostics);
    result
}

fn cst(input: &str) -> String {
    dump_cst(parse_ok(input).root.as_cst(), false)
}

#[test]
fn struct_with_fields() {
    let input = indoc! {r#"
    Range struct {
        key uuid @key
        labels uuid[]
        tags string[]?
        parent Range??
    }
    "#};

    insta::assert_snapshot!(cst(input), @r#"
    Root
      StructDef
        Id "Range"
        Id "struct"
        BraceOpen "{"
        FieldDef
          Id "key"
          TypeRef
            Id "uuid"
          Domain
            At "@"
            Id "key"
        FieldDef
          Id "labels"
          TypeRef
            Id "uuid"
            ArraySuffix
              BracketOpen "["
              BracketClose "]"
        FieldDef
          Id "tags"
          TypeRef
            Id "string"
            ArraySuffix
              BracketOpen "["
              BracketClose "]"
          Question "?"
        FieldDef
          Id "parent"
          TypeRef
            Id "Range"
          QuestionQuestion "??"
        BraceClose "}"
    "#);
}

#[test]
fn imports_file_domains_and_enums() {
    let input = indoc! {r#"
    import "schema/core/label"

    @go output "core/pkg/ranger"

    Status enum {
        active = 1
        inactive = 2 @doc value "gone"
    }
    "#};

    insta::assert_snapshot!(cst(input), @r#"
    Root
      Import
        Id "import"
        DoubleQuote "\""
        StrVal "schema/core/label"
        DoubleQuote "\""
      Domain
        At "@"
        Id "go"
        Expression
          Id "output"
          Value
            DoubleQuote "\""
            StrVal "core/pkg/ranger"
            DoubleQuote "\""
      EnumDef
        Id "Status"
        Id "enum"
        BraceOpen "{"
        EnumValueDef
          Id "active"
          Equals "="
          Value
            Int "1"
        EnumValueDef
          Id "inactive"
          Equals "="
          Value
            Int "2"
          Domain
            At "@"
            Id "doc"
            Expression
              Id "value"
              Value
                DoubleQuote "\""
                StrVal "gone"
                DoubleQuote "\""
        BraceClose "}"
    "#);
}

#[test]
fn generics_extends_alias_and_distinct() {
    let input = indoc! {r#"
    Status struct<D extends schema> {
        data D
    }
    RackStatus struct extends Status<Details>, base.Base {
        -age
    }
    Key uuid
    Labels = map<string, label.Label[]>
    "#};

    insta::assert_snapshot!(cst(input), @r#"
    Root
      StructDef
        Id "Status"
        Id "struct"
        TypeParams
          AngleOpen "<"
          TypeParam
            Id "D"
            Id "extends"
            TypeRef
              Id "schema"
          AngleClose ">"
        BraceOpen "{"
        FieldDef
          Id "data"
          TypeRef
            Id "D"
        BraceClose "}"
      StructDef
        Id "RackStatus"
        Id "struct"
        Extends
          Id "extends"
          TypeRef
            Id "Status"
            TypeArgs
              AngleOpen "<"
              TypeRef
                Id "Details"
              AngleClose ">"
          Comma ","
          TypeRef
            Id "base.Base"
        BraceOpen "{"
        FieldOmit
          Minus "-"
          Id "age"
        BraceClose "}"
      DistinctDef
        Id "Key"
        TypeRef
          Id "uuid"
      AliasDef
        Id "Labels"
        Equals "="
        TypeRef
          Id "map"
          TypeArgs
            AngleOpen "<"
            TypeRef
              Id "string"
            Comma ","
            TypeRef
              Id "label.Label"
              ArraySuffix
                BracketOpen "["
                BracketClose "]"
            AngleClose ">"
    "#);
}

#[test]
fn field_block_and_struct_domain() {
    let input = indoc! {r#"
    User struct {
        name string {
            @validate {
                required
                max_length 255
            }
        }

        @index {
            composite name created_at sorted
        }
    }
    "#};

    insta::assert_snapshot!(cst(input), @r#"
    Root
      StructDef
        Id "User"
        Id "struct"
        BraceOpen "{"
        FieldDef
          Id "name"
          TypeRef
            Id "string"
          BraceOpen "{"
          Domain
            At "@"
            Id "validate"
            BraceOpen "{"
            Expression
              Id "required"
            Expression
              Id "max_length"
              Value
                Int "255"
            BraceClose "}"
          BraceClose "}"
        Domain
          At "@"
          Id "index"
          BraceOpen "{"
          Expression
            Id "composite"
            Value
              Id "name"
            Value
              Id "created_at"
            Value
              Id "sorted"
          BraceClose "}"
        BraceClose "}"
    "#);
}

#[test]
fn inline_domain_stops_at_line_end() {
    let input = indoc! {r#"
    Range struct {
        name string @validate required
        key uuid
    }
    "#};

    let result = parse_ok(input);
    let Some(Definition::Struct(range)) = result.root.definitions().next() else {
        panic!("expected a struct");
    };
    let fields: Vec<_> = range
        .members()
        .filter_map(|m| match m {
            StructMember::Field(f) => Some(f),
            _ => None,
        })
        .collect();
    assert_eq!(fields.len(), 2);

    let domains: Vec<_> = fields[0].domains().collect();
    assert_eq!(domains.len(), 1);
    let expressions: Vec<_> = domains[0].expressions().collect();
    assert_eq!(expressions.len(), 1);
    assert_eq!(expressions[0].name().unwrap().text(), "required");
    assert_eq!(expressions[0].values().count(), 0);
    assert_eq!(fields[1].name().unwrap().text(), "key");
}

#[test]
fn keywords_as_names() {
    let input = indoc! {r#"
    DataType enum {
        float32 = "float32"
        struct = "struct"
    }
    import struct {
        enum string
    }
    "#};

    let result = parse_ok(input);
    let names: Vec<_> = result
        .root
        .definitions()
        .map(|d| d.name().unwrap().text().to_string())
        .collect();
    assert_eq!(names, ["DataType", "import"]);

    let Some(Definition::Enum(data_type)) = result.root.definitions().next() else {
        panic!("expected an enum");
    };
    let values: Vec<_> = data_type
        .values()
        .map(|v| v.value().unwrap().kind().unwrap())
        .collect();
    assert_eq!(
        values,
        [
            ValueKind::String("float32".into()),
            ValueKind::String("struct".into())
        ]
    );
}

#[test]
fn type_param_constraint_and_default() {
    let input = "Box<T? extends json = string> = Array<T>";

    let result = parse_ok(input);
    let Some(Definition::Alias(alias)) = result.root.definitions().next() else {
        panic!("expected an alias");
    };
    let param = alias.type_params().unwrap().params().next().unwrap();
    assert_eq!(param.name().unwrap().text(), "T");
    assert!(param.is_optional());
    let constraint = param.constraint().unwrap();
    assert_eq!(constraint.name().unwrap().text(), "json");
    let default = param.default().unwrap();
    assert_eq!(default.name().unwrap().text(), "string");
    assert_eq!(alias.target().unwrap().name().unwrap().text(), "Array");
}

#[test]
fn expression_values() {
    let input = r#"@meta tags "a" 42 -1.5 true off pkg.Name"#;

    let result = parse_ok(input);
    let domain = result.root.domains().next().unwrap();
    let expression = domain.expressions().next().unwrap();
    let values: Vec<_> = expression.values().map(|v| v.kind().unwrap()).collect();
    assert_eq!(
        values,
        [
            ValueKind::String("a".into()),
            ValueKind::Int("42".into()),
            ValueKind::Float("-1.5".into()),
            ValueKind::Bool(true),
            ValueKind::Ident("off".into()),
            ValueKind::Ident("pkg.Name".into()),
        ]
    );
}

#[test]
fn distinct_with_domain_block_and_sized_array() {
    let input = indoc! {r#"
    Name string {
        @validate max_length 64
    }
    Matrix = float64[16]
    "#};

    insta::assert_snapshot!(cst(input), @r#"
    Root
      DistinctDef
        Id "Name"
        TypeRef
          Id "string"
        BraceOpen "{"
        Domain
          At "@"
          Id "validate"
          Expression
            Id "max_length"
            Value
              Int "64"
        BraceClose "}"
      AliasDef
        Id "Matrix"
        Equals "="
        TypeRef
          Id "float64"
          ArraySuffix
            BracketOpen "["
            Int "16"
            BracketClose "]"
    "#);
}

#[test]
fn trivia_is_preserved() {
    let input = "// header\nKey uuid /* id */\n";

    let result = parse_ok(input);
    assert_eq!(result.root.as_cst().text().to_string(), input);
    insta::assert_snapshot!(dump_cst(result.root.as_cst(), true), @r#"
    Root
      LineComment "// header"
      Newline "\n"
      DistinctDef
        Id "Key"
        Whitespace " "
        TypeRef
          Id "uuid"
      Whitespace " "
      BlockComment "/* id */"
      Newline "\n"
    "#);
}

#[test]
fn fuel_is_reported() {
    let result = parse_ok("Key uuid");
    assert_eq!(result.fuel_consumed, 2);
}
