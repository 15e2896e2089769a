use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::{
    BODY_RECOVERY, OPTIONAL_MARKERS, ROOT_RECOVERY, STRING_START,
};
use crate::parser::cst::{SyntaxKind, TokenSet, keywords};

const STRUCT_MEMBER_RECOVERY: TokenSet = BODY_RECOVERY.union(TokenSet::new(&[SyntaxKind::Id]));
const ENUM_MEMBER_RECOVERY: TokenSet =
    TokenSet::new(&[SyntaxKind::BraceClose, SyntaxKind::At, SyntaxKind::Id]);

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        while !self.should_stop() {
            if self.currently_is(SyntaxKind::At) {
                self.parse_domain();
                continue;
            }

            // LL(2): `import` followed by a string, otherwise `import` names a type
            if self.currently_is_keyword(keywords::IMPORT)
                && STRING_START.contains(self.peek_nth(1))
            {
                self.parse_import();
                continue;
            }

            if self.currently_is(SyntaxKind::Id) {
                self.parse_definition();
                continue;
            }

            self.error_until_next_item();
        }

        self.eat_trivia();
        self.finish_node();
    }

    fn error_until_next_item(&mut self) {
        if self.should_stop() {
            return;
        }

        self.start_node(SyntaxKind::Error);
        self.error(DiagnosticKind::ExpectedDefinition);
        while !self.should_stop() && !self.currently_is_one_of(ROOT_RECOVERY) {
            self.bump();
            self.buffer_trivia();
        }
        self.finish_node();
    }

    /// `import "path"`
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::Import);
        self.bump();
        self.parse_string();
        self.finish_node();
    }

    /// Dispatch on what follows the name: `struct`, `enum`, `=` or a base type.
    fn parse_definition(&mut self) {
        let checkpoint = self.checkpoint();
        let name_span = self.current_span();
        let name = self.current_text();
        self.bump();

        if self.currently_is_keyword(keywords::STRUCT) {
            self.start_node_at(checkpoint, SyntaxKind::StructDef);
            self.bump();
            self.parse_struct_rest();
            self.finish_node();
            return;
        }

        if self.currently_is_keyword(keywords::ENUM) {
            self.start_node_at(checkpoint, SyntaxKind::EnumDef);
            self.bump();
            self.parse_enum_body();
            self.finish_node();
            return;
        }

        let has_params = self.currently_is(SyntaxKind::AngleOpen);
        if has_params {
            self.parse_type_params();
        }

        if self.currently_is(SyntaxKind::Equals) {
            self.start_node_at(checkpoint, SyntaxKind::AliasDef);
            self.bump();
            self.parse_type_ref();
            self.parse_domain_block();
            self.finish_node();
            return;
        }

        if self.currently_is(SyntaxKind::Id) && (has_params || !self.at_line_start()) {
            self.start_node_at(checkpoint, SyntaxKind::DistinctDef);
            self.parse_type_ref();
            self.parse_domain_block();
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::Error);
        self.diagnostics
            .report(self.source_id, DiagnosticKind::ExpectedDefinition, name_span)
            .message(format!(
                "`{}` needs `struct`, `enum`, `=` or a base type",
                name
            ))
            .emit();
        self.finish_node();
    }

    /// After `Name struct`: type parameters, parents, body.
    fn parse_struct_rest(&mut self) {
        if self.currently_is(SyntaxKind::AngleOpen) {
            self.parse_type_params();
        }

        if self.currently_is_keyword(keywords::EXTENDS) {
            self.start_node(SyntaxKind::Extends);
            self.bump();
            self.parse_type_ref();
            while self.eat_token(SyntaxKind::Comma) {
                self.parse_type_ref();
            }
            self.finish_node();
        }

        if !self.open_delimiter(SyntaxKind::BraceOpen, "`{` to open the struct body") {
            return;
        }

        while !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            match self.current() {
                SyntaxKind::At => self.parse_domain(),
                SyntaxKind::Minus => self.parse_field_omit(),
                SyntaxKind::Id => self.parse_field(),
                _ => self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "expected a field, an omission or a domain",
                    STRUCT_MEMBER_RECOVERY,
                ),
            }
        }
        self.close_delimiter(SyntaxKind::BraceClose);
    }

    /// `name Type?? @domain ... { @domain ... }`
    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::FieldDef);
        self.bump();

        if self.currently_is(SyntaxKind::Id) && !self.at_line_start() {
            self.parse_type_ref();
        } else {
            self.error_msg(DiagnosticKind::ExpectedTypeRef, "after field name");
            self.finish_node();
            return;
        }

        if self.currently_is_one_of(OPTIONAL_MARKERS) {
            self.bump();
        }

        self.parse_inline_domains();
        if !self.at_line_start() {
            self.parse_domain_block();
        }
        self.finish_node();
    }

    /// `-name`
    fn parse_field_omit(&mut self) {
        self.start_node(SyntaxKind::FieldOmit);
        self.bump();
        if !self.eat_token(SyntaxKind::Id) {
            self.error_msg(DiagnosticKind::ExpectedIdent, "field name after `-`");
        }
        self.finish_node();
    }

    fn parse_enum_body(&mut self) {
        if !self.open_delimiter(SyntaxKind::BraceOpen, "`{` to open the enum body") {
            return;
        }

        while !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            match self.current() {
                SyntaxKind::At => self.parse_domain(),
                SyntaxKind::Id => self.parse_enum_value(),
                _ => self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "expected an enum value or a domain",
                    ENUM_MEMBER_RECOVERY,
                ),
            }
        }
        self.close_delimiter(SyntaxKind::BraceClose);
    }

    /// `name = 1` or `name = "text"`, then domains.
    fn parse_enum_value(&mut self) {
        self.start_node(SyntaxKind::EnumValueDef);
        self.bump();

        if !self.expect(SyntaxKind::Equals, "`=` after enum value name") {
            self.finish_node();
            return;
        }

        if self.currently_is(SyntaxKind::Int) || self.currently_is_one_of(STRING_START) {
            self.parse_value();
        } else {
            self.error_msg(
                DiagnosticKind::ExpectedValue,
                "enum values are integers or strings",
            );
        }

        self.parse_inline_domains();
        if !self.at_line_start() {
            self.parse_domain_block();
        }
        self.finish_node();
    }
}
