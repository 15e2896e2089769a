use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::TYPE_ARGS_RECOVERY;
use crate::parser::cst::{SyntaxKind, keywords};

impl Parser<'_> {
    /// `Name`, `ns.Name<Args>`, `Name[]`, `Name[N]`, `map<K, V>`.
    ///
    /// Optionality markers are not part of a type reference; fields take them.
    pub(crate) fn parse_type_ref(&mut self) {
        if !self.enter_recursion() {
            return;
        }

        self.start_node(SyntaxKind::TypeRef);
        if !self.eat_token(SyntaxKind::Id) {
            self.error(DiagnosticKind::ExpectedTypeRef);
            self.finish_node();
            self.exit_recursion();
            return;
        }

        if self.currently_is(SyntaxKind::AngleOpen) {
            self.parse_type_args();
        }
        if self.currently_is(SyntaxKind::BracketOpen) {
            self.parse_array_suffix();
        }

        self.finish_node();
        self.exit_recursion();
    }

    fn parse_type_args(&mut self) {
        self.start_node(SyntaxKind::TypeArgs);
        self.open_delimiter(SyntaxKind::AngleOpen, "`<`");

        self.parse_type_ref();
        while self.eat_token(SyntaxKind::Comma) {
            self.parse_type_ref();
        }

        if !self.currently_is_one_of(TYPE_ARGS_RECOVERY) && !self.should_stop() {
            self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "expected `,` or `>`",
                TYPE_ARGS_RECOVERY,
            );
        }
        self.close_delimiter(SyntaxKind::AngleClose);
        self.finish_node();
    }

    fn parse_array_suffix(&mut self) {
        self.start_node(SyntaxKind::ArraySuffix);
        self.bump();
        self.eat_token(SyntaxKind::Int);
        self.expect(SyntaxKind::BracketClose, "`]`");
        self.finish_node();
    }

    /// `<T, U? extends Bound = Default>`
    pub(crate) fn parse_type_params(&mut self) {
        self.start_node(SyntaxKind::TypeParams);
        self.open_delimiter(SyntaxKind::AngleOpen, "`<`");

        self.parse_type_param();
        while self.eat_token(SyntaxKind::Comma) {
            self.parse_type_param();
        }

        if !self.currently_is_one_of(TYPE_ARGS_RECOVERY) && !self.should_stop() {
            self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "expected `,` or `>`",
                TYPE_ARGS_RECOVERY,
            );
        }
        self.close_delimiter(SyntaxKind::AngleClose);
        self.finish_node();
    }

    fn parse_type_param(&mut self) {
        self.start_node(SyntaxKind::TypeParam);
        if !self.eat_token(SyntaxKind::Id) {
            self.error_msg(DiagnosticKind::ExpectedIdent, "type parameter name");
            self.finish_node();
            return;
        }

        self.eat_token(SyntaxKind::Question);

        if self.currently_is_keyword(keywords::EXTENDS) {
            self.bump();
            self.parse_type_ref();
        }

        if self.eat_token(SyntaxKind::Equals) {
            self.parse_type_ref();
        }
        self.finish_node();
    }
}
