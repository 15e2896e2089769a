use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{
    DOMAIN_BLOCK_RECOVERY, EXPRESSION_RECOVERY, STRING_START, VALUE_FIRST,
};

impl Parser<'_> {
    /// `@name`, `@name expression` or `@name { expression* }`
    pub(crate) fn parse_domain(&mut self) {
        self.start_node(SyntaxKind::Domain);
        self.bump();

        if !self.currently_is(SyntaxKind::Id) || self.at_line_start() {
            self.error_msg(DiagnosticKind::ExpectedIdent, "domain name after `@`");
            self.finish_node();
            return;
        }
        self.bump();

        if self.at_line_start() {
            self.finish_node();
            return;
        }

        // `{ @...` belongs to the enclosing field, not to this domain
        if self.currently_is(SyntaxKind::BraceOpen) && !self.next_is(SyntaxKind::At) {
            self.parse_expression_block();
        } else if self.currently_is(SyntaxKind::Id) {
            self.parse_expression();
        }
        self.finish_node();
    }

    /// Domains written on the same line as the construct they annotate.
    pub(crate) fn parse_inline_domains(&mut self) {
        while self.currently_is(SyntaxKind::At) && !self.at_line_start() {
            self.parse_domain();
        }
    }

    /// Optional `{ @domain ... }` trailing a field, enum value, alias or distinct type.
    pub(crate) fn parse_domain_block(&mut self) {
        if !self.currently_is(SyntaxKind::BraceOpen) {
            return;
        }
        self.open_delimiter(SyntaxKind::BraceOpen, "`{`");
        while !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            if self.currently_is(SyntaxKind::At) {
                self.parse_domain();
                continue;
            }
            self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "expected a domain",
                DOMAIN_BLOCK_RECOVERY,
            );
        }
        self.close_delimiter(SyntaxKind::BraceClose);
    }

    fn parse_expression_block(&mut self) {
        self.open_delimiter(SyntaxKind::BraceOpen, "`{`");
        while !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            if self.currently_is(SyntaxKind::Id) {
                self.parse_expression();
                continue;
            }
            self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "expected an expression",
                EXPRESSION_RECOVERY,
            );
        }
        self.close_delimiter(SyntaxKind::BraceClose);
    }

    /// `name value*`, values ending at the end of the line.
    fn parse_expression(&mut self) {
        self.start_node(SyntaxKind::Expression);
        self.bump();
        while self.currently_is_one_of(VALUE_FIRST) && !self.at_line_start() {
            self.parse_value();
        }
        self.finish_node();
    }

    pub(crate) fn parse_value(&mut self) {
        self.start_node(SyntaxKind::Value);
        if self.currently_is_one_of(STRING_START) {
            self.parse_string();
        } else {
            self.bump();
        }
        self.finish_node();
    }

    /// Quote, optional content, quote. The lexer only yields complete literals.
    pub(crate) fn parse_string(&mut self) {
        if !self.currently_is_one_of(STRING_START) {
            self.error(DiagnosticKind::ExpectedString);
            return;
        }
        let quote = self.current();
        self.bump();
        self.eat_token(SyntaxKind::StrVal);
        self.eat_token(quote);
    }
}
