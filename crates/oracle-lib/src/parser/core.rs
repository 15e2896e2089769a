//! Parser state machine and low-level operations.

use oracle_core::SourceId;
use rowan::{Checkpoint, GreenNodeBuilder, TextRange, TextSize};

use super::ast::Root;
use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

#[derive(Debug)]
pub struct ParseResult {
    pub root: Root,
    pub diagnostics: Diagnostics,
    pub fuel_consumed: u32,
}

/// An opened `{` or `<`, kept until its closer is seen.
#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: SyntaxKind,
    span: TextRange,
}

/// Recursive-descent parser over a token vector.
///
/// Trivia is buffered while looking ahead and attached in front of whatever
/// node or token comes next.
pub struct Parser<'src> {
    source: &'src str,
    pub(super) source_id: SourceId,
    pub(super) diagnostics: Diagnostics,
    tokens: Vec<Token>,
    pos: usize,
    trivia: Vec<Token>,
    builder: GreenNodeBuilder<'static>,
    open_delimiters: Vec<OpenDelimiter>,
    /// Position of the last reported diagnostic; one report per position.
    last_reported: Option<TextSize>,
    fuel_limit: u32,
    fuel_left: u32,
    depth: u32,
    max_depth: u32,
    fatal: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(
        source: &'src str,
        source_id: SourceId,
        tokens: Vec<Token>,
        fuel: u32,
        max_depth: u32,
    ) -> Self {
        Self {
            source,
            source_id,
            diagnostics: Diagnostics::new(),
            tokens,
            pos: 0,
            trivia: Vec::new(),
            builder: GreenNodeBuilder::new(),
            open_delimiters: Vec::new(),
            last_reported: None,
            fuel_limit: fuel,
            fuel_left: fuel,
            depth: 0,
            max_depth,
            fatal: None,
        }
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_root();
        self.flush_trivia();
        if let Some(err) = self.fatal {
            return Err(err);
        }

        let green = self.builder.finish();
        let root = Root::cast(SyntaxNode::new_root(green)).expect("parser always produces Root");
        Ok(ParseResult {
            root,
            diagnostics: self.diagnostics,
            fuel_consumed: self.fuel_limit - self.fuel_left,
        })
    }

    /// Record the first fatal limit hit; parsing winds down from there.
    fn fail(&mut self, err: Error) {
        self.fatal.get_or_insert(err);
    }

    pub(super) fn buffer_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos).filter(|t| t.kind.is_trivia()) {
            self.trivia.push(*token);
            self.pos += 1;
        }
    }

    fn flush_trivia(&mut self) {
        for token in self.trivia.drain(..) {
            self.builder
                .token(token.kind.into(), token_text(self.source, &token));
        }
    }

    /// Kind of the next significant token, `Error` at EOF.
    pub(super) fn current(&mut self) -> SyntaxKind {
        self.buffer_trivia();
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.buffer_trivia();
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => TextRange::empty(TextSize::of(self.source)),
        }
    }

    /// Text of the current token, empty at EOF.
    pub(super) fn current_text(&mut self) -> &'src str {
        self.buffer_trivia();
        self.tokens
            .get(self.pos)
            .map_or("", |token| token_text(self.source, token))
    }

    pub(super) fn should_stop(&self) -> bool {
        self.pos >= self.tokens.len() || self.fatal.is_some()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Current token is the identifier `keyword`.
    pub(super) fn currently_is_keyword(&mut self, keyword: &str) -> bool {
        self.currently_is(SyntaxKind::Id) && self.current_text() == keyword
    }

    /// Kind of the `n`th significant token from here.
    pub(super) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.buffer_trivia();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.peek_nth(1) == kind
    }

    /// Whether a line break separates the current token from the previous one.
    ///
    /// Expressions end at the end of a line, so this decides where value lists
    /// and inline domains stop.
    pub(super) fn at_line_start(&mut self) -> bool {
        self.buffer_trivia();
        self.tokens[..self.pos]
            .iter()
            .rev()
            .take_while(|t| t.kind.is_trivia())
            .any(|t| match t.kind {
                SyntaxKind::Newline => true,
                SyntaxKind::BlockComment => token_text(self.source, t).contains('\n'),
                _ => false,
            })
    }

    /// Attach pending trivia to the node currently open.
    pub(super) fn eat_trivia(&mut self) {
        self.buffer_trivia();
        self.flush_trivia();
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    /// Move the current token into the tree. Every bump costs one unit of fuel.
    pub(super) fn bump(&mut self) {
        let Some(&token) = self.tokens.get(self.pos) else {
            return;
        };
        match self.fuel_left.checked_sub(1) {
            Some(left) => self.fuel_left = left,
            None => self.fail(Error::ExecFuelExhausted),
        }
        self.flush_trivia();
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.pos += 1;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {}", what));
        false
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        self.report_here(kind, None);
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report_here(kind, Some(message.into()));
    }

    fn report_here(&mut self, kind: DiagnosticKind, message: Option<String>) {
        let range = self.current_span();
        if self.last_reported.replace(range.start()) == Some(range.start()) {
            return;
        }
        let builder = self.diagnostics.report(self.source_id, kind, range);
        match message {
            Some(message) => builder.message(message).emit(),
            None => builder.emit(),
        }
    }

    /// Report, then wrap everything up to the recovery set in an `Error` node.
    pub(super) fn error_recover(
        &mut self,
        kind: DiagnosticKind,
        message: &str,
        recovery: TokenSet,
    ) {
        if self.currently_is_one_of(recovery) || self.should_stop() {
            self.error_msg(kind, message);
            return;
        }

        self.start_node(SyntaxKind::Error);
        self.error_msg(kind, message);
        while !self.currently_is_one_of(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.fail(Error::RecursionLimitExceeded);
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Eat `open` and track it for unclosed-delimiter reporting.
    pub(super) fn open_delimiter(&mut self, open: SyntaxKind, what: &str) -> bool {
        if !self.currently_is(open) {
            self.expect(open, what);
            return false;
        }
        let span = self.current_span();
        self.open_delimiters.push(OpenDelimiter { kind: open, span });
        self.bump();
        true
    }

    /// Close the innermost delimiter, reporting it as unclosed if `close` is missing.
    pub(super) fn close_delimiter(&mut self, close: SyntaxKind) {
        let open = self.open_delimiters.pop();
        if self.eat_token(close) {
            return;
        }
        let Some(open) = open else {
            self.expect(close, "closing delimiter");
            return;
        };

        let (kind, construct) = match open.kind {
            SyntaxKind::AngleOpen => (DiagnosticKind::UnclosedAngle, "type arguments"),
            _ => (DiagnosticKind::UnclosedBrace, "block"),
        };
        let current = self.current_span();
        if self.last_reported.replace(current.start()) == Some(current.start()) {
            return;
        }
        // Spans from the opener to where the closer was expected.
        let range = TextRange::new(open.span.start(), current.end());
        self.diagnostics
            .report(self.source_id, kind, range)
            .related_to(self.source_id, open.span, format!("{} started here", construct))
            .emit();
    }
}
