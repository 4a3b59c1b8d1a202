use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// Spreadsheet status codes recorded by the evaluator.
///
/// These are cell-level statuses, not Rust errors: the evaluator stores the
/// most recently recorded code and keeps computing. A referenced cell's own
/// code is forwarded verbatim, so anything here may also show up through a
/// reference.
pub mod codes {
    /// The formula has no tokens at all.
    pub const EMPTY_FORMULA: &str = "#EMPTY!";
    /// An unrecognized token appeared where a factor was expected.
    pub const INVALID_FORMULA: &str = "#ERROR!";
    /// A referenced cell is empty (no formula, no real error).
    pub const INVALID_CELL: &str = "#REF!";
    /// A numeric token failed to parse.
    pub const INVALID_NUMBER: &str = "#NUM!";
    /// The right-hand operand of '/' evaluated to zero.
    pub const DIVIDE_BY_ZERO: &str = "#DIV/0!";
    /// An opened parenthesis was never closed.
    pub const MISSING_PARENTHESES: &str = "#PAREN!";
    /// Tokens remained after a complete expression was consumed.
    pub const PARTIAL: &str = "#PARTIAL!";
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ErrorKind {
    LexError,
    ScriptError,
}

/// A reportable error from the tokenizer or the script layer.
///
/// Evaluation outcomes are never surfaced this way; the evaluator records
/// status codes (see [`codes`]) instead of returning `Err`.
#[derive(Debug, Clone)]
pub struct SheetError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl SheetError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::LexError, span, message)
    }

    pub fn script_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::ScriptError, span, message)
    }

    pub fn script_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::ScriptError, span, message, help)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::LexError => Color::Red,
            ErrorKind::ScriptError => Color::Yellow,
        };

        let kind_str = match self.kind {
            ErrorKind::LexError => "Lexical Error",
            ErrorKind::ScriptError => "Script Error",
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", kind_str.fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        // Add help note if available
        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SheetError {}
