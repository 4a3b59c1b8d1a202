use crate::cell::is_valid_cell_label;
use crate::error::codes;
use crate::sheet::CellLookup;

/// Bound on parenthesis nesting. Recursion depth tracks nesting depth, so
/// this caps stack growth on pathological input; well-formed formulas never
/// get near it.
const DEFAULT_MAX_DEPTH: usize = 200;

/// What one `evaluate` call produced. Overwritten wholesale on every call;
/// `error_message` is empty exactly when `error_occurred` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalOutcome {
    pub result: f64,
    pub error_occurred: bool,
    pub error_message: String,
}

/// Forward-only cursor over the caller's token slice. Borrowing instead of
/// draining a queue keeps the caller's formula untouched across the call.
struct TokenStream<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> TokenStream<'t> {
    fn new(tokens: &'t [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'t str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// Evaluates tokenized formulas against a sheet.
///
/// The grammar is the usual left-associative precedence climb
/// (`expression := term (('+'|'-') term)*`, `term := factor (('*'|'/')
/// factor)*`, `factor := NUMBER | CELL_REF | '(' expression ')'`).
///
/// Failures never abort evaluation: each failure site records a status code
/// and computation continues with whatever partial value the failing piece
/// produced (usually 0). When several failures occur in one call, the last
/// one recorded in consumption order is the one reported. The public
/// boundary never returns `Err` and never panics; the outcome carries the
/// status.
pub struct FormulaEvaluator<'a, L: CellLookup> {
    sheet: &'a L,
    result: f64,
    error_occurred: bool,
    error_message: String,
    max_depth: usize,
}

impl<'a, L: CellLookup> FormulaEvaluator<'a, L> {
    pub fn new(sheet: &'a L) -> Self {
        Self::with_max_depth(sheet, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(sheet: &'a L, max_depth: usize) -> Self {
        Self {
            sheet,
            result: 0.0,
            error_occurred: false,
            error_message: String::new(),
            max_depth,
        }
    }

    pub fn evaluate(&mut self, formula: &[String]) -> EvalOutcome {
        self.result = 0.0;
        self.error_occurred = false;
        self.error_message.clear();

        if formula.is_empty() {
            self.record_error(codes::EMPTY_FORMULA);
            return self.outcome();
        }

        let mut tokens = TokenStream::new(formula);
        self.result = self.expression(&mut tokens, 0);

        // A complete expression with tokens left over means the tail never
        // fit the grammar
        if !tokens.is_at_end() {
            self.record_error(codes::PARTIAL);
        }

        self.outcome()
    }

    /// Numeric result of the most recent `evaluate` call.
    pub fn result(&self) -> f64 {
        self.result
    }

    /// Status code of the most recent `evaluate` call, empty when clean.
    pub fn error(&self) -> &str {
        &self.error_message
    }

    pub fn error_occurred(&self) -> bool {
        self.error_occurred
    }

    fn outcome(&self) -> EvalOutcome {
        EvalOutcome {
            result: self.result,
            error_occurred: self.error_occurred,
            error_message: self.error_message.clone(),
        }
    }

    // Last write wins
    fn record_error(&mut self, message: &str) {
        self.error_occurred = true;
        self.error_message = message.to_string();
    }

    fn expression(&mut self, tokens: &mut TokenStream, depth: usize) -> f64 {
        let mut result = self.term(tokens, depth);

        while let Some(operator @ ("+" | "-")) = tokens.peek() {
            tokens.next();
            let rhs = self.term(tokens, depth);
            if operator == "+" {
                result += rhs;
            } else {
                result -= rhs;
            }
        }

        result
    }

    fn term(&mut self, tokens: &mut TokenStream, depth: usize) -> f64 {
        let mut result = self.factor(tokens, depth);

        while let Some(operator @ ("*" | "/")) = tokens.peek() {
            tokens.next();
            let rhs = self.factor(tokens, depth);
            if operator == "*" {
                result *= rhs;
            } else {
                if rhs == 0.0 {
                    self.record_error(codes::DIVIDE_BY_ZERO);
                }
                // The division is still performed; a zero divisor yields an
                // IEEE infinity (or NaN for 0/0) alongside the recorded code
                result /= rhs;
            }
        }

        result
    }

    fn factor(&mut self, tokens: &mut TokenStream, depth: usize) -> f64 {
        let token = match tokens.next() {
            Some(token) => token,
            None => {
                self.record_error(codes::INVALID_FORMULA);
                return 0.0;
            }
        };

        if is_number(token) {
            return token.parse().unwrap_or(0.0);
        }

        if is_cell_reference(token) {
            let (value, error) = self.get_cell_value(token);
            if !error.is_empty() {
                self.record_error(&error);
            }
            return value;
        }

        if token == "(" {
            if depth >= self.max_depth {
                self.record_error(codes::INVALID_FORMULA);
                return 0.0;
            }
            let result = self.expression(tokens, depth + 1);
            if tokens.next() != Some(")") {
                self.record_error(codes::MISSING_PARENTHESES);
            }
            return result;
        }

        self.record_error(codes::INVALID_FORMULA);
        0.0
    }

    /// Resolver adapter: a cell label becomes a committed value plus an
    /// error indicator. No recursion into the referenced cell's own formula.
    fn get_cell_value(&self, label: &str) -> (f64, String) {
        let cell = self.sheet.get_cell_by_label(label);

        // A real error in the referenced cell is forwarded verbatim; the
        // empty-formula marker is not an error of its own
        if !cell.error().is_empty() && cell.error() != codes::EMPTY_FORMULA {
            return (0.0, cell.error().to_string());
        }

        // An empty, unerrored cell is not a valid numeric source
        if cell.formula().is_empty() {
            return (0.0, codes::INVALID_CELL.to_string());
        }

        (cell.value(), String::new())
    }
}

pub fn is_number(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

pub fn is_cell_reference(token: &str) -> bool {
    is_valid_cell_label(token)
}
