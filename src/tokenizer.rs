use crate::error::{SheetError, Span};

/// Scans formula text into the flat token strings the evaluator consumes.
///
/// Tokens stay untyped on purpose: the evaluator classifies each string
/// (number, cell label, operator, parenthesis) at the point of use, so the
/// tokenizer only has to split the text and reject characters that can
/// never appear in a formula.
pub struct Tokenizer {
    source: String,
    tokens: Vec<String>,
    start: usize,
    current: usize,
}

impl Tokenizer {
    pub fn new(source: String) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    pub fn scan_tokens(&mut self) -> Result<Vec<String>, SheetError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        Ok(self.tokens.clone())
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), SheetError> {
        let c = self.advance();

        match c {
            '(' | ')' | '+' | '-' | '*' => self.add_token(),
            '/' => {
                if self.peek() == '/' {
                    // Comment goes until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token();
                }
            }
            ' ' | '\r' | '\t' | '\n' => {
                // Ignore whitespace
            }
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_alphabetic() => self.identifier(),
            _ => {
                return Err(SheetError::lex_error(
                    Span::single(self.current - 1),
                    format!("Unexpected character: '{}'", c),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..].chars().next().unwrap_or('\0');
        self.current += c.len_utf8();
        c
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn number(&mut self) -> Result<(), SheetError> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Look for fractional part
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            // Consume the "."
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let number_slice = &self.source[self.start..self.current];
        if number_slice.parse::<f64>().is_err() {
            return Err(SheetError::lex_error(
                Span::new(self.start, self.current),
                format!("Invalid number: {}", number_slice),
            ));
        }

        self.add_token();
        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() {
            self.advance();
        }

        // Whether this is actually a cell label is decided at evaluation
        // time; the tokenizer emits the text either way.
        self.add_token();
    }

    fn add_token(&mut self) {
        self.tokens
            .push(self.source[self.start..self.current].to_string());
    }
}
