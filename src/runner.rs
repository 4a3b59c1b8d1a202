use crate::cell::{format_number, is_valid_cell_label, Cell};
use crate::error::{SheetError, Span};
use crate::evaluator::FormulaEvaluator;
use crate::sheet::{CellLookup, SheetMemory};
use crate::tokenizer::Tokenizer;

/// Runs a line-oriented sheet script against a fresh sheet.
///
/// `LABEL = formula` commits a cell; a bare formula evaluates and prints.
/// Lexical and script errors stop the run with a diagnostic; evaluation
/// errors are ordinary cell state and the run continues.
pub fn run(source: &str, filename: Option<&str>) {
    let mut sheet = SheetMemory::new();
    let mut offset = 0;

    for line in source.lines() {
        let line_start = offset;
        offset += line.len() + 1;

        match execute_line(line, line_start, &mut sheet) {
            Ok(Some(printed)) => println!("{}", printed),
            Ok(None) => {}
            Err(error) => {
                error.report(source, filename);
                return;
            }
        }
    }
}

/// Executes one script line, committing to or evaluating against `sheet`.
/// Returns the line's printable result, if any; `offset` positions the
/// line's spans inside the surrounding source for error reports.
pub fn execute_line(
    line: &str,
    offset: usize,
    sheet: &mut SheetMemory,
) -> Result<Option<String>, SheetError> {
    // Everything left of the first '=' names the target cell
    if let Some((lhs, rhs)) = line.split_once('=') {
        let label = lhs.trim();
        if !is_valid_cell_label(label) {
            let start = offset + (lhs.len() - lhs.trim_start().len());
            let span = if label.is_empty() {
                Span::single(start)
            } else {
                Span::new(start, start + label.len())
            };
            return Err(SheetError::script_error_with_help(
                span,
                format!("Invalid assignment target: '{}'", label),
                "Cell labels are column letters followed by a row number, like A1 or BC23."
                    .to_string(),
            ));
        }

        let rhs_offset = offset + lhs.len() + 1;
        let mut tokenizer = Tokenizer::new(rhs.to_string());
        let formula = tokenizer
            .scan_tokens()
            .map_err(|error| offset_error(error, rhs_offset))?;

        let mut evaluator = FormulaEvaluator::new(sheet);
        let outcome = evaluator.evaluate(&formula);

        sheet.set_cell(
            label,
            Cell::with_outcome(formula, outcome.result, outcome.error_message),
        );
        let display = sheet.get_cell_by_label(label).display();
        return Ok(Some(format!("{} = {}", label, display)));
    }

    // A bare formula evaluates against the current sheet
    let mut tokenizer = Tokenizer::new(line.to_string());
    let formula = tokenizer
        .scan_tokens()
        .map_err(|error| offset_error(error, offset))?;
    if formula.is_empty() {
        return Ok(None);
    }

    let mut evaluator = FormulaEvaluator::new(sheet);
    let outcome = evaluator.evaluate(&formula);
    if outcome.error_occurred {
        Ok(Some(outcome.error_message))
    } else {
        Ok(Some(format_number(outcome.result)))
    }
}

fn offset_error(mut error: SheetError, by: usize) -> SheetError {
    error.span.start += by;
    error.span.end += by;
    error
}
