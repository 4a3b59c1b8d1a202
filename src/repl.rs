use crate::runner;
use crate::sheet::{CellLookup, SheetMemory};
use std::io::{self, Write};

/// Interactive sheet with persistent cell state between commands.

pub fn start() {
    println!("sheetcalc v0.1.0");
    println!("Set cells with 'A1 = 1 + 2' or evaluate a formula directly.");
    println!("Type 'cells' to list the sheet, 'clear LABEL' to unset a cell,");
    println!("'exit' or Ctrl+C to quit");
    println!();

    // The sheet persists between commands so later formulas can reference
    // earlier cells
    let mut sheet = SheetMemory::new();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!(); // Add newline for clean exit
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }
                if line == "cells" {
                    print_cells(&sheet);
                    continue;
                }
                if let Some(label) = line.strip_prefix("clear ") {
                    sheet.clear_cell(label.trim());
                    continue;
                }

                run_repl_command(line, &mut sheet);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_command(source: &str, sheet: &mut SheetMemory) {
    match runner::execute_line(source, 0, sheet) {
        Ok(Some(printed)) => println!("{}", printed),
        Ok(None) => {}
        Err(error) => error.report(source, None),
    }
}

fn print_cells(sheet: &SheetMemory) {
    let labels = sheet.labels();
    if labels.is_empty() {
        println!("(no cells set)");
        return;
    }
    for label in labels {
        println!("{:<6} {}", label, sheet.get_cell_by_label(&label).display());
    }
}
