mod cell;
mod error;
mod evaluator;
mod repl;
mod runner;
mod sheet;
mod tokenizer;

use clap::{Arg, Command};
use std::fs;
use std::path::Path;

fn main() {
    let matches = Command::new("sheetcalc")
        .about("A spreadsheet formula evaluator with cell references and status codes")
        .arg(
            Arg::new("file")
                .help("The sheet script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path);
    } else if matches.get_flag("interactive") || matches.get_one::<String>("file").is_none() {
        repl::start();
    }
}

fn run_file(path: &str) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            runner::run(&source, path.to_str());
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
