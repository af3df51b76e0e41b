#![allow(non_snake_case)]
use RustedQuad::Utils::logger::init_logger;
use RustedQuad::Utils::session::IntegrationSession;
use RustedQuad::Utils::task_parser::TaskFile;
use RustedQuad::symbolic::builtins::allowed_names;
use RustedQuad::symbolic::expression::compile;
use itertools::Itertools;
use std::path::Path;
use std::process::ExitCode;

/// rusted_quad [TASK_FILE.toml | --names | --check FORMULA]
///
/// Runs every task of the TOML file (or the built-in demonstration set when no file is given)
/// and prints the results as a table. `--check` compiles one formula and shows what it uses.
fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let task_file = match args.first().map(String::as_str) {
        Some("--names") => {
            println!("x, {}", allowed_names().iter().join(", "));
            return ExitCode::SUCCESS;
        }
        Some("--check") => {
            let formula = args[1..].join(" ");
            return match compile(&formula) {
                Ok(f) => {
                    println!("formula:    {}", f);
                    println!("tree:       {:?}", f.tree());
                    println!("names used: {}", f.tree().identifiers().iter().join(", "));
                    println!("depends on x: {}", f.tree().contains_variable());
                    println!("f(0) = {}", f.eval(0.0).unwrap_or(f64::NAN));
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                }
            };
        }
        Some(path) => match TaskFile::load(Path::new(path)) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => {
            println!(" \n no task file given, running the demonstration tasks");
            TaskFile::demo()
        }
    };
    match init_logger(&task_file.logging) {
        Ok(Some(log_name)) => println!(" \n logging to {}", log_name),
        Ok(None) => {}
        Err(err) => {
            eprintln!("cannot create log file: {}", err);
            return ExitCode::FAILURE;
        }
    }
    let mut session = IntegrationSession::new(task_file.settings);
    session.run_all(&task_file.tasks);
    println!("\n{}", session.summary_table());
    println!("\n CALC STATISTICS \n{}", session.statistics_table());
    ExitCode::SUCCESS
}
