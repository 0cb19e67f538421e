//! CLACC command-line entry point (§6.3, §15).
//!
//! `clacc <ast.json> [-o <path>]` reads a JSON-encoded AST, compiles it, and
//! writes CLAC text to `output.clac` (or the path given with `-o`). No
//! partial output is ever written on a compile error (§7).

use std::fs;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage: clacc <ast.json> [-o <output path>]");
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let source_path = match args.next() {
        Some(arg) if arg == "-h" || arg == "--help" => {
            print_usage();
            std::process::exit(0);
        }
        Some(arg) => arg,
        None => {
            print_usage();
            return Err("missing source file argument".to_string());
        }
    };

    let mut output_path = "output.clac".to_string();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-o" => {
                output_path = args
                    .next()
                    .ok_or_else(|| "-o requires a path argument".to_string())?;
            }
            other => return Err(format!("unrecognized argument '{other}'")),
        }
    }

    let source = fs::read_to_string(&source_path)
        .map_err(|e| format!("failed to read '{source_path}': {e}"))?;

    let clac = clacc::compile_source(&source).map_err(|e| {
        let span = e.span();
        format!("compile error at {span}: {e}")
    })?;

    fs::write(&output_path, clac).map_err(|e| format!("failed to write '{output_path}': {e}"))?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CLACC_LOG"))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
