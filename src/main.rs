// mallet - A small Lisp interpreter with a tail-call trampoline
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::Parser as ClapParser;
use mallet_core::{Interpreter, InterpreterConfig};
use mallet_parser::{Parser, escape_string};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Native stack for the evaluation thread.
const EVAL_STACK_BYTES: usize = 64 * 1024 * 1024;

const PROMPT: &str = "user> ";

#[derive(ClapParser, Debug)]
#[command(name = "mallet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small Lisp interpreter", long_about = None)]
struct Args {
    /// Script to run instead of starting the prompt loop
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Arguments bound to *ARGV* for the script
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    script_args: Vec<String>,

    /// Deepest nesting of non-tail evaluation
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MALLET_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let handle = thread::Builder::new()
        .name("mallet-eval".to_string())
        .stack_size(EVAL_STACK_BYTES)
        .spawn(move || run(args));

    let code = match handle {
        Ok(handle) => handle.join().unwrap_or_else(|_| {
            error!("evaluation thread panicked");
            1
        }),
        Err(e) => {
            eprintln!("Failed to start evaluation thread: {}", e);
            1
        }
    };
    process::exit(code);
}

/// Build the session and dispatch to the script runner or the prompt loop.
/// Returns the process exit status.
fn run(args: Args) -> i32 {
    let mut config = InterpreterConfig::default();
    if let Some(depth) = args.max_depth {
        config = config.with_max_eval_depth(depth);
    }

    let mut interp = match Interpreter::with_config(config) {
        Ok(interp) => interp,
        Err(e) => {
            eprintln!("Failed to start interpreter: {}", e);
            return 1;
        }
    };

    match args.script {
        Some(script) => run_script(&mut interp, &script, args.script_args),
        None => {
            run_repl(&mut interp);
            0
        }
    }
}

/// Evaluate a script file through `load-file`, with `*ARGV*` bound to the
/// remaining command-line arguments.
fn run_script(interp: &mut Interpreter, script: &Path, argv: Vec<String>) -> i32 {
    if let Err(e) = interp.set_argv(argv) {
        eprintln!("Error: {}", e);
        return 1;
    }

    let path = script.to_string_lossy();
    debug!(path = %path, "running script");
    let form = format!("(load-file \"{}\")", escape_string(&path));
    match interp.eval_str(&form) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Run the interactive prompt loop until end of input.
fn run_repl(interp: &mut Interpreter) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Could not initialize prompt: {}", e);
            return;
        }
    };

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                record_history(&mut rl, &line);
                rep_line(interp, &line);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

/// Add `line` to the prompt history, logging any failure.
fn record_history(rl: &mut DefaultEditor, line: &str) {
    if let Err(e) = rl.add_history_entry(line) {
        debug!(error = %e, "could not record history entry");
    }
}

/// Evaluate every form on the line, printing each result. The first error
/// abandons the rest of the line.
fn rep_line(interp: &mut Interpreter, line: &str) {
    let mut parser = Parser::new(line);
    loop {
        match parser.parse() {
            Ok(Some(form)) => match interp.eval_top_level(&form) {
                Ok(result) => println!("{}", result.printed(true)),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return;
                }
            },
            Ok(None) => return,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        }
    }
}
