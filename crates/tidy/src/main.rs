//! Command-line front end: evaluate an expression, run a script, or drop
//! into an interactive REPL.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tidy::Interpreter;

#[derive(Parser)]
#[command(name = "tidy", version, about = "A mark-and-sweep Scheme interpreter")]
struct Cli {
    /// Evaluate one expression and exit
    #[arg(short, long, value_name = "EXPR", conflicts_with = "script")]
    expr: Option<String>,

    /// Script file to run instead of starting the REPL
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut interpreter = Interpreter::new();

    if let Some(expr) = cli.expr {
        for value in interpreter.run_all(&expr)? {
            println!("{value}");
        }
        return Ok(());
    }

    if let Some(path) = cli.script {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for value in interpreter.run_all(&source)? {
            println!("{value}");
        }
        return Ok(());
    }

    repl(&mut interpreter)
}

fn repl(interpreter: &mut Interpreter) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("tidy {} - Ctrl-D to exit", tidy::VERSION);

    loop {
        match editor.readline("tidy> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(&line)?;
                match interpreter.run_all(&line) {
                    Ok(values) => {
                        for value in values {
                            println!("{value}");
                        }
                    }
                    Err(error) => eprintln!("{error}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}
