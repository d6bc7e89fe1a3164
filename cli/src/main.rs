use clap::Parser;
use foldeval::{EvalError, EvalOptions, evaluate_with_options};
use miette::Result;
use std::io::{BufRead, BufReader, Read, Write};

mod script_host;

use script_host::ScriptHost;

/// Foldeval - a single-pass, C-like integer expression evaluator
#[derive(Parser, Debug)]
#[command(name = "foldeval")]
#[command(about = "Evaluate C-like integer expressions", long_about = None)]
struct Args {
    /// Stack capacity, for deeply nested expressions
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Reject `;` inside call argument lists
    #[arg(long)]
    strict_arguments: bool,

    /// Expression to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
enum CliError {
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber; use RUST_LOG to control the level
    use tracing_subscriber::{EnvFilter, fmt};
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap();
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let options = EvalOptions {
        max_depth: args.max_depth,
        statements_in_call_args: !args.strict_arguments,
    };
    let mut host = ScriptHost::new(std::io::stdout());

    // Direct expression argument
    if let Some(expression) = args.expression {
        let value =
            evaluate_with_options(&options, &expression, Some(&mut host)).map_err(CliError::from)?;
        println!("{value}");
        return Ok(());
    }

    if atty::is(atty::Stream::Stdin) {
        // Interactive mode: one script per line, variables persist
        println!("Foldeval REPL - type expressions to evaluate (Ctrl+D to exit)");
        let stdin = std::io::stdin();
        let mut reader = BufReader::new(stdin.lock());
        loop {
            print!("> ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            if reader.read_line(&mut line).map_err(CliError::from)? == 0 {
                println!();
                return Ok(());
            }
            match evaluate_with_options(&options, &line, Some(&mut host)) {
                Ok(value) => println!("{value}"),
                Err(error) => eprintln!("Error: {}", error.diagnostic()),
            }
        }
    }

    // Pipe mode: the whole input is one script
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .map_err(CliError::from)?;
    let value = evaluate_with_options(&options, &source, Some(&mut host)).map_err(CliError::from)?;
    println!("{value}");
    Ok(())
}
