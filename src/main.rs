use clap::Parser;
use mkbench::cli::commands;
use mkbench::cli::{Cli, Commands};
use mkbench::logging::init_logging;
use mkbench::{MkbenchError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = match &cli.command {
        Commands::Write(args) => {
            commands::write::execute(args, cli.config.clone(), cli.json, cli.quiet)
        }
        Commands::Version => commands::version::execute(cli.json),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &MkbenchError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    if json_mode || !io::stdout().is_terminal() {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        eprintln!("{}", structured.to_human(io::stderr().is_terminal()));
    }

    std::process::exit(exit_code);
}
