//! Stratos Stats - Main CLI Application
//!
//! Aggregates simulation results files into means and confidence intervals.

use clap::Parser;
use stratos_stats::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
};
use std::process;

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue together with the input file that triggered it.");
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.debug);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);

        if !reporter.verbose {
            print_error_suggestions(&e);
        }

        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    App::new(cli)?.run()
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Verify that --root points at the directory holding the results files");
            eprintln!("  - Run with --help-topic config for the supported variables");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File troubleshooting:");
            eprintln!("  - Inputs are resolved against the input root unless absolute");
            eprintln!("  - Use --print-manifest to see which files the batch expects");
        }
        AppError::Parse(_) => {
            eprintln!();
            eprintln!("Input format help:");
            eprintln!("  - Result lines look like 'time|success|found|packets'");
            eprintln!("  - Every run ends with one control line holding the bytes sent");
            eprintln!("  - Check --requesters matches the number of result lines per run");
        }
        AppError::Statistics(_) => {
            eprintln!();
            eprintln!("Statistics help:");
            eprintln!("  - Every metric needs at least two runs with data");
            eprintln!("  - Runs where no requester received data only count towards found/success");
        }
        AppError::Internal(_) => {}
    }
}
