use clap::Parser;
use sarcdec::cli::Cli;
use sarcdec::error::DecompError;
use sarcdec::{Decompiler, UserFriendlyError};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    let decompiler = match Decompiler::from_cli(&cli) {
        Ok(decompiler) => decompiler,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.generate_config {
        return match decompiler.generate_sample_config(Path::new("sarcdec.toml")) {
            Ok(()) => 0,
            Err(e) => {
                decompiler.handle_error(&e);
                exit_code_for(&e)
            }
        };
    }

    // Clap guarantees the input is present past this point.
    let input: PathBuf = match cli.input {
        Some(ref input) => input.clone(),
        None => {
            print_startup_error(&DecompError::Config {
                message: "no input archive given".to_string(),
            });
            return 5;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&decompiler, &input).await;
    }

    match decompiler.decompile(&input).await {
        Ok(report) => {
            decompiler.output_formatter().print_run_report(&report);
            if report.is_clean() {
                0
            } else {
                2
            }
        }
        Err(e) => {
            decompiler.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

async fn handle_dry_run(decompiler: &Decompiler, input: &Path) -> i32 {
    match decompiler.plan(input).await {
        Ok(plan) => {
            decompiler
                .output_formatter()
                .start_operation(&format!("Dry run: {} ({} members)", input.display(), plan.len()));
            for member in &plan {
                println!("{:>9}  {:>10}  {}", member.kind, member.size, member.name);
            }
            0
        }
        Err(e) => {
            decompiler.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &DecompError) -> i32 {
    match error {
        DecompError::InputNotFound { .. } => 3,
        DecompError::OutputDirectoryExists { .. } => 4,
        DecompError::Config { .. } => 5,
        DecompError::Io(_) => 6,
        _ => 1,
    }
}

/// Errors before the formatter exists get a bare stderr line.
fn print_startup_error(error: &DecompError) {
    eprintln!("Error: {}", error.user_message());
    if let Some(suggestion) = error.suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }
}
