//! cfnkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Decode error
//! - 4: Render error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cfnkit_template::TemplateError;

mod commands;
mod stack_file;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const DECODE_ERROR: u8 = 3;
    pub const RENDER_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "warn,cfnkit=debug"
    } else {
        "warn,cfnkit=info"
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Render(args) => commands::render::execute(args, cli.quiet),
        Commands::Inspect(args) => commands::inspect::execute(args, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let template_error = e.chain().find_map(|cause| cause.downcast_ref::<TemplateError>());

    match template_error {
        Some(TemplateError::Serialization(_)) => ExitCodes::RENDER_ERROR,
        Some(
            TemplateError::Decode { .. }
            | TemplateError::Json(_)
            | TemplateError::Yaml(_)
            | TemplateError::ResourceNotFound { .. },
        ) => ExitCodes::DECODE_ERROR,
        Some(TemplateError::InvalidName(_)) => ExitCodes::INVALID_ARGS,
        _ => {
            let msg = e.to_string().to_lowercase();
            if msg.contains("argument") || msg.contains("option") || msg.contains("not found") {
                ExitCodes::INVALID_ARGS
            } else if msg.contains("invalid stack file") {
                ExitCodes::DECODE_ERROR
            } else {
                ExitCodes::GENERAL_ERROR
            }
        }
    }
}
