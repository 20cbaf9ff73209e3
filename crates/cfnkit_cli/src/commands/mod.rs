//! CLI command definitions.
//!
//! Each subcommand maps to one operation on templates.

use clap::{Parser, Subcommand};

pub mod inspect;
pub mod render;

/// cfnkit - typed CloudFormation template assembly
#[derive(Parser)]
#[command(name = "cfnkit")]
#[command(version, about = "cfnkit - typed CloudFormation template assembly")]
#[command(long_about = r#"
cfnkit assembles CloudFormation templates from stack definition files and
inspects existing templates against its resource kind catalogue.

COMMANDS:
  render   → Build a template from a YAML stack file
  inspect  → List the resources of an existing template

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Decode error
  4 - Render error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template from a stack definition file
    Render(render::RenderArgs),

    /// Inspect the resources of a rendered template
    Inspect(inspect::InspectArgs),
}
