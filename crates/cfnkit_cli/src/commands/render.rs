//! Render command - Build a template from a stack file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cfnkit_template::OutputFormat;

use crate::stack_file::StackFile;

#[derive(Args)]
pub struct RenderArgs {
    /// Stack definition file (YAML)
    stack: PathBuf,

    /// Output format: json or yaml
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Write the template to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn execute(args: RenderArgs, quiet: bool) -> Result<()> {
    let format = OutputFormat::from_str(&args.format)
        .with_context(|| format!("Invalid --format option: {}", args.format))?;

    info!("Rendering {:?} as {}", args.stack, format);

    let stack = StackFile::from_file(&args.stack)?;
    let set = stack.build(&cfnkit_resources::catalog())?;
    let rendered = set.template().render(format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write template to {}", path.display()))?;
            if !quiet {
                println!(
                    "✅ Rendered {} resources to {}",
                    set.template().resources.len(),
                    path.display()
                );
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendered)?;
            stdout.write_all(b"\n")?;
        }
    }

    if set.requires_iam() && !quiet {
        eprintln!("⚠️  Template creates IAM resources; deploy with CAPABILITY_IAM");
    }

    Ok(())
}
