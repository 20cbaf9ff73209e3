//! Inspect command - List the resources of a template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indexmap::IndexMap;
use tracing::info;

use cfnkit_template::{KindCatalog, Template};

#[derive(Args)]
pub struct InspectArgs {
    /// Template file (JSON or YAML, chosen by extension)
    template: PathBuf,
}

/// One line of the inspection report.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSummary {
    pub name: String,
    pub kind: String,
    pub typed: bool,
}

/// Summarize every resource of a template after typing it through the catalogue.
pub fn summarize(template: &mut Template, catalog: &KindCatalog) -> Vec<ResourceSummary> {
    let upgraded = template.upgrade_with(catalog);
    info!("Decoded {} of {} resources", upgraded, template.resources.len());

    template
        .resources
        .iter()
        .map(|(name, entry)| ResourceSummary {
            name: name.clone(),
            kind: entry.kind().unwrap_or("<missing Type>").to_string(),
            typed: entry.is_typed(),
        })
        .collect()
}

pub fn execute(args: InspectArgs, quiet: bool) -> Result<()> {
    let mut template = Template::from_file(&args.template)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;

    let summaries = summarize(&mut template, &cfnkit_resources::catalog());

    if let Some(description) = &template.description {
        println!("📋 {}", description);
    }
    println!(
        "   {} parameters, {} resources, {} outputs",
        template.parameters.len(),
        template.resources.len(),
        template.outputs.len()
    );
    println!();

    for summary in &summaries {
        let marker = if summary.typed { "typed" } else { "raw" };
        println!("   {:<32} {:<36} {}", summary.name, summary.kind, marker);
    }

    if !quiet {
        let mut by_kind: IndexMap<&str, usize> = IndexMap::new();
        for summary in &summaries {
            *by_kind.entry(summary.kind.as_str()).or_default() += 1;
        }
        println!();
        for (kind, count) in by_kind {
            println!("   {:>3} × {}", count, kind);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_marks_typed_and_raw() {
        let document = json!({
            "Resources": {
                "VPC": {"Type": "AWS::EC2::VPC", "Properties": {"CidrBlock": "10.0.0.0/16"}},
                "Queue": {"Type": "AWS::SQS::Queue"},
                "Odd": {"Properties": {}}
            }
        });
        let mut template = Template::from_json(document.to_string().as_bytes()).unwrap();

        let summaries = summarize(&mut template, &cfnkit_resources::catalog());
        assert_eq!(
            summaries,
            vec![
                ResourceSummary {
                    name: "VPC".to_string(),
                    kind: "AWS::EC2::VPC".to_string(),
                    typed: true,
                },
                ResourceSummary {
                    name: "Queue".to_string(),
                    kind: "AWS::SQS::Queue".to_string(),
                    typed: false,
                },
                ResourceSummary {
                    name: "Odd".to_string(),
                    kind: "<missing Type>".to_string(),
                    typed: false,
                },
            ]
        );
    }
}
