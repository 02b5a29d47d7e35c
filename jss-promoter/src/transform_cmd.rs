use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jss_promoter::manifest::{default_rules, load_rules, RuleSet};
use jss_promoter::resource::MIGRATE_ORDER;
use jss_promoter::transform::Transformer;
use serde::Serialize;
use xml_tree_core::write_string;

use crate::cli::{DocumentFormat, OutputFormat, ResourcesArgs, TransformArgs};

/// Load rules from `path`, or the embedded defaults when none is given.
pub fn resolve_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => load_rules(path)
            .with_context(|| format!("failed to load manifests {}", path.display())),
        None => default_rules().context("embedded manifests are invalid"),
    }
}

pub fn run_transform(args: TransformArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let transformer = Transformer::new(resolve_rules(args.manifests.as_deref())?);

    let document = transformer
        .transform(&raw, args.resource)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    match args.format {
        DocumentFormat::Xml => println!("{}", write_string(&document)?),
        DocumentFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ResourceRow {
    order: usize,
    name: &'static str,
    endpoint: &'static str,
    list_element: &'static str,
    manifest: bool,
}

pub fn run_resources(args: ResourcesArgs) -> Result<()> {
    let rules = resolve_rules(args.manifests.as_deref())?;
    let rows: Vec<ResourceRow> = MIGRATE_ORDER
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let descriptor = kind.descriptor();
            ResourceRow {
                order: idx + 1,
                name: descriptor.name,
                endpoint: descriptor.endpoint,
                list_element: descriptor.list_element,
                manifest: rules.manifest_for(*kind).is_some(),
            }
        })
        .collect();

    match args.format {
        OutputFormat::Text => {
            for row in &rows {
                println!(
                    "{:>2}. {:<38} /{:<36} {}",
                    row.order,
                    row.name,
                    row.endpoint,
                    if row.manifest { "manifest" } else { "global only" }
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}
