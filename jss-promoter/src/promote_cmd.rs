use std::path::Path;

use anyhow::{Context, Result};
use jss_promoter::client::JssClient;
use jss_promoter::config::{load_config, PromoterConfig, ServerConfig};
use jss_promoter::promote::{clean, migrate};
use jss_promoter::transform::Transformer;
use tracing::info;

use crate::cli::{CleanArgs, ConnectionArgs, MigrateArgs, PromoteArgs};
use crate::transform_cmd::resolve_rules;

/// Empty the target, then migrate everything from the source.
pub fn run_promote(args: PromoteArgs) -> Result<()> {
    let config = load(&args.connection)?;
    let transformer = build_transformer(&config, args.manifests.as_deref())?;

    let mut source = open_source(&config.source)?;
    let mut target = open_target(&config.target, args.connection.dry_run)?;

    if args.no_clean {
        info!("leaving existing target objects in place");
    } else {
        info!("prepping target JSS");
        clean(&mut target).context("cleaning the target server failed")?;
    }
    migrate(&mut source, &mut target, &transformer).context("migration stopped")?;

    info!("promotion finished");
    Ok(())
}

pub fn run_clean(args: CleanArgs) -> Result<()> {
    let config = load(&args.connection)?;
    let mut target = open_target(&config.target, args.connection.dry_run)?;
    clean(&mut target).context("cleaning the target server failed")?;
    info!("clean finished");
    Ok(())
}

pub fn run_migrate(args: MigrateArgs) -> Result<()> {
    let config = load(&args.connection)?;
    let transformer = build_transformer(&config, args.manifests.as_deref())?;

    let mut source = open_source(&config.source)?;
    let mut target = open_target(&config.target, args.connection.dry_run)?;
    migrate(&mut source, &mut target, &transformer).context("migration stopped")?;

    info!("migration finished");
    Ok(())
}

fn load(connection: &ConnectionArgs) -> Result<PromoterConfig> {
    load_config(&connection.config)
        .with_context(|| format!("failed to load config {}", connection.config.display()))
}

/// Rules from `--manifests`, else the config's `manifests`, else the defaults.
fn build_transformer(config: &PromoterConfig, manifests: Option<&Path>) -> Result<Transformer> {
    let chosen = manifests.or(config.manifests.as_deref());
    Ok(Transformer::new(resolve_rules(chosen)?))
}

fn open_source(server: &ServerConfig) -> Result<JssClient> {
    info!(url = %server.url, "source JSS");
    connect(server, true)
}

fn open_target(server: &ServerConfig, dry_run: bool) -> Result<JssClient> {
    info!(url = %server.url, dry_run, "target JSS");
    connect(server, server.read_only || dry_run)
}

fn connect(server: &ServerConfig, read_only: bool) -> Result<JssClient> {
    let password = server.resolve_password()?;
    JssClient::connect(&server.url, &server.username, &password, read_only)
        .with_context(|| format!("failed to connect to {}", server.url))
}
