use anyhow::Result;
use clap::Parser;

mod cli;
mod promote_cmd;
mod transform_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Promote(args) => promote_cmd::run_promote(args),
        Command::Clean(args) => promote_cmd::run_clean(args),
        Command::Migrate(args) => promote_cmd::run_migrate(args),
        Command::Transform(args) => transform_cmd::run_transform(args),
        Command::Resources(args) => transform_cmd::run_resources(args),
    }
}
