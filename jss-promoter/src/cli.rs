use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use jss_promoter::resource::ResourceType;

#[derive(Parser, Debug)]
#[command(name = "jss-promoter")]
#[command(about = "Promote configuration objects from one JSS to another")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Empty the target server, then migrate every object from the source.
    Promote(PromoteArgs),
    /// Delete every promotable object from the target server.
    Clean(CleanArgs),
    /// Create every source object on the target server.
    Migrate(MigrateArgs),
    /// Apply the manifest rules to one local XML document.
    Transform(TransformArgs),
    /// List resource types in migration order.
    Resources(ResourcesArgs),
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Config file with [source] and [target] server settings.
    #[arg(long)]
    pub config: PathBuf,
    /// Open the target read-only: log writes instead of performing them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct PromoteArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Manifests TOML file, overriding the one named in the config.
    #[arg(long)]
    pub manifests: Option<PathBuf>,
    /// Skip emptying the target before migrating.
    #[arg(long)]
    pub no_clean: bool,
}

#[derive(Parser, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Manifests TOML file, overriding the one named in the config.
    #[arg(long)]
    pub manifests: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// XML document as returned by the source server.
    pub file: PathBuf,
    /// Resource type of the document (for example `computers`).
    #[arg(long)]
    pub resource: ResourceType,
    /// Manifests TOML file; embedded defaults when omitted.
    #[arg(long)]
    pub manifests: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = DocumentFormat::Xml)]
    pub format: DocumentFormat,
}

#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    /// Manifests TOML file; embedded defaults when omitted.
    #[arg(long)]
    pub manifests: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
