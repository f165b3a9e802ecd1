use crate::cli::{
    commands::{Commands, ImageAction, PurgeAction},
    handlers,
};
use crate::config::CliConfig;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::PathBuf;

/// pvsadm - PowerVS image administration
#[derive(Parser, Debug)]
#[command(
    name = "pvsadm",
    version,
    about = "pvsadm - IBM Cloud PowerVS image administration",
    long_about = "Command-line tool for managing images in IBM Cloud PowerVS instances.

IMAGES:
  pvsadm image import -n <instance> -b <bucket> -r <region> -o <object> --image-name <name>
  pvsadm image ls -n <instance>

PURGE:
  pvsadm purge images -n <instance> --before 72h --regexp '^ci-' --dry-run

Authenticate with an IBM Cloud API key through IBMCLOUD_API_KEY or --api-key."
)]
pub struct Args {
    /// Configuration file path [default: <config dir>/pvsadm/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// IBM Cloud API key
    #[arg(long, global = true, env = "IBMCLOUD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config = CliConfig::load(self.config.as_deref())?;
        let api_key = self.api_key.as_deref();

        match self.command {
            Commands::Image { action } => match action {
                ImageAction::Import(options) => {
                    handlers::image::handle_import(options, &config, api_key, self.json).await
                }
                ImageAction::Ls { instance } => {
                    handlers::image::handle_ls(instance, &config, api_key, self.json).await
                }
            },
            Commands::Purge { action } => match action {
                PurgeAction::Images(options) => {
                    handlers::purge::handle_purge_images(options, &config, api_key, self.json)
                        .await
                }
            },
        }
    }
}
