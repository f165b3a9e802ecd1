//! Main entry point for pvsadm

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;
use clap_verbosity_flag::LevelFilter;
use color_eyre::eyre::{eyre, Result};
use pvsadm_cli::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Shell completions must run before argument parsing
    CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    match args.verbosity.log_level_filter() {
        LevelFilter::Off | LevelFilter::Error => {}
        _ => {
            std::env::set_var("RUST_LIB_BACKTRACE", "1");
        }
    }

    // Silent unless -v or RUST_LOG asks for more
    let default_filter = "pvsadm=warn,pvsadm_cli=warn,pvsadm_sdk=warn";
    pvsadm_common::logging::init_logging(&args.verbosity, default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
