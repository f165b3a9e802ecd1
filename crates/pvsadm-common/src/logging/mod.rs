//! Unified logging initialization for pvsadm binaries
//!
//! Filter priority:
//! 1. CLI flags (`-v/-q`) - highest priority
//! 2. RUST_LOG environment variable
//! 3. Binary-specific defaults - lowest priority

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the specified verbosity level and default filter.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{Verbosity, InfoLevel};
/// use pvsadm_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     verbosity: Verbosity<InfoLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, "pvsadm=info").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<()> {
    let filter = build_filter(verbosity.log_level(), std::env::var("RUST_LOG").ok(), default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Resolve the effective filter from flags, `RUST_LOG` and the default.
fn build_filter(
    flag_level: Option<clap_verbosity_flag::Level>,
    rust_log: Option<String>,
    default_filter: &str,
) -> Result<EnvFilter> {
    if let Some(level) = flag_level {
        return Ok(EnvFilter::try_new(level.to_string().to_lowercase())?);
    }

    match rust_log {
        Some(directives) if !directives.is_empty() => Ok(EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(default_filter))),
        _ => Ok(EnvFilter::try_new(default_filter)?),
    }
}
