//! Logging setup, grounded on the teacher's `configure_tracing`: a `log`-to-`tracing`
//! bridge, an `EnvFilter` seeded from `-q`/`-v` and overridable by an environment
//! variable, and a `FmtSubscriber` writing to stderr so stdout stays clean for piping
//! the report itself.

use anyhow::{Context, Result};
use tracing_log::{AsLog, LogTracer};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::args::GlobalArgs;

/// Environment variable consulted for fine-grained filter directives, analogous to the
/// teacher's `NP_LOG`.
const LOG_ENV_VAR: &str = "SIZER_LOG";

pub fn configure_tracing(global_args: &GlobalArgs) -> Result<()> {
    let level_filter = if global_args.quiet {
        LevelFilter::ERROR
    } else {
        match global_args.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    LogTracer::builder()
        .with_max_level(level_filter.as_log())
        .init()
        .context("failed to install log-to-tracing bridge")?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env()
        .with_context(|| format!("failed to parse filters from {LOG_ENV_VAR} environment variable"))?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_ansi(global_args.use_color(std::io::stderr()))
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install global tracing subscriber")?;

    Ok(())
}

pub fn configure_color(global_args: &GlobalArgs) {
    console::set_colors_enabled(global_args.use_color(std::io::stdout()));
    console::set_colors_enabled_stderr(global_args.use_color(std::io::stderr()));
}
