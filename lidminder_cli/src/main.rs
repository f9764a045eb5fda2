//! lidminder host binary: config loading, tracing init, and dispatch.

mod cli;
mod error_fmt;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH, FILE_GUARD, JSON_MODE};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();
    init_tracing(&cli);

    if let Err(err) = try_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::json_error(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(1);
    }
}

fn try_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(&cli)?;
    match cli.cmd {
        Commands::Run {
            max_ticks,
            poll_ms,
            post,
            start_raised,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
                .wrap_err("install ctrl-c handler")?;
            run::run(
                &cfg,
                &run::RunOpts {
                    max_ticks,
                    poll_ms,
                    post,
                    start_raised,
                },
                &shutdown,
            )
        }
        Commands::Selftest => run::selftest(&cfg),
    }
}

fn load_config(cli: &Cli) -> eyre::Result<lidminder_config::Config> {
    if !cli.config.exists() {
        // Only the built-in default path may be silently absent.
        if cli.config == std::path::Path::new(DEFAULT_CONFIG_PATH) {
            tracing::warn!("no config at {DEFAULT_CONFIG_PATH}; using built-in defaults");
            return Ok(lidminder_config::Config::default());
        }
        eyre::bail!("config file not found: {}", cli.config.display());
    }
    let text = std::fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg: lidminder_config::Config = toml::from_str(&text)
        .map_err(|e| eyre::eyre!("parse config {}: {e}", cli.config.display()))?;
    cfg.validate().wrap_err("invalid config")?;
    Ok(cfg)
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));

    if let Some(dir) = &cli.log_dir {
        let appender = tracing_appender::rolling::daily(dir, "lidminder.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        if cli.json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(writer)
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
        }
    } else if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
