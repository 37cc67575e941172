//! Shopdev - a local development server for storefront themes.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod data;
mod embed;
mod logger;
mod reload;
mod serve;
mod styles;
mod utils;
mod watch;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::Config;
use data::{DEFAULT_USER_ENDPOINT, HttpUserSource, UserSource};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();
    logger::set_verbose(cli.verbose);

    let config = Arc::new(Config::from_cli(&cli)?);
    if !config.theme_dir().is_dir() {
        crate::log!("serve"; "theme directory {} not found, serving anyway", config.theme_dir().display());
    }

    // Startup order: style compiler trigger (one immediate compile, then
    // watch), live-reload broadcaster, then the blocking request loop.
    styles::start(Arc::clone(&config));
    reload::start(Arc::clone(&config))?;

    let users: Arc<dyn UserSource> = Arc::new(HttpUserSource::new(DEFAULT_USER_ENDPOINT));
    serve::run(config, users)
}
