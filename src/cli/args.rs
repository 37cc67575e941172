//! Command-line interface definitions.

use clap::Parser;

/// Shopdev storefront theme development server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Shop/theme subdirectory to serve (relative to the working directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub shop: String,

    /// Port number for the template server
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Enable verbose output for debugging
    #[arg(long)]
    pub verbose: bool,
}
