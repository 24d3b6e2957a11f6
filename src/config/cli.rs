use crate::config::Backend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-scraper")]
#[command(about = "Scrapes product cards from the allo.ua catalog")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    #[arg(long, global = true, help = "Show the browser window")]
    pub headed: bool,

    /// Catalog origin the search URL is built from
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-navigation timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Scrape the given product IDs and print the results as JSON
    Scrape {
        #[arg(required = true)]
        product_ids: Vec<String>,

        #[arg(long)]
        pretty: bool,
    },
}
