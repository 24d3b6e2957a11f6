use anyhow::Context;
use clap::Parser;
use product_scraper::app::server;
use product_scraper::utils::{logger, validation::Validate};
use product_scraper::{AnyLauncher, AppConfig, BatchRunner, Cli, Command, ProductId, ProductScraper};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting product-scraper");

    let config = match AppConfig::from_cli(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error ({:?}): {}", e.category(), e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let launcher =
        AnyLauncher::from_settings(&config.browser).context("failed to set up browser backend")?;
    let scraper = ProductScraper::new(launcher, config.clone());
    let runner = Arc::new(BatchRunner::new(scraper));

    match cli.command {
        Command::Serve { .. } => {
            server::serve(&config.server, runner)
                .await
                .context("HTTP server failed")?;
        }
        Command::Scrape {
            product_ids,
            pretty,
        } => {
            let product_ids: Vec<ProductId> = product_ids.into_iter().map(ProductId::from).collect();
            let results = runner.run(&product_ids).await;

            let output = if pretty {
                serde_json::to_string_pretty(&results)?
            } else {
                serde_json::to_string(&results)?
            };
            println!("{}", output);

            if results.is_empty() {
                tracing::warn!("No products found");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
