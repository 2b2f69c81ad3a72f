use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use sub_hunter::cli::{Cli, Method, OutputFormatter};
use sub_hunter::utils::hostname::is_valid_domain;
use sub_hunter::{merge_sources, save_to_file, Config, SecurityTrailsClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Load .env file if it exists
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    OutputFormatter::print_banner();

    if let Err(e) = run(cli).await {
        OutputFormatter::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if !is_valid_domain(&cli.domain) {
        anyhow::bail!("'{}' does not look like a valid domain", cli.domain);
    }

    let config = load_config();
    let page_size = cli.page_size.unwrap_or(config.search.page_size);
    let max_pages = cli.max_pages.unwrap_or(config.search.max_pages);

    let client = SecurityTrailsClient::with_config(
        cli.api_key.as_deref(),
        config.securitytrails.clone(),
    )?;

    let spinner = OutputFormatter::discovery_spinner(&format!(
        "Querying SecurityTrails for {}...",
        cli.domain
    ));
    let result = discover(&client, &cli, page_size, max_pages).await;
    spinner.finish_and_clear();

    let hosts = result?;

    OutputFormatter::print_summary(hosts.len(), &cli.domain, cli.method.as_str());
    for host in &hosts {
        println!("{}", host);
    }

    if let Some(out) = &cli.out {
        save_to_file(&hosts, out).with_context(|| format!("failed to write {}", out))?;
        OutputFormatter::print_success(&format!("Saved {} hostnames to {}", hosts.len(), out));
    }

    Ok(())
}

async fn discover(
    client: &SecurityTrailsClient,
    cli: &Cli,
    page_size: usize,
    max_pages: usize,
) -> sub_hunter::Result<Vec<String>> {
    match cli.method {
        Method::List => Ok(client.list_subdomains(&cli.domain).await?.hostnames),
        Method::Search => Ok(client
            .search_subdomains(&cli.domain, page_size, max_pages)
            .await?
            .hostnames),
        Method::Both => {
            let listed = client.list_subdomains(&cli.domain).await?;
            let searched = client
                .search_subdomains(&cli.domain, page_size, max_pages)
                .await?;
            Ok(merge_sources([
                listed.hostnames.as_slice(),
                searched.hostnames.as_slice(),
            ]))
        }
    }
}

fn load_config() -> Config {
    let config_paths = ["config/default.toml", "default.toml", ".sub_hunter.toml"];

    for path in config_paths {
        if Path::new(path).exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path);
                        return config;
                    }
                    Err(e) => {
                        warn!("Failed to parse config from {}: {}", path, e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config from {}: {}", path, e);
                }
            }
        }
    }

    Config::default()
}
