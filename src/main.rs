//! tweetscout CLI entry point

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tweetscout::{
    config::{self, Config},
    error::{Error, Result},
    mcp::{handle_search, McpServer},
    models::{SearchRequest, Section, DEFAULT_LIMIT},
    search::RapidApiClient,
};

#[derive(Parser)]
#[command(name = "tweetscout")]
#[command(version, about = "Twitter search as an MCP tool", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (default)
    Serve,

    /// Run a single search and print the formatted report
    Search {
        /// The search query
        query: String,

        /// Result ranking: latest or top
        #[arg(short, long, default_value = "latest")]
        section: Section,

        /// Maximum number of tweets
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // A .env file may hold the credential; the real environment takes precedence
    config::load_dotenv();

    let config_path = cli.config.unwrap_or_else(Config::default_config_path);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::new(load_client(&config_path)?);
            server
                .run()
                .await
                .map_err(|e| Error::McpProtocol(e.to_string()))?;
        }

        Commands::Search {
            query,
            section,
            limit,
        } => {
            let request = SearchRequest::new(query, section, limit)?;
            let client = load_client(&config_path)?;
            let result = handle_search(&request, &client).await;
            if let Some(text) = result.first_text() {
                println!("{}", text);
            }
        }

        Commands::Init { force } => handle_init(config_path, force)?,
    }

    Ok(())
}

/// Load the config and build the search client from it
fn load_client(config_path: &Path) -> Result<RapidApiClient> {
    let config = Config::load(config_path)?;
    info!(
        "{}: {}",
        config.api_key_env,
        if config.has_api_key() {
            "Available"
        } else {
            "Missing"
        }
    );
    RapidApiClient::new(&config)
}

fn handle_init(config_path: PathBuf, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config file already exists at {}; use --force to overwrite",
            config_path.display()
        )));
    }

    let config = Config {
        config_file: config_path.clone(),
        ..Config::default()
    };
    config.save()?;

    println!("✓ tweetscout initialized");
    println!("  Config: {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. export {}=<your RapidAPI key>", config.api_key_env);
    println!("  2. Register `tweetscout serve` as an MCP server in your client");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["tweetscout"]).unwrap();
        assert!(matches!(
            cli.command.unwrap_or(Commands::Serve),
            Commands::Serve
        ));

        let cli = Cli::try_parse_from(["tweetscout", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_init_writes_config_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        handle_init(path.clone(), false).unwrap();
        assert!(Config::load(&path).is_ok());

        assert!(matches!(
            handle_init(path.clone(), false),
            Err(Error::Config(_))
        ));
        assert!(handle_init(path, true).is_ok());
    }
}
