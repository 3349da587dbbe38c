use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use redirect_proxy::config::RedirectsConfig;
use redirect_proxy::engine::{RedirectEngine, RedirectRule, ResolutionOutcome, ResolvedRequest};

#[derive(Parser)]
#[command(name = "redirects-cli")]
#[command(about = "Operator CLI for the redirect proxy rule store", long_about = None)]
struct Cli {
    /// Base URL of the rule key-value store.
    #[arg(short, long, default_value = "http://localhost:7700/rules")]
    store: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a site's stored rule catalog
    Rules {
        /// Site key the catalog is stored under
        site_key: String,
    },
    /// Publish a rules JSON file to the store
    Publish {
        /// Site key to store the catalog under
        site_key: String,
        /// Path to a JSON array of redirect rules
        file: PathBuf,
    },
    /// Resolve a request offline against a local rules file
    Resolve {
        /// Path to a JSON array of redirect rules
        file: PathBuf,
        /// Request path, e.g. /old-page/
        path: String,
        /// Query string without the leading `?`
        #[arg(short, long, default_value = "")]
        query: String,
        /// Request locale
        #[arg(short, long, default_value = "en")]
        locale: String,
        /// Request hostname
        #[arg(long, default_value = "localhost")]
        hostname: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let store = cli.store.trim_end_matches('/').to_string();

    match cli.command {
        Commands::Rules { site_key } => {
            let res = client
                .get(format!("{}/{}", store, site_key))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Publish { site_key, file } => {
            let content = std::fs::read_to_string(&file)?;
            let rules: Vec<RedirectRule> = serde_json::from_str(&content)?;
            let res = client
                .put(format!("{}/{}", store, site_key))
                .json(&rules)
                .send()
                .await?;
            println!("Published {} rules: {}", rules.len(), res.status());
        }
        Commands::Resolve {
            file,
            path,
            query,
            locale,
            hostname,
        } => {
            let content = std::fs::read_to_string(&file)?;
            let rules: Vec<RedirectRule> = serde_json::from_str(&content)?;

            let engine = RedirectEngine::new(&RedirectsConfig::default());
            let request = ResolvedRequest {
                path,
                query,
                locale: locale.clone(),
                hostname,
            };

            match engine.resolve(&rules, &request, &locale) {
                ResolutionOutcome::Redirect { url, status } => {
                    println!("{} -> {}", status.as_u16(), url);
                }
                ResolutionOutcome::Rewrite { url } => {
                    println!("rewrite -> {}", url);
                }
                ResolutionOutcome::Pass => println!("pass"),
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: store returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
