use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod nav;
mod remote;

use nav::{NavigationResolver, NavigationState};
use remote::{ConfigFetcher, HttpTransport, Transport};

/// Launchgate - resolves where the app starts: local interface or
/// remote-supplied destination
#[derive(Parser)]
#[command(name = "launchgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Custom configuration endpoint (for debugging/dev deployments only)
    #[arg(long, hide = true)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new().context("Failed to build HTTP transport")?);

    let resolver = Arc::new(match cli.endpoint {
        Some(endpoint) => NavigationResolver::with_fetcher(
            ConfigFetcher::with_endpoint(transport.clone(), endpoint),
            transport,
        ),
        None => NavigationResolver::new(transport),
    });

    // The load cycle runs on its own task; this loop plays the part of the
    // presentation layer, rendering whatever state the resolver publishes
    let mut updates = resolver.subscribe();
    tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.begin_load().await }
    });

    loop {
        match resolver.state() {
            NavigationState::Splash => {
                updates
                    .changed()
                    .await
                    .context("Resolver dropped while a cycle was in flight")?;
            }
            NavigationState::Primary => {
                println!("primary: showing the local interface");
                return Ok(());
            }
            NavigationState::Browser { destination } => {
                println!("browser: {}", destination);
                return Ok(());
            }
            NavigationState::Failure { message } => {
                eprintln!("❌ {}", message);

                print!("Retry? [y/N]: ");
                use std::io::{self, Write};
                io::stdout().flush()?;

                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                let answer = answer.trim().to_lowercase();

                if answer != "y" && answer != "yes" {
                    std::process::exit(1);
                }

                resolver.retry().await;
            }
        }
    }
}
