//! recipe-index - rebuild a full-text index from a document directory
//!
//! # Examples
//!
//! ```bash
//! # Index a recipe folder into the default index location
//! recipe-index index ~/recipes
//!
//! # Explicit index directory, JSON summary and JSON logs
//! recipe-index index ~/recipes --index-dir /var/lib/recipes --format json --log-format json
//!
//! # Show configuration
//! recipe-index show-config --paths
//! ```

use clap::Parser;
use recipe_index::cli::output::print_error;
use recipe_index::cli::{run, Cli, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "recipe_index=info".into()),
    );

    // stdout is reserved for command output
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
