//! Config command - show current configuration

use crate::cli::output::{colors, print_header};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show where configuration is read from
    #[arg(long, short = 'p')]
    pub paths: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: args
            .paths
            .then(|| xdg.config_file().to_string_lossy().into_owned()),
        config,
    };

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            if let Some(file) = &response.config_file {
                println!("  config_file: {}", colors::file_path(file));
            }
            let doc_dir = config
                .source
                .doc_dir
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string());
            println!("  source:");
            println!("    doc_dir: {}", colors::file_path(&doc_dir));
            println!("  index:");
            println!(
                "    index_dir: {}",
                colors::file_path(&config.index.index_dir.display().to_string())
            );
            println!("    writer_heap_mb: {}", config.index.writer_heap_mb);
            println!("  extractors:");
            println!("    enabled: {:?}", config.extractors.enabled);
            println!("    text_patterns: {:?}", config.extractors.text_patterns);
            println!("    word_patterns: {:?}", config.extractors.word_patterns);
            println!("    max_file_size_mb: {}", config.extractors.max_file_size_mb);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
