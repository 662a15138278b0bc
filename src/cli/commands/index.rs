//! Index command - rebuild the index from a document directory

use crate::cli::output::{colors, format_bytes, format_duration, print_warning};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::indexer::Indexer;
use crate::core::storage::TantivyBackend;
use crate::core::types::IndexStats;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory of documents to index (overrides source.doc_dir)
    pub doc_dir: Option<PathBuf>,

    /// Index directory (overrides index.index_dir)
    #[arg(long, short = 'o')]
    pub index_dir: Option<PathBuf>,

    /// Maximum file size in MB (overrides extractors.max_file_size_mb)
    #[arg(long)]
    pub max_file_size: Option<usize>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub doc_dir: String,
    pub index_dir: String,
    #[serde(flatten)]
    pub stats: IndexStats,
    pub index_documents: u64,
    pub index_size_bytes: u64,
    pub duration_secs: f64,
}

impl IndexArgs {
    /// Fold command-line overrides into the loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(doc_dir) = &self.doc_dir {
            config.source.doc_dir = Some(doc_dir.clone());
        }
        if let Some(index_dir) = &self.index_dir {
            config.index.index_dir = index_dir.clone();
        }
        if let Some(max_size) = self.max_file_size {
            config.extractors.max_file_size_mb = max_size;
        }
    }
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;

    if config.source.doc_dir.is_none() {
        return Err(
            "No document directory given. Pass one as an argument or set source.doc_dir \
             in the configuration file."
                .into(),
        );
    }

    let indexer = Indexer::from_config(&config)?;
    let doc_dir = indexer.doc_dir().to_path_buf();
    let index_dir = indexer.index_dir().to_path_buf();
    let cancel = indexer.cancel_token();

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}...",
            colors::file_path(&doc_dir.display().to_string()),
            colors::file_path(&index_dir.display().to_string())
        );
    }

    let mut run = tokio::task::spawn_blocking(move || {
        let mut indexer = indexer;
        indexer.create_index()
    });

    let stats = tokio::select! {
        joined = &mut run => joined??,
        _ = tokio::signal::ctrl_c() => {
            print_warning("Interrupted, discarding this run");
            cancel.cancel();
            run.await??
        }
    };

    let response = IndexResponse {
        doc_dir: doc_dir.to_string_lossy().into_owned(),
        index_dir: index_dir.to_string_lossy().into_owned(),
        index_documents: TantivyBackend::document_count(&index_dir)?,
        index_size_bytes: directory_size(&index_dir),
        duration_secs: stats.duration_ms as f64 / 1000.0,
        stats,
    };

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &IndexResponse) {
    let stats = &response.stats;
    println!(
        "{} {} documents from {} files in {}",
        colors::success("Indexed"),
        colors::number(&stats.documents_indexed.to_string()),
        colors::number(&stats.files_seen.to_string()),
        colors::number(&format_duration(response.duration_secs))
    );
    println!(
        "{} directories scanned, {} unsupported, {} failed",
        colors::number(&stats.directories_scanned.to_string()),
        colors::number(&stats.files_unsupported.to_string()),
        if stats.failures > 0 {
            colors::warning(&stats.failures.to_string())
        } else {
            colors::number(&stats.failures.to_string())
        }
    );
    println!(
        "Index: {} ({})",
        colors::file_path(&response.index_dir),
        colors::number(&format_bytes(response.index_size_bytes))
    );
}

/// Total size of the regular files under `dir`
fn directory_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
