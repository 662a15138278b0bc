//! Tests for the show-config CLI command

use recipe_index::cli::commands::config::{execute, ConfigArgs};
use recipe_index::cli::OutputFormat;
use recipe_index::core::config::Config;
use recipe_index::core::xdg::XdgDirs;
use std::fs;

#[test]
fn test_show_config_human() {
    let temp = tempfile::tempdir().unwrap();
    let xdg = XdgDirs::with_root(temp.path());

    let result = execute(
        ConfigArgs { paths: false },
        &Config::default(),
        &xdg,
        OutputFormat::Human,
    );
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json_with_paths() {
    let temp = tempfile::tempdir().unwrap();
    let xdg = XdgDirs::with_root(temp.path());

    let result = execute(
        ConfigArgs { paths: true },
        &Config::default(),
        &xdg,
        OutputFormat::Json,
    );
    assert!(result.is_ok());
}

#[test]
#[serial_test::serial]
fn test_show_config_from_xdg_file() {
    let temp = tempfile::tempdir().unwrap();
    let xdg = XdgDirs::with_root(temp.path());
    xdg.ensure_dirs_exist().unwrap();
    fs::write(
        xdg.config_file(),
        "[source]\ndoc_dir = \"/home/cook/recipes\"\n\n[extractors]\nmax_file_size_mb = 4\n",
    )
    .unwrap();

    let config = Config::load_with_xdg(None, &xdg).unwrap();

    assert_eq!(
        config.source.doc_dir.as_deref(),
        Some(std::path::Path::new("/home/cook/recipes"))
    );
    assert_eq!(config.extractors.max_file_size_mb, 4);
    assert_eq!(config.index.index_dir, xdg.index_dir());
    execute(ConfigArgs { paths: true }, &config, &xdg, OutputFormat::Human).unwrap();
}
