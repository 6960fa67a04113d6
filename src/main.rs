mod app;
mod cli;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{debug, info};

use app::CardioscopeApp;
use cli::Args;
use config::Config;
use state::AppState;
use views::respond;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(&args);

    init_logging(config.general.verbose);
    debug!("Arguments: {args:?}");

    match &args.query {
        Some(query) => run_query(&config, query),
        None => run_dashboard(config),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Headless mode: evaluate one request and print the JSON response.
fn run_query(config: &Config, query: &str) -> Result<()> {
    let path = config
        .data
        .path
        .as_deref()
        .context("--query needs a dataset (--data or data.path in the config)")?;
    let dataset = data::loader::load_file(path)
        .with_context(|| format!("loading dataset {}", path.display()))?;
    info!("Loaded {} records from {}", dataset.len(), path.display());

    let response = respond(&dataset, query, &config.view_settings());
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn run_dashboard(config: Config) -> Result<()> {
    let mut state = AppState::new(&config);

    if let Some(path) = &config.data.path {
        match data::loader::load_file(path) {
            Ok(dataset) => {
                info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.source_columns()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cardioscope – Análise de Doenças Cardíacas",
        options,
        Box::new(|_cc| Ok(Box::new(CardioscopeApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
