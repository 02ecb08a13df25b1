use anyhow::{bail, Context, Result};
use card::FontRasterizer;
use catalog::Item;
use cli::Cli;
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::Pipeline;
use std::path::Path;
use std::process::ExitCode;

mod card;
mod catalog;
mod cli;
mod config;
mod pipeline;
mod sheets;
mod tools;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match &cli.command {
        cli::Commands::Init { force } => init(&cli.config, *force),
        cli::Commands::Build => build(&cli.config),
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    let mut config = Configuration::default();
    config
        .items
        .push(Item::new("MAGIC_BALL", "magic_ball.png").with_text("Magic Ball"));
    let contents =
        toml::to_string_pretty(&config).with_context(|| "Failed to serialize configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}

fn build(path: &Path) -> Result<()> {
    println!("Loading configuration...");
    let config = Configuration::load(path)?;
    let rasterizer = FontRasterizer::load(&config.font)
        .with_context(|| format!("Failed to load font {}", config.font.display()))?;
    let encoder = config.symbol_encoder();
    let sheets = config.sheet_tool();
    log::info!(
        "{} items, {} destinations, {:?} backend",
        config.items.len(),
        config.destinations.len(),
        config.backend
    );

    let pipeline = Pipeline::new(&config, &rasterizer, encoder.as_ref(), sheets.as_ref());
    let progress = ProgressBar::new(pipeline.card_count() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Composing cards...");

    let reports = pipeline
        .run(&progress)
        .with_context(|| "Failed to build deck")?;
    progress.finish_with_message("Cards composed");

    println!();
    for report in reports.iter() {
        println!("{}:", report.name);
        println!("  Cards:        {}", report.cards.len());
        println!("  Strips:       {}", report.partials.len());
        match (&report.full, &report.document) {
            (Some(full), Some(document)) => {
                println!("  Sprite sheet: {}", full.display());
                println!("  Print PDF:    {}", document.display());
            }
            _ => println!("  No cards, nothing to print"),
        }
    }

    Ok(())
}
