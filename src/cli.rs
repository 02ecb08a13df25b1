use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a starter deck.toml config file
    Init {
        /// Overwrite an existing config file
        #[clap(long)]
        force: bool,
    },
    /// Builds cards, sprite sheets, and print documents from the config file
    Build,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Path to the deck configuration
    #[clap(short, long, default_value = "deck.toml", env = "CARD_DECK_CONFIG")]
    pub config: PathBuf,

    /// Log every tool invocation
    #[clap(short, long)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
