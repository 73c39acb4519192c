pub mod commands;
pub mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use prompt::PromptStyle;

#[derive(Parser)]
#[command(name = "site-feed")]
#[command(about = "Static-site article catalog and RSS feed maintenance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Site root directory (overrides the configured one)
    #[arg(short, long, global = true)]
    pub site: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Disable colored prompts
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Canonicalize the catalog and regenerate the RSS feed from it
    Rebuild,

    /// Interactively register a new article
    Add {
        /// Insert the navigation link as the last list entry instead of the first
        #[arg(long)]
        at_end: bool,

        /// Skip the full feed rebuild after the incremental update
        #[arg(long)]
        no_rebuild: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        commands::init_logging(self.debug, self.verbose)?;

        let mut config = Config::resolve(self.config)?;
        if let Some(site) = self.site {
            config.site_root = site;
        }

        match self.command {
            Commands::Rebuild => commands::rebuild(&config),
            Commands::Add { at_end, no_rebuild } => {
                let style = PromptStyle::detect(self.no_color);
                commands::add(&config, &style, at_end, no_rebuild)
            }
        }
    }
}
