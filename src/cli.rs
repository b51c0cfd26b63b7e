use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "javadep")]
#[command(about = "Map the internal dependency graph of a Java source tree")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a source tree and print the dependency report
    Scan {
        /// Source directory to analyze
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Package prefix marking types as project-internal (e.g. com.example)
        #[arg(short, long)]
        package_prefix: Option<String>,

        /// Also pick up same-package usages via the class-reference heuristic
        #[arg(long)]
        references: bool,

        /// Omit the reverse (who-uses-me) index
        #[arg(long)]
        no_reverse: bool,
    },

    /// Scan, then ask the configured LLM for refactoring advice
    Advise {
        /// Source directory to analyze
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Package prefix marking types as project-internal
        #[arg(short, long)]
        package_prefix: Option<String>,

        /// Also pick up same-package usages via the class-reference heuristic
        #[arg(long)]
        references: bool,

        /// Omit the reverse (who-uses-me) index
        #[arg(long)]
        no_reverse: bool,
    },

    /// Write a default Javadep.toml configuration file
    Init {
        /// Target path (defaults to ./Javadep.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Scan { source, package_prefix, references, no_reverse } => {
                engine.scan(source, package_prefix, references, no_reverse).await
            }
            Commands::Advise { source, package_prefix, references, no_reverse } => {
                engine.advise(source, package_prefix, references, no_reverse).await
            }
            Commands::Init { path } => {
                engine.init(path).await
            }
        }
    }
}
