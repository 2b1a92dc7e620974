use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Granularity;
use crate::core::Engine;

#[derive(Parser)]
#[command(name = "javabind")]
#[command(about = "Generate statically typed bindings for JVM class libraries")]
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
    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Resolve the class closure and emit bindings
    Generate {
        /// Output directory (overrides the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output unit granularity, 'class' or 'package'
        #[arg(short, long, value_enum)]
        granularity: Option<Granularity>,

        /// Clear previous output before writing
        #[arg(long)]
        force: bool,
    },

    /// Reflect a single class and print its shape as JSON
    Inspect {
        /// Fully-qualified class name
        class: String,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => engine.init(path).await,
            Commands::Generate {
                output,
                granularity,
                force,
            } => engine.generate(output, granularity, force).await,
            Commands::Inspect { class } => engine.inspect(&class).await,
        }
    }
}
