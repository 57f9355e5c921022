//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod pathway;
pub mod serve;
pub mod student;

/// Compass - University Admission Pathway Portal
#[derive(Parser)]
#[command(name = "compass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Redis connection URL
    #[arg(
        long,
        global = true,
        env = "REDIS_URL",
        default_value = "redis://127.0.0.1:6379"
    )]
    pub redis_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(serve::ServeArgs),

    /// Student views
    #[command(subcommand)]
    Student(student::StudentCommands),

    /// Pathway views
    #[command(subcommand)]
    Pathway(pathway::PathwayCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, &self.redis_url).await,
            Commands::Student(cmd) => student::execute(cmd, &self.redis_url).await,
            Commands::Pathway(cmd) => pathway::execute(cmd, &self.redis_url).await,
        }
    }
}
