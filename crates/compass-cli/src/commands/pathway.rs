//! Pathway view commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use compass_core::pathway::PathwayView;

use crate::output;

#[derive(Subcommand)]
pub enum PathwayCommands {
    /// Show a pathway with its milestones
    Show(ShowPathwayArgs),

    /// Show a student's active pathway
    Active(ActivePathwayArgs),

    /// List all of a student's pathways, active and retired
    List(ListPathwaysArgs),
}

#[derive(Args)]
pub struct ShowPathwayArgs {
    /// Pathway ID
    pub id: String,

    /// Print as JSON (includes the derived overall progress)
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ActivePathwayArgs {
    /// Student ID
    pub student_id: String,

    /// Print as JSON (includes the derived overall progress)
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListPathwaysArgs {
    /// Student ID
    pub student_id: String,
}

pub async fn execute(cmd: PathwayCommands, redis_url: &str) -> Result<()> {
    let pool = compass_redis::init_pool(redis_url).await?;

    match cmd {
        PathwayCommands::Show(args) => {
            let pathway = compass_core::pathway::get_pathway(&pool, &args.id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&PathwayView::from(pathway))?);
            } else {
                output::print_pathway(&pathway);
            }
        }

        PathwayCommands::Active(args) => {
            match compass_core::pathway::get_active_pathway(&pool, &args.student_id).await? {
                Some(pathway) if args.json => {
                    println!("{}", serde_json::to_string_pretty(&PathwayView::from(pathway))?);
                }
                Some(pathway) => output::print_pathway(&pathway),
                None => println!("{}", "No active pathway for this student.".dimmed()),
            }
        }

        PathwayCommands::List(args) => {
            let pathways = compass_core::pathway::list_pathways(&pool, &args.student_id).await?;
            output::print_pathways_table(&pathways);
        }
    }

    Ok(())
}
