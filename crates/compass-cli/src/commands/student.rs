//! Student view commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use compass_core::student::StudentFilter;

use crate::output;

#[derive(Subcommand)]
pub enum StudentCommands {
    /// List students
    List(ListStudentsArgs),

    /// Show a single student
    Show(ShowStudentArgs),
}

#[derive(Args)]
pub struct ListStudentsArgs {
    /// Filter by grade
    #[arg(long)]
    pub grade: Option<String>,

    /// Filter by class
    #[arg(long)]
    pub class: Option<String>,

    /// Search by name or student number
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Page size
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowStudentArgs {
    /// Student ID
    pub id: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(cmd: StudentCommands, redis_url: &str) -> Result<()> {
    let pool = compass_redis::init_pool(redis_url).await?;

    match cmd {
        StudentCommands::List(args) => {
            let filter = StudentFilter {
                grade: args.grade,
                class: args.class,
                search: args.search,
                page: Some(args.page),
                limit: Some(args.limit),
            };
            let page = compass_core::student::list_students(&pool, &filter).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                output::print_students_table(&page);
            }
        }

        StudentCommands::Show(args) => {
            let student = compass_core::student::get_student(&pool, &args.id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&student)?);
            } else {
                output::print_student(&student);
            }
        }
    }

    Ok(())
}
