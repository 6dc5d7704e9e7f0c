use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tt", about = concat!("task-tracker v", env!("CARGO_PKG_VERSION"), " - open and completed tasks in two CSV files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the task stores (default: ~/.task-tracker)
    #[arg(short = 'D', long = "data-dir", global = true, env = "TASK_TRACKER_DIR")]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new task
    #[command(visible_alias = "c")]
    Create(CreateArgs),
    /// Remove a task from whichever store holds it
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),
    /// Change a task's title or replace its note
    #[command(visible_alias = "upd")]
    Update(UpdateArgs),
    /// Mark an open task completed
    #[command(visible_alias = "done")]
    Complete(CompleteArgs),
    /// Append a timestamped entry to a task's note
    #[command(visible_alias = "note")]
    Annotate(AnnotateArgs),
    /// List active tasks (or completed, or both)
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Show all details of a task, including the full note
    View(ViewArgs),
    /// Validate the stores
    Check,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CreateArgs {
    /// Task title
    pub title: String,
    /// Initial note
    #[arg(short, long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("fields").required(true).multiple(true)))]
pub struct UpdateArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(short, long, group = "fields")]
    pub title: Option<String>,
    /// Replace the whole note (use `annotate` to append instead)
    #[arg(short, long, group = "fields")]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Task ID
    pub id: String,
    /// Note text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Show completed tasks instead of active ones
    #[arg(short, long, conflicts_with = "all")]
    pub completed: bool,
    /// Show active and completed tasks
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ViewArgs {
    /// Task ID
    pub id: String,
}
