use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store_io::{RecordStore, StorePaths};
use crate::model::config::TrackerConfig;
use crate::ops::check;
use crate::ops::task_ops::{self, ListScope, TaskUpdate};

/// Everything a command needs, resolved once per invocation
pub struct Context {
    pub store: RecordStore,
    pub config: TrackerConfig,
    pub json: bool,
}

impl Context {
    /// Resolve the data directory, read the config and make sure both store
    /// files exist.
    pub fn open(data_dir: Option<&str>, json: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let paths = StorePaths::in_dir(&config_io::resolve_data_dir(data_dir));
        let store = RecordStore::new(paths);
        store.ensure_initialized()?;
        let config = config_io::read_config(store.paths())?;
        tracing::debug!(data_dir = %store.paths().data_dir.display(), "opened stores");
        Ok(Context {
            store,
            config,
            json,
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        return Err("no command given (try `tt --help`)".into());
    };
    let ctx = Context::open(cli.data_dir.as_deref(), cli.json)?;

    match command {
        // Write commands
        Commands::Create(args) => cmd_create(&ctx, args),
        Commands::Remove(args) => cmd_remove(&ctx, args),
        Commands::Update(args) => cmd_update(&ctx, args),
        Commands::Complete(args) => cmd_complete(&ctx, args),
        Commands::Annotate(args) => cmd_annotate(&ctx, args),

        // Read commands
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::View(args) => cmd_view(&ctx, args),
        Commands::Check => cmd_check(&ctx),
    }
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_create(ctx: &Context, args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let note = args.note.unwrap_or_default();
    let id = task_ops::create_task(&ctx.store, &args.title, &note)?;
    println!("Task created with ID: {}", id);
    Ok(())
}

fn cmd_remove(ctx: &Context, args: RemoveArgs) -> Result<(), Box<dyn std::error::Error>> {
    task_ops::remove_task(&ctx.store, &args.id)?;
    println!("Task {} has been removed.", args.id);
    Ok(())
}

fn cmd_update(ctx: &Context, args: UpdateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let update = TaskUpdate {
        title: args.title,
        note: args.note,
    };
    task_ops::update_task(&ctx.store, &args.id, update)?;
    println!("Task {} has been updated.", args.id);
    Ok(())
}

fn cmd_complete(ctx: &Context, args: CompleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    task_ops::complete_task(&ctx.store, &args.id)?;
    println!("Task {} has been marked as completed.", args.id);
    Ok(())
}

fn cmd_annotate(ctx: &Context, args: AnnotateArgs) -> Result<(), Box<dyn std::error::Error>> {
    task_ops::annotate_task(&ctx.store, &args.id, &args.text)?;
    println!("Note added to task {}.", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let scope = if args.all {
        ListScope::All
    } else if args.completed {
        ListScope::Completed
    } else {
        ListScope::Active
    };
    let sections = task_ops::list_tasks(&ctx.store, scope);

    if ctx.json {
        let listing: Vec<StoreListingJson> = sections
            .iter()
            .map(|(kind, tasks)| StoreListingJson {
                store: *kind,
                tasks,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let note_width = ctx.config.display.note_width;
    for (i, (kind, tasks)) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_task_section(*kind, tasks, note_width) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_view(ctx: &Context, args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (kind, task) = task_ops::view_task(&ctx.store, &args.id)?;

    if ctx.json {
        let detail = TaskDetailJson {
            store: kind,
            task: &task,
        };
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        for line in format_task_detail(&task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let result = check::check_stores(&ctx.store)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_check_result(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}
