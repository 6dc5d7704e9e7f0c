use clap::{CommandFactory, Parser};
use task_tracker::cli::commands::Cli;
use task_tracker::cli::handlers;

fn main() {
    task_tracker::logging::init_logging();
    let cli = Cli::parse();

    if cli.command.is_none() {
        // No subcommand → usage, failing status
        let _ = Cli::command().print_help();
        println!();
        std::process::exit(1);
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
