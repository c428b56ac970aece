use clap::{Parser, Subcommand};
use eyre::{Result, eyre};
use std::path::PathBuf;
use tasklist::render::render_html;
use tasklist::terminal::{ConsoleSink, PromptGate, format_stats, format_task};
use tasklist::{Config, FilterMode, SqliteKv, TaskId, TaskStore};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - Manage a personal task list from the terminal")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: <data dir>/tasklist)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks, newest first
    List {
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },

    /// Add a task
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Mark a task completed, or pending again
    Toggle { id: TaskId },

    /// Replace a task's text
    Edit {
        id: TaskId,
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Delete a task
    Delete { id: TaskId },

    /// Delete all completed tasks
    ClearCompleted,

    /// Delete every task
    ClearAll,

    /// Put tasks in the given order
    Reorder {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },

    /// Move one task to a position (0 is the top)
    Move { id: TaskId, index: usize },

    /// Show task counts
    Stats,

    /// Print the list as an HTML fragment
    Render {
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let store_path = match cli.store_path {
        Some(path) => path,
        None => dirs::data_dir()
            .map(|dir| dir.join("tasklist"))
            .ok_or_else(|| eyre!("Could not determine a data directory; pass --store-path"))?,
    };

    let kv = SqliteKv::open(&store_path)?;
    let config = Config::load(&store_path)?;
    let mut store = TaskStore::new(kv, config, PromptGate::stdio(cli.yes), ConsoleSink::stderr());
    let loaded = store.load();
    debug!(?loaded, path = ?store_path, "Store ready");

    match cli.command {
        Commands::List { filter } => print_list(&store, filter),
        Commands::Add { text } => {
            store.add(&text.join(" "))?;
        }
        Commands::Toggle { id } => {
            if store.toggle(id) {
                if let Some(task) = store.get(id) {
                    println!("{}", format_task(task));
                }
            }
        }
        Commands::Edit { id, text } => {
            store.edit(id, &text.join(" "))?;
        }
        Commands::Delete { id } => {
            store.delete(id);
        }
        Commands::ClearCompleted => {
            store.clear_completed();
        }
        Commands::ClearAll => {
            store.clear_all();
        }
        Commands::Reorder { ids } => {
            store.reorder(&ids);
            print_list(&store, FilterMode::All);
        }
        Commands::Move { id, index } => {
            store.move_task(id, index);
            print_list(&store, FilterMode::All);
        }
        Commands::Stats => println!("{}", format_stats(&store.stats())),
        Commands::Render { filter } => print!("{}", render_html(&store.filter(filter))),
    }

    Ok(())
}

fn print_list(store: &TaskStore<SqliteKv>, filter: FilterMode) {
    let tasks = store.filter(filter);
    if tasks.is_empty() {
        match filter {
            FilterMode::All => println!("No tasks yet!"),
            _ => println!("No {} tasks", filter),
        }
        return;
    }

    for task in tasks {
        println!("{}", format_task(task));
    }
    println!();
    println!("{}", format_stats(&store.stats()));
}
