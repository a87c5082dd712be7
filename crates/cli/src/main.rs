use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scriptdeck_engine::{MockExecutor, ScriptExecutor};
use scriptdeck_registry::{RegistryConfig, ScriptRegistry};
use scriptdeck_util::expand_tilde;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable naming the TUI log file.
const LOG_PATH_ENV: &str = "SCRIPTDECK_LOG_PATH";

#[derive(Debug, Parser)]
#[command(name = "scriptdeck", version, about = "Browse a script catalog and run its actions")]
struct Cli {
    /// Catalog file path or http(s) URL; overrides the configured source
    #[arg(long, global = true, value_name = "SOURCE")]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the category tree
    Tree,
    /// Print a script's metadata and actions
    Show {
        /// Script id, or `path/id` when ids repeat
        script: String,
    },
    /// Print the validation schema generated for an action
    Schema { script: String, action: String },
    /// Fill in and execute an action without the TUI
    Run(RunArgs),
    /// Fuzzy search scripts by path, name, description and action
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    script: String,
    action: String,
    /// Parameter value as `key=value`; repeatable
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE", value_parser = commands::parse_key_value)]
    params: Vec<(String, String)>,
    #[arg(long)]
    team: Option<String>,
    #[arg(long)]
    project: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Held for the lifetime of the process so buffered log lines get flushed.
    let _log_guard = init_tracing(cli.command.is_none())?;

    let config = RegistryConfig::load().with_catalog_source(cli.catalog.as_deref());
    let executor: Arc<dyn ScriptExecutor> = Arc::new(MockExecutor::from_config(&config.executor));
    let registry = ScriptRegistry::load(config).await;

    // No subcommands => TUI
    let Some(command) = cli.command else {
        return scriptdeck_tui::run(registry, executor).await;
    };

    // A failed load leaves an empty catalog; say so once and carry on.
    if let Some(message) = registry.load_error.as_deref() {
        eprintln!("{message}");
    }
    dispatch(&registry, executor.as_ref(), command).await
}

async fn dispatch(registry: &ScriptRegistry, executor: &dyn ScriptExecutor, command: Command) -> Result<()> {
    match command {
        Command::Tree => print!("{}", commands::render_tree(&registry.catalog)),
        Command::Show { script } => print!("{}", commands::render_script(commands::find_script(registry, &script)?)),
        Command::Schema { script, action } => {
            let schema = commands::action_schema(registry, &script, &action)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Search { query } => print!("{}", commands::render_search(registry, &query.join(" "))),
        Command::Run(args) => {
            let request = commands::RunRequest {
                script: args.script,
                action: args.action,
                params: args.params,
                team: args.team,
                project: args.project,
                confirmed: args.yes,
            };
            commands::run_script(registry, executor, request).await?;
        }
    }
    Ok(())
}

/// Installs the global subscriber. The TUI owns the terminal, so in that
/// mode events go to a log file instead of stderr.
fn init_tracing(tui: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !tui {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(None);
    }

    let path = log_path();
    let directory = path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&directory).with_context(|| format!("creating log directory {}", directory.display()))?;
    let file_name = path.file_name().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("scriptdeck.log"));
    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(Some(guard))
}

fn log_path() -> PathBuf {
    if let Ok(path) = std::env::var(LOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(path.trim());
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scriptdeck")
        .join("scriptdeck.log")
}
