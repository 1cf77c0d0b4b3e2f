//! create-go-api - Project scaffolding for Go API services

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use goapi_core::tui::{self, CreateArgs};
use goapi_core::{fly_tool, DatabaseKind, Framework, ProductConfig, ProjectConfig, ToolManager};
use rust_embed::RustEmbed;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file
const LOG_FILE_ENV: &str = "CREATE_GO_API_LOG";

/// The Go API catalog, bundled at build time
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates/go-api/"]
pub struct GoApiTemplates;

/// create-go-api product configuration
#[derive(Clone)]
pub struct GoApiConfig;

impl ProductConfig for GoApiConfig {
    type Templates = GoApiTemplates;

    fn name(&self) -> &'static str {
        "create-go-api"
    }

    fn display_name(&self) -> &'static str {
        "Create Go API"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding production-ready Go API services"
    }

    fn template_dir_env(&self) -> &'static str {
        "CREATE_GO_API_TEMPLATE_DIR"
    }

    fn default_project_name(&self) -> &'static str {
        "my-api"
    }

    fn module_prefix(&self) -> &'static str {
        "github.com/user"
    }

    fn deploy_tool(&self) -> ToolManager {
        fly_tool()
    }

    fn next_steps(&self, config: &ProjectConfig) -> Vec<String> {
        let mut steps = vec![
            format!("cd {}", config.output_dir.display()),
            "make deps".to_string(),
        ];

        if config.is_postgres() {
            steps.push("make db-up && make migrate".to_string());
        } else {
            steps.push("make db-up".to_string());
        }

        steps.push("make run".to_string());

        if config.deploy_enabled {
            steps.push("make deploy".to_string());
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-go-api")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Go API project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project name; omit to run the interactive wizard
    #[arg(short, long)]
    pub name: Option<String>,

    /// Database driver
    #[arg(long, value_enum, default_value_t = DatabaseKind::Postgres)]
    pub driver: DatabaseKind,

    /// API framework
    #[arg(long, value_enum, default_value_t = Framework::Chi)]
    pub framework: Framework,

    /// Go module path (default: github.com/user/<name>)
    #[arg(long = "module-path")]
    pub module_path: Option<String>,

    /// Output directory (default: <name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generate Fly.io deployment files
    #[arg(long)]
    pub deploy: bool,

    /// AWS region for DynamoDB projects
    #[arg(long = "aws-region")]
    pub aws_region: Option<String>,

    /// Local directory to use for templates instead of the bundled catalog (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Run the interactive wizard even when flags are given
    #[arg(short, long)]
    pub interactive: bool,
}

/// Command-line definition with the product's description
fn cli(config: &GoApiConfig) -> clap::Command {
    Args::command().about(config.cli_description())
}

/// Send logs to a file; the wizard owns the terminal
fn init_logging() -> Result<()> {
    let path = std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("create-go-api.log"));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

async fn run(config: &GoApiConfig, args: Args) -> Result<()> {
    match args.command {
        Some(Command::Create(create_args)) => match create_args.name {
            Some(name) if !create_args.interactive => {
                let create = CreateArgs {
                    name,
                    database: create_args.driver,
                    framework: create_args.framework,
                    module_path: create_args.module_path,
                    output: create_args.output,
                    deploy: create_args.deploy,
                    aws_region: create_args.aws_region,
                    template_dir: create_args.template_dir,
                };
                tui::run_create(config, create).await
            }
            _ => tui::run_wizard(config, create_args.template_dir).await,
        },
        // No subcommand provided, default to the interactive wizard
        None => tui::run_wizard(config, None).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure the terminal is usable again on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = tui::restore_terminal();
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully outside raw mode
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    if let Err(error) = init_logging() {
        eprintln!("warning: logging disabled: {error:#}");
    }

    let config = GoApiConfig;
    let args = Args::from_arg_matches(&cli(&config).get_matches()).unwrap_or_else(|e| e.exit());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting {}", config.name());

    let result = run(&config, args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(error) = &result {
        tracing::error!("{error:#}");
    }
    result
}
