pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use procure_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "procure",
    about = "Procurement request client",
    long_about = "Create, track, and approve procurement requests against a PMS backend, \
                  with an offline write queue for flaky connectivity.",
    after_help = "Examples:\n  procure login ayse.demir\n  procure list --scope team --status pending --search drill\n  procure approve 42 --notes \"Budget ok\"\n  procure queue drain"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a procure.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Authenticate and persist the session tokens locally")]
    Login(commands::login::LoginArgs),
    #[command(about = "Drop the stored session")]
    Logout,
    #[command(about = "Show the signed-in user, resolved role, and visible tabs")]
    Whoami,
    #[command(about = "List requests with filtering, search, and pagination")]
    List(commands::list::ListArgs),
    #[command(about = "Show one request with its progress timeline and history")]
    Show(commands::show::ShowArgs),
    #[command(about = "Create a new draft request")]
    Create(commands::create::CreateArgs),
    #[command(about = "Submit a draft for approval")]
    Submit(commands::transition::IdArgs),
    #[command(about = "Approve a pending request")]
    Approve(commands::transition::NotesArgs),
    #[command(about = "Reject a request (the backend requires a reason)")]
    Reject(commands::transition::ReasonArgs),
    #[command(about = "Send a request back for revision")]
    Revise(commands::transition::NotesArgs),
    #[command(about = "Update purchasing progress (purchasing team only)")]
    Purchasing(commands::transition::PurchasingArgs),
    #[command(about = "Mark a delivered request as completed")]
    Complete(commands::transition::IdArgs),
    #[command(about = "Inspect or drain the offline write queue")]
    Queue {
        #[command(subcommand)]
        action: commands::queue::QueueAction,
    },
    #[command(about = "Inspect config and manage the backend base URL override")]
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    #[command(about = "Notification preferences and device test notifications")]
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    #[command(about = "Validate config, local state, and backend reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_max_level(log_level)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { log_level: cli.log_level.clone(), ..Default::default() },
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Login(args) => commands::login::run(config, args).await,
        Command::Logout => commands::login::logout(config).await,
        Command::Whoami => commands::whoami::run(config).await,
        Command::List(args) => commands::list::run(config, args).await,
        Command::Show(args) => commands::show::run(config, args).await,
        Command::Create(args) => commands::create::run(config, args).await,
        Command::Submit(args) => commands::transition::submit(config, args).await,
        Command::Approve(args) => commands::transition::approve(config, args).await,
        Command::Reject(args) => commands::transition::reject(config, args).await,
        Command::Revise(args) => commands::transition::revise(config, args).await,
        Command::Purchasing(args) => commands::transition::purchasing(config, args).await,
        Command::Complete(args) => commands::transition::complete(config, args).await,
        Command::Queue { action } => commands::queue::run(config, action).await,
        Command::Config { action } => commands::config::run(config, action).await,
        Command::Notify { action } => commands::notify::run(config, action).await,
        Command::Doctor { json } => commands::doctor::run(config, json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
