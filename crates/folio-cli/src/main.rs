//! folio CLI: Command-line interface for the portfolio chat assistant

use clap::{Parser, Subcommand};
use folio_engine::{
    ChatTransport, Config, ConversationController, Environment, HttpTransport, LoggingTransport,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Chat with a portfolio owner's assistant from the terminal
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Which chat endpoint to use (development or production)
    #[arg(long, global = true)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask a single question and print the reply
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,

        /// Print the whole transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

const DEFAULT_CONFIG_PATH: &str = ".folio/config.json";

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(is_tui);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    if let Some(Commands::Init { force }) = cli.command {
        return cmd_init(&cli.config, force);
    }

    let config = resolve_config(&cli.config, cli.env, |key| std::env::var(key).ok())?;

    match cli.command {
        None | Some(Commands::Tui) => {
            let transport = build_transport(&config)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(folio_tui::run_tui(&config, transport))
        }
        Some(Commands::Ask { words, json }) => {
            let transport = build_transport(&config)?;
            let rt = tokio::runtime::Runtime::new()?;
            let controller = rt.block_on(ask(&config, transport, &words.join(" ")))?;
            print_answer(&controller, json)
        }
        Some(Commands::Config { json }) => cmd_config(&config, json),
        Some(Commands::Init { .. }) => Ok(()),
    }
}

/// Install the tracing subscriber.
///
/// Line commands log to stderr. The TUI owns the terminal, so it only
/// logs when `FOLIO_LOG_FILE` names a file to write to.
fn init_logging(is_tui: bool) {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=warn"));

    if !is_tui {
        tracing_subscriber::registry()
            .with(filter())
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return;
    }

    let Some(path) = std::env::var_os("FOLIO_LOG_FILE") else {
        return;
    };
    match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.to_string_lossy()),
    }
}

/// Load the config file and layer environment variables and flags on top.
///
/// Precedence, lowest first: file, `FOLIO_ENV`, `FOLIO_CHAT_URL`, `--env`.
///
/// A missing file at the default location falls back to defaults; a
/// missing file anywhere else is an error.
fn resolve_config(
    path: &Path,
    env_flag: Option<Environment>,
    var: impl Fn(&str) -> Option<String>,
) -> CliResult<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else if path == Path::new(DEFAULT_CONFIG_PATH) {
        Config::default()
    } else {
        return Err(format!("config file not found: {}", path.display()).into());
    };

    if let Some(name) = var("FOLIO_ENV").filter(|v| !v.is_empty()) {
        config = config.with_environment(name.parse()?);
    }
    if let Some(url) = var("FOLIO_CHAT_URL").filter(|v| !v.is_empty()) {
        config = config.with_transport_url(url);
    }
    if let Some(environment) = env_flag {
        // An explicit --env unpins any URL set by the file or FOLIO_CHAT_URL.
        config = config.with_environment(environment);
        config.transport_url = None;
    }

    tracing::debug!(
        environment = %config.environment,
        endpoint = config.resolve_url(),
        timeout_seconds = config.timeout_seconds,
        "resolved configuration"
    );
    Ok(config)
}

fn build_transport(config: &Config) -> CliResult<Arc<dyn ChatTransport>> {
    let http = HttpTransport::new(config.resolve_url(), config.request_timeout())?;
    Ok(Arc::new(LoggingTransport::new(Arc::new(http))))
}

/// Run one exchange through a fresh conversation.
async fn ask(
    config: &Config,
    transport: Arc<dyn ChatTransport>,
    question: &str,
) -> CliResult<ConversationController> {
    let mut controller = ConversationController::new(config.chat_config(), transport);
    controller.open();
    if !controller.submit(question) {
        return Err("nothing to ask".into());
    }
    controller.settle().await;
    Ok(controller)
}

fn print_answer(controller: &ConversationController, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(controller.transcript())?);
    } else if let Some(reply) = controller.last_reply() {
        println!("{reply}");
    }
    Ok(())
}

fn cmd_config(config: &Config, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let timeout = match config.request_timeout() {
        Some(t) => format!("{}s", t.as_secs()),
        None => "none".to_string(),
    };

    println!("Configuration\n");
    println!("  Environment:  {}", config.environment);
    println!("  Endpoint:     {}", config.resolve_url());
    println!("  Timeout:      {timeout}");
    println!("  Owner:        {}", config.profile.name);
    println!("  Contact:      {}", config.profile.email);
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> CliResult {
    if path.exists() && !force {
        println!("{} already exists (use --force to overwrite)", path.display());
        return Ok(());
    }

    Config::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
