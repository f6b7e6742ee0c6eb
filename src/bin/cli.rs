//! CLI binary for autogoal.

use autogoal::ConversationLog;
use autogoal::config::AppConfig;
use autogoal::goals::read_goals_from_file;
use autogoal::inference::{EndpointStatus, InferenceClient};
use autogoal::session::submit_goal;
use autogoal::ui::render::ASSISTANT_LABEL;
use autogoal::ui::{App, Console};
use autogoal::voice::VoiceCapability;
use autogoal::voice::capture::MicrophoneCapture;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Send goals to a local language model by typing, speaking, or picking them from a file.
#[derive(Parser)]
#[command(name = "autogoal", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Goal file to offer in "From File" mode.
    #[arg(long)]
    goals: Option<PathBuf>,

    /// Base URL of the inference server.
    #[arg(long)]
    api_url: Option<String>,

    /// Model name sent with each goal.
    #[arg(short, long)]
    model: Option<String>,

    /// Skip voice detection entirely.
    #[arg(long)]
    no_voice: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Interactive session (default).
    Chat,

    /// Submit one goal and print the reply.
    Ask {
        /// The goal text.
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },

    /// Print the goals found in the goal file.
    Goals,

    /// List available microphones.
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so the page on stdout stays readable.
    // Override with RUST_LOG=autogoal=debug.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autogoal=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(config).await,
        Command::Ask { goal } => run_ask(config, &goal.join(" ")).await,
        Command::Goals => list_goals(&config),
        Command::Devices => list_devices(),
    }
}

/// Explicit `--config` must load; otherwise use the default path if present.
/// Command-line flags win over the file.
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = if let Some(ref path) = cli.config {
        AppConfig::from_file(path)?
    } else {
        let path = AppConfig::default_config_path();
        if path.exists() {
            info!("loading config from {}", path.display());
            AppConfig::from_file(&path)?
        } else {
            AppConfig::default()
        }
    };

    if let Some(ref goals) = cli.goals {
        config.goals.file = goals.clone();
    }
    if let Some(ref url) = cli.api_url {
        config.inference.api_url = url.clone();
    }
    if let Some(ref model) = cli.model {
        config.inference.model = model.clone();
    }
    if cli.no_voice {
        config.voice.enabled = false;
    }

    Ok(config)
}

async fn run_chat(config: AppConfig) -> anyhow::Result<ExitCode> {
    let client = InferenceClient::new(&config.inference)?;
    check_endpoint(&client).await;

    let voice = VoiceCapability::detect(&config.voice);
    let app = App::new(Box::new(client), voice, config.goals.file);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut console = Console::new(stdin, std::io::stdout());
    let mut log = ConversationLog::new();

    app.run(&mut console, &mut log).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_ask(config: AppConfig, goal: &str) -> anyhow::Result<ExitCode> {
    let client = InferenceClient::new(&config.inference)?;
    let voice = VoiceCapability::detect(&config.voice);
    let mut log = ConversationLog::new();

    let exchange = submit_goal(&client, &mut log, goal).await;
    match exchange.answer() {
        Some(reply) => {
            println!("{ASSISTANT_LABEL}: {reply}");
            voice.speak(reply).await;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", exchange.display_text());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Warn early when the model server is down or lacks the model. Never fatal.
async fn check_endpoint(client: &InferenceClient) {
    match client.probe().await {
        status @ EndpointStatus::Available { .. } => {
            if !status.has_model(client.model()) {
                warn!(
                    "model '{}' is not installed on {}; try `ollama pull {}`",
                    client.model(),
                    client.api_url(),
                    client.model()
                );
            }
        }
        status => warn!("inference endpoint {} is {status}", client.api_url()),
    }
}

fn list_goals(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let goals = read_goals_from_file(&config.goals.file)?;
    if goals.is_empty() {
        println!(
            "No goals found in {} (missing or empty).",
            config.goals.file.display()
        );
    }
    for (i, goal) in goals.iter().enumerate() {
        println!("{:>3}. {goal}", i + 1);
    }
    Ok(ExitCode::SUCCESS)
}

fn list_devices() -> anyhow::Result<ExitCode> {
    println!("Input devices:");
    for name in MicrophoneCapture::list_input_devices()? {
        println!("  - {name}");
    }
    Ok(ExitCode::SUCCESS)
}
