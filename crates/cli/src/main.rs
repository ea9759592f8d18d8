mod assistant;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    jarvis_common::Response,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use crate::assistant::Assistant;

#[derive(Parser)]
#[command(name = "jarvis", about = "Jarvis — plugin-driven desktop assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to load instead of discovering one.
    #[arg(long, global = true, env = "JARVIS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin until EOF or "quit" (default).
    Chat {
        /// Print full JSON responses instead of just the message.
        #[arg(long)]
        json: bool,
    },
    /// Run a single command and print the JSON response.
    Ask { message: String },
    /// List loaded plugins.
    Plugins,
    /// List the command patterns of active plugins.
    Commands,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<jarvis_config::JarvisConfig> {
    match &cli.config {
        Some(path) => jarvis_config::load_config(path),
        None => Ok(jarvis_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "jarvis starting");

    let config = load_config(&cli)?;
    let assistant = Assistant::start(&config).await;

    let result = match cli.command.unwrap_or(Commands::Chat { json: false }) {
        Commands::Chat { json } => chat(&assistant, json).await,
        Commands::Ask { message } => {
            let resp = assistant.process_command(&message, None).await;
            println!("{}", serde_json::to_string_pretty(&resp)?);
            Ok(())
        },
        Commands::Plugins => {
            let plugins = assistant.plugins().get_available_plugins().await;
            println!("{}", serde_json::to_string_pretty(&plugins)?);
            Ok(())
        },
        Commands::Commands => {
            for (name, table) in assistant.plugins().get_plugin_commands().await {
                println!("{name}");
                for (pattern, description) in table.iter() {
                    println!("  {pattern:<40} {description}");
                }
            }
            Ok(())
        },
    };

    assistant.shutdown().await;
    result
}

async fn chat(assistant: &Assistant, json: bool) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "quit" | "exit") {
            break;
        }
        let resp = assistant.process_command(text, None).await;
        print_response(&resp, json)?;
    }
    Ok(())
}

fn print_response(resp: &Response, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(resp)?);
    } else {
        println!("{}", resp.message);
    }
    Ok(())
}
