//! dashchat command-line entry.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashchat_lib::engine::{paths, providers};
use dashchat_lib::{AppConfig, Theme, WebChat};
use log::info;

#[derive(Parser)]
#[command(name = "dashchat")]
#[command(version)]
#[command(about = "Chat with a DashScope model from the browser or the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web chat server until Ctrl-C
    Serve {
        /// Config file (default: platform config dir, or DASHCHAT_CONFIG)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Address to bind, e.g. 0.0.0.0 for LAN access
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
        /// Port to listen on (0 picks a free port)
        #[arg(long)]
        port: Option<u16>,
        /// Page title
        #[arg(long)]
        title: Option<String>,
        /// Initial page theme (light, dark)
        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Format reply text as chat HTML (reads FILE or stdin)
    Format {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Send one message and print the reply
    Ask {
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Print the model's text instead of formatted HTML
        #[arg(long)]
        raw: bool,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the resolved config file path
    Path,
    /// Print the effective config with the API key masked
    Show {
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let path = path.unwrap_or_else(paths::config_path);
    AppConfig::load(&path).with_context(|| format!("failed to load config from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind, port, title, theme } => {
            let mut config = load_config(config)?;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(title) = title {
                config.server.page_title = title;
            }
            if let Some(theme) = theme {
                config.server.theme = theme;
            }
            serve(config).await
        }
        Commands::Format { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                    buf
                }
            };
            println!("{}", dashchat_lib::format_message(text.as_str()));
            Ok(())
        }
        Commands::Ask { config, raw, text } => {
            let config = load_config(config)?;
            let provider = providers::from_config(&config.provider)?;
            match provider.generate(&text.join(" ")).await {
                Ok(reply) if raw => println!("{}", reply),
                Ok(reply) => println!("{}", dashchat_lib::format_message(reply.as_str())),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Config { command: ConfigCommands::Path } => {
            println!("{}", paths::config_path().display());
            Ok(())
        }
        Commands::Config { command: ConfigCommands::Show { config } } => {
            let config = load_config(config)?;
            print!("{}", config.redacted().to_toml_string()?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let provider = providers::from_config(&config.provider)?;
    let chat = WebChat::bind(config.server.clone(), provider).await?;
    let handle = chat.handle()?;
    println!("Chat ready at http://{}", handle.status().address);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("[cli] Ctrl-C received, shutting down");
            handle.stop();
        }
    });

    chat.serve().await?;
    Ok(())
}
