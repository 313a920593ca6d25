//! Portal - terminal front-end for the $BSA token
//!
//! ## Commands
//!
//! - **enter**: boot splash, site links and menu
//! - **holders**: live holder count, printed on every change
//! - **info**: token info panel
//! - **chat**: persona chat terminal
//! - **docs**: project documentation
//! - **agent**: agent creator form

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use portal::agent_creator::{AgentCreator, CreatorTimings, FormField};
use portal::chat::{ChatSession, ChatSettings, OpenAiCompleter};
use portal::config::Config;
use portal::docs::{DocsModal, DocsSection, DocsTheme};
use portal::holders::{HolderCountPoller, PollerSettings, SolanaHolderSource};
use portal::landing::{site_links, Splash, ENTER_LABEL};
use portal::token_info::{format_thousands, TokenInfoPanel};
use portal::{endpoints, HolderCount};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "portal.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Serve Prometheus metrics regardless of config
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the boot splash, then an interactive menu
    Enter,
    /// Poll the holder count until interrupted
    Holders,
    /// Show the token info panel
    Info,
    /// Open the chat terminal
    Chat,
    /// Print project documentation
    Docs {
        /// Section to show (overview, mission, architecture, features, roadmap)
        #[arg(short, long, default_value = "overview")]
        section: DocsSection,

        /// Color theme (amber or green)
        #[arg(short, long, default_value = "amber")]
        theme: String,
    },
    /// Fill in and submit the agent creator form
    Agent,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs)?;

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    let config = load_config(&args.config)?;

    if args.metrics || config.monitoring.enable_metrics {
        let port = config.monitoring.metrics_port;
        info!("Starting metrics server on port {}", port);
        tokio::spawn(async move {
            if let Err(e) = endpoints::endpoint_server(port).await {
                error!("Metrics server error: {}", e);
            }
        });
    }

    let mut lines = stdin_lines();
    match args.command {
        Command::Enter => run_enter(&config, &mut lines).await,
        Command::Holders => run_holders(&config).await,
        Command::Info => run_info(&config).await,
        Command::Chat => run_chat(&config, &mut lines).await,
        Command::Docs { section, theme } => run_docs(section, &theme),
        Command::Agent => run_agent(&config, &mut lines).await,
    }
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = if verbose {
        "portal=debug,info"
    } else {
        "portal=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Config::with_env_overrides()
    }
}

fn holder_poller(config: &Config) -> Result<HolderCountPoller> {
    let source = SolanaHolderSource::from_config(&config.rpc)?;
    info!(endpoint = %source.endpoint(), "Holder source ready");
    Ok(HolderCountPoller::new(
        Arc::new(source),
        PollerSettings::from(&config.poller),
    ))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

type StdinLines = Lines<BufReader<Stdin>>;

fn stdin_lines() -> StdinLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Print a prompt and read one line; `None` on end of input
async fn prompt(lines: &mut StdinLines, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

async fn run_enter(config: &Config, lines: &mut StdinLines) -> Result<()> {
    let splash = Splash::new(config.landing.enter_delay());
    print_lines(&splash.render());

    splash.wait_ready().await;
    if prompt(lines, &format!("{} ", ENTER_LABEL)).await?.is_none() {
        return Ok(());
    }

    for link in site_links(&config.landing, &config.token) {
        println!("  {:<10} {}", link.label, link.url);
    }

    loop {
        println!("[info] [chat] [docs] [agent] [exit]");
        let Some(choice) = prompt(lines, "menu> ").await? else {
            return Ok(());
        };

        let result = match choice.trim() {
            "info" => run_info(config).await,
            "chat" => run_chat(config, lines).await,
            "docs" => run_docs(DocsSection::default(), "amber"),
            "agent" => run_agent(config, lines).await,
            "exit" | "quit" => return Ok(()),
            "" => continue,
            other => {
                println!("Unknown command: {}", other);
                continue;
            }
        };

        // A failed view returns to the menu
        if let Err(e) = result {
            error!("{:#}", e);
        }
    }
}

async fn run_holders(config: &Config) -> Result<()> {
    let mint = config
        .token
        .mint_pubkey()?
        .ok_or_else(|| anyhow!("No token mint configured (set token.mint or PORTAL_TOKEN_MINT)"))?;

    let poller = holder_poller(config)?;
    let handle = poller.start(mint);
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                match state.holder_count {
                    _ if state.is_loading => {
                        println!("holders: loading... (retry {})", state.retry_count)
                    }
                    HolderCount::Known(count) => println!("holders: {}", format_thousands(count)),
                    HolderCount::Unknown => println!("holders: unavailable"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    poller.stop(&handle);
    Ok(())
}

async fn run_info(config: &Config) -> Result<()> {
    let mut panel = TokenInfoPanel::new(config.token.clone(), holder_poller(config)?)?;
    panel.open();

    if let Some(mut updates) = panel.subscribe() {
        tokio::select! {
            result = updates.wait_for(|state| !state.is_loading) => {
                if result.is_err() {
                    warn!("Holder poller stopped before the first result");
                }
            }
            _ = tokio::signal::ctrl_c() => {}
        }
    }

    print_lines(&panel.render());
    panel.close();
    Ok(())
}

async fn run_chat(config: &Config, lines: &mut StdinLines) -> Result<()> {
    let completer = OpenAiCompleter::from_config(&config.chat)?;
    let mut session = ChatSession::new(Arc::new(completer), ChatSettings::from(&config.chat));
    info!(session = %session.id(), "Chat session started");

    print_lines(&session.render());
    let mut printed = session.log().len();

    loop {
        let input = tokio::select! {
            line = prompt(lines, "> ") => match line? {
                Some(line) => line,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        let trimmed = input.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        if trimmed.is_empty() {
            continue;
        }

        println!("# {}", portal::chat::persona::PROCESSING_MESSAGE);
        session.submit(trimmed).await;

        // Echo only the entries added after the user's own line
        let rendered = session.render();
        print_lines(&rendered[(printed + 1).min(rendered.len())..]);
        printed = rendered.len();
    }

    Ok(())
}

fn run_docs(section: DocsSection, theme: &str) -> Result<()> {
    let mut modal = DocsModal::themed(DocsTheme::by_name(theme)?);
    modal.open();
    modal.select(section);
    print_lines(&modal.render());
    Ok(())
}

async fn run_agent(config: &Config, lines: &mut StdinLines) -> Result<()> {
    let creator = AgentCreator::new(CreatorTimings::from(&config.agent_creator));
    creator.open();
    print_lines(&creator.render());

    for field in FormField::ALL {
        let label = format!("{} ({}): ", field.label(), field.placeholder());
        loop {
            let Some(value) = prompt(lines, &label).await? else {
                creator.close();
                return Ok(());
            };

            match creator.set_field(field, &value) {
                Ok(()) => break,
                Err(e) => println!("{}", e),
            }
        }
    }

    let submission = creator.submit()?;
    info!(agent = %submission.agent_name, id = %submission.id, "Agent submitted");
    print_lines(&creator.render());

    let mut updates = creator.subscribe();
    updates.wait_for(|state| state.show_success).await?;
    print_lines(&creator.render());
    updates.wait_for(|state| !state.show_success).await?;

    Ok(())
}
