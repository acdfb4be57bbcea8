use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use toniebox_card::config::load_card_file;
use toniebox_card::config::load_snapshot_file;
use toniebox_card::config::LogLevel;
use toniebox_card::config::LoggingConfig;
use toniebox_card::config::Settings;
use toniebox_card::register_cards;
use toniebox_card::Card;
use toniebox_card::CardConfig;
use toniebox_card::CardRegistry;
use toniebox_card::Control;
use toniebox_card::JsonLinesHost;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Render and drive the Toniebox mini media card outside a dashboard.
#[derive(Debug, Parser)]
#[command(name = "toniebox_card", version)]
struct Cli {
    /// Host settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the card markup
    Render(Inputs),

    /// Print the resolved display model as JSON
    Model(Inputs),

    /// Press a playback button and print the resulting command
    Press {
        /// previous, play-or-pause or next
        control: Control,

        #[command(flatten)]
        inputs: Inputs,
    },

    /// Tap the card body and print the resulting command
    Tap(Inputs),

    /// Print the configuration offered for a new card
    Stub,

    /// List registered card types
    Cards,
}

#[derive(Debug, Args)]
struct Inputs {
    /// Card configuration (TOML, or JSON with a .json extension)
    #[arg(long)]
    card: PathBuf,

    /// Entity state snapshot (JSON)
    #[arg(long)]
    states: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    init_tracing(&settings.logging, cli.log_level);

    match cli.command {
        Command::Render(inputs) => {
            let card = load_card(&inputs)?;
            println!("{}", card.markup());
        }
        Command::Model(inputs) => {
            let card = load_card(&inputs)?;
            println!("{}", serde_json::to_string_pretty(card.model())?);
        }
        Command::Press { control, inputs } => {
            let card = load_card(&inputs)?;
            let mut host = JsonLinesHost::new(io::stdout().lock());
            if !card.press(control, &mut host) {
                tracing::info!("Pressing {} produced no command", control);
            }
        }
        Command::Tap(inputs) => {
            let card = load_card(&inputs)?;
            let mut host = JsonLinesHost::new(io::stdout().lock());
            if !card.tap(&mut host) {
                tracing::info!("Tap produced no command");
            }
        }
        Command::Stub => {
            let raw = CardConfig::stub().to_raw()?;
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
        Command::Cards => {
            let mut registry = CardRegistry::new();
            let count = register_cards(&mut registry);
            tracing::debug!("Registered {} card types", count);
            for descriptor in registry.iter() {
                println!("{}", serde_json::to_string(descriptor)?);
            }
        }
    }

    Ok(())
}

fn load_card(inputs: &Inputs) -> anyhow::Result<Card> {
    let config = load_card_file(&inputs.card)
        .with_context(|| format!("Failed to load card config {}", inputs.card.display()))?;
    tracing::info!("Loaded card '{}' ({} mode)", config.name, config.control.mode());
    if config.dispatch_target_missing() {
        tracing::warn!("No playback target configured, buttons will do nothing");
    }

    let mut card = Card::from_config(config);
    if let Some(path) = &inputs.states {
        let snapshot = load_snapshot_file(path)
            .with_context(|| format!("Failed to load states from {}", path.display()))?;
        card.set_state(snapshot);
    }
    Ok(card)
}

fn init_tracing(logging: &LoggingConfig, level: Option<LogLevel>) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(logging.targets(level))
        .init();
}
