use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use classy_weather_core::{
    Config, FlagPolicy, Snapshot, WeatherSearch, classify, flag, provider,
    session::MIN_QUERY_CHARS,
};
use inquire::{InquireError, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "classy-weather", version, about = "Daily forecast cards for any place")]
pub struct Cli {
    /// Print debug logs to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a location; defaults to the last one searched.
    Show {
        /// Location name, e.g. "Lisbon".
        location: Option<String>,

        /// Country code handling for this run: "strict" or "best-effort".
        #[arg(long)]
        policy: Option<String>,
    },

    /// Search repeatedly; each new location replaces the last. Empty input quits.
    Interactive {
        /// Country code handling for this session: "strict" or "best-effort".
        #[arg(long)]
        policy: Option<String>,
    },

    /// Choose the country code policy and default location.
    Configure,

    /// Classify a WMO weather code.
    Classify {
        #[arg(allow_negative_numbers = true)]
        code: i64,
    },

    /// Print the flag glyph for a two-letter country code.
    Flag {
        country_code: String,

        #[arg(long)]
        policy: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { location, policy } => {
                let mut config = Config::load()?;
                let search = searcher(&config, policy.as_deref())?;
                let location = location.unwrap_or_else(|| config.last_location().to_string());
                show(&mut config, &search, &location).await
            }
            Command::Interactive { policy } => {
                let mut config = Config::load()?;
                let search = searcher(&config, policy.as_deref())?;
                interactive(&mut config, &search).await
            }
            Command::Configure => configure(),
            Command::Classify { code } => {
                let tag = classify(code);
                println!("{code}: {} {tag}", tag.icon());
                Ok(())
            }
            Command::Flag { country_code, policy } => {
                let policy = match policy {
                    Some(p) => FlagPolicy::try_from(p.as_str())?,
                    None => Config::load()?.flag_policy,
                };
                let glyph = flag::encode_with(&country_code, policy)?;
                if glyph.is_empty() {
                    println!("(no flag for '{country_code}')");
                } else {
                    println!("{glyph}");
                }
                Ok(())
            }
        }
    }
}

fn searcher(config: &Config, policy: Option<&str>) -> anyhow::Result<WeatherSearch> {
    let Some(policy) = policy else {
        return WeatherSearch::from_config(config);
    };
    let (geocoder, forecaster) = provider::services_from_config(config)?;

    Ok(WeatherSearch::new(geocoder, forecaster, FlagPolicy::try_from(policy)?))
}

async fn show(config: &mut Config, search: &WeatherSearch, location: &str) -> anyhow::Result<()> {
    if location.is_empty() {
        bail!(
            "No location given and none remembered.\n\
             Hint: run `classy-weather show <location>`, e.g. `classy-weather show Lisbon`."
        );
    }

    remember(config, location)?;

    let snapshot = Snapshot::default().with_location(location);
    if !snapshot.needs_lookup() {
        bail!("Location '{location}' is too short; type at least {MIN_QUERY_CHARS} characters.");
    }

    let done = search.search_with(&snapshot, loading_indicator()).await;

    if let Some(err) = done.error {
        bail!(err);
    }
    if let Some(out) = render::snapshot(&done) {
        println!("{out}");
    }
    Ok(())
}

async fn interactive(config: &mut Config, search: &WeatherSearch) -> anyhow::Result<()> {
    let mut snapshot = Snapshot::default().with_location(config.last_location());

    loop {
        let input = match Text::new("Search for location...")
            .with_initial_value(&snapshot.location)
            .with_help_message("Enter an empty line to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read location"),
        };
        if input.is_empty() {
            break;
        }

        remember(config, &input)?;
        let next = snapshot.with_location(input);
        if !next.needs_lookup() {
            println!("Type at least {MIN_QUERY_CHARS} characters.");
            snapshot = next;
            continue;
        }

        let result = search.search_with(&next, loading_indicator()).await;
        snapshot = next.merge(result);

        match (&snapshot.error, render::snapshot(&snapshot)) {
            (Some(err), _) => eprintln!("{err}"),
            (None, Some(out)) => println!("{out}"),
            (None, None) => {}
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let policies = FlagPolicy::all().to_vec();
    let cursor = policies.iter().position(|p| *p == config.flag_policy).unwrap_or(0);
    let policy = Select::new("Country code handling:", policies)
        .with_starting_cursor(cursor)
        .with_help_message("strict rejects malformed codes; best-effort keeps the first two letters")
        .prompt()
        .context("Failed to read country code policy")?;

    let location = Text::new("Default location:")
        .with_initial_value(config.last_location())
        .prompt()
        .context("Failed to read default location")?;

    config.flag_policy = policy;
    if !location.is_empty() {
        config.remember_location(&location);
    }
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Persist the location whenever it changes.
fn remember(config: &mut Config, location: &str) -> anyhow::Result<()> {
    if config.remember_location(location) {
        config.save()?;
        tracing::debug!(location, "remembered location");
    }
    Ok(())
}

fn loading_indicator() -> impl FnMut(&Snapshot) {
    let mut shown = false;
    move |snapshot| {
        if snapshot.is_loading && !shown {
            shown = true;
            eprintln!("{}", render::LOADING);
        }
    }
}
