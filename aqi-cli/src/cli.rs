use std::sync::Arc;

use anyhow::{Context, anyhow};
use aqi_core::{
    AqiProvider, Config, Coordinates, JsonFileStore, LocationStore, LookupSession, NewLocation,
    fetch_states, provider_from_config,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, Text};
use tokio::sync::mpsc;
use tracing::info;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aqi", version, about = "Air quality lookup CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API token (and optionally a custom feed URL).
    Configure,

    /// Show current air quality and the adjacent days' forecast for a position.
    Show {
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true, requires = "lng", required_unless_present = "id")]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true, requires = "lat", required_unless_present = "id")]
        lng: Option<f64>,

        /// Look up a saved location again, by its id in `aqi history`.
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        id: Option<u32>,

        /// Name to save in the history; defaults to the station's city name.
        #[arg(long)]
        name: Option<String>,

        /// Do not add this lookup to the history.
        #[arg(long)]
        no_save: bool,
    },

    /// List previously looked-up locations.
    History {
        /// Delete the whole history.
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt when clearing.
        #[arg(long, short)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                lat,
                lng,
                id,
                name,
                no_save,
            } => show(id, lat, lng, name, no_save).await,
            Command::History { clear, yes } => history(clear, yes),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let token = Password::new("WAQI API token:")
        .without_confirmation()
        .with_help_message("Request one at https://aqicn.org/data-platform/token/")
        .prompt()
        .context("Failed to read API token")?;

    let base_url = Text::new("Feed base URL:")
        .with_default(&config.endpoint())
        .prompt()
        .context("Failed to read feed base URL")?;

    config.set_token(token.trim().to_string());
    config.base_url = Some(base_url);
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Position to look up, and the name to save it under if one is already known.
#[derive(Debug, Clone, PartialEq)]
struct LookupTarget {
    coords: Coordinates,
    name: Option<String>,
}

/// Resolve `show` arguments: a saved history entry by id, or explicit coordinates.
fn resolve_target(
    store: &dyn LocationStore,
    id: Option<u32>,
    lat: Option<f64>,
    lng: Option<f64>,
    name: Option<String>,
) -> anyhow::Result<LookupTarget> {
    if let Some(id) = id {
        let location = store.get(id)?.ok_or_else(|| {
            anyhow!(
                "No saved location with id {id}.\n\
                 Hint: run `aqi history` to list saved locations."
            )
        })?;

        return Ok(LookupTarget {
            coords: location.coordinates(),
            name: name.or(Some(location.name)),
        });
    }

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(LookupTarget {
            coords: Coordinates::new(lat, lng),
            name,
        }),
        _ => Err(anyhow!("Either --id or both --lat and --lng are required")),
    }
}

async fn show(
    id: Option<u32>,
    lat: Option<f64>,
    lng: Option<f64>,
    name: Option<String>,
    no_save: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut store = JsonFileStore::new(config.history_file_path()?);
    let LookupTarget { coords, name } = resolve_target(&store, id, lat, lng, name)?;

    let provider: Arc<dyn AqiProvider> = Arc::from(provider_from_config(&config)?);
    let today = Local::now().date_naive();

    let mut session = LookupSession::new();
    let ticket = session.begin();

    let (tx, mut rx) = mpsc::channel(4);
    let task_provider = Arc::clone(&provider);
    let fetch =
        tokio::spawn(async move { fetch_states(task_provider.as_ref(), coords, &tx).await });

    while let Some(event) = rx.recv().await {
        if !event.is_terminal() {
            eprintln!("Loading air quality data for {coords}...");
        }
        session.apply(ticket, event, today);
    }
    fetch.await.context("Air quality fetch task failed")?;

    let state = session.state();
    if let Some(err) = &state.error {
        return Err(anyhow!("{err}"));
    }
    let report = state
        .report
        .as_ref()
        .ok_or_else(|| anyhow!("Lookup finished without a result"))?;

    println!("{}", output::render_report(report));

    if !no_save {
        let saved = store.insert(NewLocation {
            name: name.unwrap_or_else(|| report.station.city.name.clone()),
            latitude: coords.latitude,
            longitude: coords.longitude,
        })?;
        info!(id = saved.id, "lookup added to history");
    }

    Ok(())
}

fn history(clear: bool, yes: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut store = JsonFileStore::new(config.history_file_path()?);

    if clear {
        let confirmed = yes
            || Confirm::new("Delete the whole location history?")
                .with_default(false)
                .prompt()
                .context("Failed to read confirmation")?;

        if confirmed {
            store.delete_all()?;
            println!("History cleared.");
        }
        return Ok(());
    }

    println!("{}", output::render_history(&store.list_all()?));
    Ok(())
}
