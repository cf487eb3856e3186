//! Core library for the `aqi` CLI.
//!
//! This crate defines:
//! - AQI severity classification and forecast selection
//! - The World Air Quality Index feed client and its response model
//! - Lookup state driven by fetch results
//! - Location search history and configuration
//!
//! It is used by `aqi-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod lookup;
pub mod model;
pub mod provider;

pub use classify::{Severity, SeverityDescriptor, classify};
pub use config::Config;
pub use error::LookupError;
pub use forecast::{
    AdjacentForecasts, DailyForecast, ForecastEntry, Pollutant, select_adjacent_forecasts,
};
pub use history::{JsonFileStore, Location, LocationStore, MemoryStore, NewLocation};
pub use lookup::{AqiReport, LookupSession, LookupState, RequestTicket, ScoredForecast};
pub use model::{AqiPayload, Coordinates, StationData};
pub use provider::{AqiProvider, FetchState, fetch_states, provider_from_config};
