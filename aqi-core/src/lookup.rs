//! Turning fetch states into what the user sees.
//!
//! A [`LookupSession`] owns the current [`LookupState`]. Each new lookup gets a
//! fresh [`RequestTicket`]; states that arrive for an older ticket are dropped,
//! so a replaced lookup can never overwrite the result of the newer one.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    classify::{SeverityDescriptor, classify},
    error::LookupError,
    forecast::{ForecastEntry, select_adjacent_forecasts},
    model::{AqiPayload, StationData},
    provider::FetchState,
};

/// A forecast entry together with the classification of its average.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredForecast {
    pub entry: ForecastEntry,
    pub severity: SeverityDescriptor,
}

impl ScoredForecast {
    fn from_entry(entry: &ForecastEntry) -> Self {
        Self {
            entry: entry.clone(),
            severity: classify(entry.avg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AqiReport {
    pub station: StationData,
    pub current: SeverityDescriptor,
    pub yesterday: Option<ScoredForecast>,
    pub tomorrow: Option<ScoredForecast>,
}

impl AqiReport {
    pub fn build(station: StationData, reference: NaiveDate) -> Self {
        let current = classify(station.aqi);
        let adjacent =
            select_adjacent_forecasts(&station.forecast.daily, &station.dominentpol, reference);

        let yesterday = adjacent.yesterday.map(ScoredForecast::from_entry);
        let tomorrow = adjacent.tomorrow.map(ScoredForecast::from_entry);

        Self {
            station,
            current,
            yesterday,
            tomorrow,
        }
    }

    /// Dominant pollutant, or `pm25` when the provider left it blank.
    pub fn dominant_pollutant(&self) -> &str {
        let dominant = self.station.dominentpol.trim();
        if dominant.is_empty() {
            "pm25"
        } else {
            dominant
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupState {
    pub loading: bool,
    pub error: Option<LookupError>,
    pub report: Option<AqiReport>,
}

impl Default for LookupState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            report: None,
        }
    }
}

impl LookupState {
    /// Fold one fetch state into the current state.
    pub fn apply(self, event: FetchState, reference: NaiveDate) -> Self {
        match event {
            FetchState::Loading => Self {
                loading: true,
                ..self
            },
            FetchState::Error(message) => Self {
                loading: false,
                error: Some(LookupError::Transport(message)),
                ..self
            },
            FetchState::Success(AqiPayload::Data(station)) => Self {
                loading: false,
                error: None,
                report: Some(AqiReport::build(*station, reference)),
            },
            FetchState::Success(AqiPayload::UpstreamError(message)) => {
                warn!(error = %message, "provider reported an error");
                Self {
                    loading: false,
                    error: Some(LookupError::Upstream(message)),
                    ..self
                }
            }
            FetchState::Success(AqiPayload::Unrecognized) => {
                warn!("unknown response from provider");
                Self {
                    loading: false,
                    error: Some(LookupError::UnrecognizedPayload),
                    ..self
                }
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Owner of the lookup state across successive requests.
#[derive(Debug, Default)]
pub struct LookupSession {
    state: LookupState,
    current: u64,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lookup. Any lookup still in flight is superseded.
    pub fn begin(&mut self) -> RequestTicket {
        self.current += 1;
        self.state = LookupState::default();
        RequestTicket(self.current)
    }

    /// Apply a state for `ticket`. Returns `false` if the ticket is stale and
    /// the event was ignored.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        event: FetchState,
        reference: NaiveDate,
    ) -> bool {
        if ticket.0 != self.current {
            debug!(
                ticket = ticket.0,
                current = self.current,
                "ignoring state for superseded lookup"
            );
            return false;
        }

        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event, reference);
        true
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = LookupState::default();
    }
}
