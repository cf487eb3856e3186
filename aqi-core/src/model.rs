use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::forecast::DailyForecast;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lat:{}/lng:{}", self.latitude, self.longitude)
    }
}

/// Body of a feed response, dispatched on its `status` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum AqiPayload {
    /// `status == "ok"` with a well-formed station record.
    Data(Box<StationData>),
    /// Any other status; the provider puts a readable message in `data`.
    UpstreamError(String),
    /// Neither of the above.
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl AqiPayload {
    pub fn from_body(body: &str) -> Self {
        let raw: RawPayload = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = %err, "response body is not a feed payload");
                return AqiPayload::Unrecognized;
            }
        };

        if raw.status == "ok" {
            return match serde_json::from_value::<StationData>(raw.data) {
                Ok(station) => AqiPayload::Data(Box::new(station)),
                Err(err) => {
                    debug!(error = %err, "station data did not match the expected shape");
                    AqiPayload::Unrecognized
                }
            };
        }

        match raw.data {
            serde_json::Value::String(message) => AqiPayload::UpstreamError(message),
            _ => AqiPayload::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationData {
    pub aqi: i64,
    #[serde(default)]
    pub idx: i64,
    #[serde(default)]
    pub attributions: Vec<Attribution>,
    #[serde(default)]
    pub city: City,
    /// Identifier of the dominant pollutant (the provider's spelling).
    #[serde(default)]
    pub dominentpol: String,
    #[serde(default)]
    pub iaqi: BTreeMap<String, Measurement>,
    #[serde(default)]
    pub time: ObservationTime,
    #[serde(default)]
    pub forecast: Forecast,
    #[serde(default)]
    pub debug: Option<SyncInfo>,
}

impl StationData {
    /// Station position as reported in `city.geo`.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.city.geo.as_slice() {
            [lat, lng, ..] => Some(Coordinates::new(*lat, *lng)),
            _ => None,
        }
    }

    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.time.iso).ok()
    }

    /// Latest individual reading for a pollutant or weather attribute (`pm25`, `t`, `h`, ...).
    pub fn reading(&self, key: &str) -> Option<f64> {
        self.iaqi.get(key).map(|m| m.v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    pub geo: Vec<f64>,
    pub name: String,
    pub url: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub v: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationTime {
    pub s: String,
    pub tz: String,
    pub v: i64,
    pub iso: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub daily: DailyForecast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInfo {
    pub sync: String,
}
