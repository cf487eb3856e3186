//! Daily forecast series and adjacent-day selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day of predictions for a single pollutant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub day: String,
    pub min: i64,
    pub max: i64,
    pub avg: i64,
}

/// Daily forecast series keyed by pollutant, as returned by the provider.
///
/// Entries are not guaranteed to be sorted, so lookups go by day string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub pm25: Vec<ForecastEntry>,
    #[serde(default)]
    pub pm10: Vec<ForecastEntry>,
    #[serde(default)]
    pub o3: Vec<ForecastEntry>,
    #[serde(default)]
    pub uvi: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Pm25,
            Pollutant::Pm10,
            Pollutant::O3,
            Pollutant::No2,
            Pollutant::So2,
            Pollutant::Co,
        ]
    }

    /// The feed only publishes daily series for particulates and ozone;
    /// NO2, SO2 and CO are reported as instantaneous readings only.
    pub fn has_forecast_series(&self) -> bool {
        matches!(self, Pollutant::Pm25 | Pollutant::Pm10 | Pollutant::O3)
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Pollutant {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Pollutant::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown pollutant '{value}'"))
    }
}

impl DailyForecast {
    /// Series to use for a dominant pollutant identifier, falling back to
    /// PM2.5 when the identifier is empty or has no daily series.
    pub fn series_for(&self, dominant: &str) -> &[ForecastEntry] {
        let pollutant = Pollutant::try_from(dominant)
            .ok()
            .filter(Pollutant::has_forecast_series)
            .unwrap_or(Pollutant::Pm25);

        match pollutant {
            Pollutant::Pm10 => &self.pm10,
            Pollutant::O3 => &self.o3,
            _ => &self.pm25,
        }
    }
}

/// Forecast entries for the days either side of a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacentForecasts<'a> {
    pub yesterday: Option<&'a ForecastEntry>,
    pub tomorrow: Option<&'a ForecastEntry>,
}

pub fn select_adjacent_forecasts<'a>(
    forecast: &'a DailyForecast,
    dominant: &str,
    reference: NaiveDate,
) -> AdjacentForecasts<'a> {
    let series = forecast.series_for(dominant);

    AdjacentForecasts {
        yesterday: reference.pred_opt().and_then(|day| find_day(series, day)),
        tomorrow: reference.succ_opt().and_then(|day| find_day(series, day)),
    }
}

fn find_day(series: &[ForecastEntry], day: NaiveDate) -> Option<&ForecastEntry> {
    let target = day.format(DATE_FORMAT).to_string();
    series.iter().find(|entry| entry.day == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Severity, classify};
    use crate::model::AqiPayload;

    fn sample_forecast() -> DailyForecast {
        match AqiPayload::from_body(include_str!("../tests/fixtures/mumbai.json")) {
            AqiPayload::Data(station) => station.forecast.daily,
            other => panic!("fixture should parse as data, got {other:?}"),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid test date")
    }

    fn entry(day: &str, avg: i64) -> ForecastEntry {
        ForecastEntry {
            day: day.to_string(),
            min: avg,
            max: avg,
            avg,
        }
    }

    #[test]
    fn picks_neighbours_from_dominant_series() {
        let forecast = sample_forecast();
        let adjacent = select_adjacent_forecasts(&forecast, "pm25", date("2024-09-25"));

        assert_eq!(adjacent.yesterday.map(|e| e.avg), Some(116));
        assert_eq!(adjacent.tomorrow.map(|e| e.avg), Some(81));
    }

    #[test]
    fn uses_pm10_and_o3_series_when_dominant() {
        let forecast = sample_forecast();

        let pm10 = select_adjacent_forecasts(&forecast, "pm10", date("2024-09-25"));
        assert_eq!(pm10.yesterday.map(|e| e.avg), Some(46));
        assert_eq!(pm10.tomorrow.map(|e| e.avg), Some(31));

        let o3 = select_adjacent_forecasts(&forecast, "o3", date("2024-09-25"));
        assert_eq!(o3.yesterday.map(|e| e.avg), Some(4));
        assert_eq!(o3.tomorrow.map(|e| e.avg), Some(3));
    }

    #[test]
    fn unsupported_or_empty_dominant_falls_back_to_pm25() {
        let forecast = sample_forecast();

        for dominant in ["co", "no2", "so2", "", "uvi", "PM25"] {
            let adjacent = select_adjacent_forecasts(&forecast, dominant, date("2024-09-25"));
            assert_eq!(adjacent.yesterday.map(|e| e.avg), Some(116), "dominant {dominant:?}");
            assert_eq!(adjacent.tomorrow.map(|e| e.avg), Some(81), "dominant {dominant:?}");
        }
    }

    #[test]
    fn window_start_leaves_yesterday_absent() {
        let forecast = sample_forecast();
        let adjacent = select_adjacent_forecasts(&forecast, "pm25", date("2024-09-23"));

        assert!(adjacent.yesterday.is_none());
        assert_eq!(adjacent.tomorrow.map(|e| e.day.as_str()), Some("2024-09-24"));
    }

    #[test]
    fn window_end_leaves_tomorrow_absent() {
        let forecast = sample_forecast();
        let adjacent = select_adjacent_forecasts(&forecast, "pm25", date("2024-10-01"));

        assert_eq!(adjacent.yesterday.map(|e| e.avg), Some(143));
        assert!(adjacent.tomorrow.is_none());
    }

    #[test]
    fn lookup_ignores_entry_order_and_crosses_month_boundary() {
        let forecast = DailyForecast {
            pm25: vec![
                entry("2024-10-01", 30),
                entry("2024-09-29", 10),
                entry("2024-09-30", 20),
            ],
            ..Default::default()
        };

        let adjacent = select_adjacent_forecasts(&forecast, "pm25", date("2024-09-30"));
        assert_eq!(adjacent.yesterday.map(|e| e.avg), Some(10));
        assert_eq!(adjacent.tomorrow.map(|e| e.avg), Some(30));
    }

    #[test]
    fn empty_series_yields_nothing() {
        let forecast = DailyForecast::default();
        let adjacent = select_adjacent_forecasts(&forecast, "o3", date("2024-09-25"));

        assert_eq!(
            adjacent,
            AdjacentForecasts {
                yesterday: None,
                tomorrow: None,
            }
        );
    }

    #[test]
    fn calendar_bounds_do_not_panic() {
        let forecast = sample_forecast();

        let at_min = select_adjacent_forecasts(&forecast, "pm25", NaiveDate::MIN);
        assert!(at_min.yesterday.is_none());

        let at_max = select_adjacent_forecasts(&forecast, "pm25", NaiveDate::MAX);
        assert!(at_max.tomorrow.is_none());
    }

    #[test]
    fn selected_averages_always_classify() {
        let forecast = sample_forecast();

        for dominant in ["pm25", "pm10", "o3"] {
            for entry in forecast.series_for(dominant) {
                let category = classify(entry.avg).category;
                assert!(Severity::all().contains(&category));
            }
        }
    }

    #[test]
    fn pollutant_identifiers_roundtrip() {
        for p in Pollutant::all() {
            let parsed = Pollutant::try_from(p.as_str()).expect("roundtrip should succeed");
            assert_eq!(*p, parsed);
        }

        assert!(Pollutant::try_from("uvi").is_err());
        assert!(!Pollutant::Co.has_forecast_series());
        assert!(Pollutant::O3.has_forecast_series());
    }
}
