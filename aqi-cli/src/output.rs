use std::fmt::Write;

use aqi_core::{AqiReport, Location, ScoredForecast};

pub fn render_report(report: &AqiReport) -> String {
    let station = &report.station;
    let mut out = String::new();

    let _ = writeln!(out, "{}", display_name(&station.city.name));
    if let Some(coords) = station.coordinates() {
        let _ = writeln!(out, "Station at {}, {}", coords.latitude, coords.longitude);
    }
    if !station.time.s.is_empty() {
        let _ = writeln!(out, "Observed {} ({})", station.time.s, station.time.tz);
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "AQI {} - {} [{}]",
        station.aqi,
        report.current.label,
        report.current.category.color()
    );
    if let Some(caution) = report.current.caution {
        let _ = writeln!(out, "{caution}");
    }
    let _ = writeln!(out, "Dominant pollutant: {}", report.dominant_pollutant());
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", render_forecast("Yesterday", report.yesterday.as_ref()));
    let _ = write!(out, "{}", render_forecast("Tomorrow", report.tomorrow.as_ref()));

    out
}

fn render_forecast(label: &str, forecast: Option<&ScoredForecast>) -> String {
    match forecast {
        Some(f) => format!(
            "{label:<9} {}: avg {} (min {}, max {}) - {}",
            f.entry.day, f.entry.avg, f.entry.min, f.entry.max, f.severity.label
        ),
        None => format!("{label:<9} forecast unavailable"),
    }
}

pub fn render_history(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No saved locations.".to_string();
    }

    locations
        .iter()
        .map(|l| {
            format!(
                "{:>3}. {} ({}, {})",
                l.id,
                display_name(&l.name),
                l.latitude,
                l.longitude
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "Unknown location"
    } else {
        name
    }
}
