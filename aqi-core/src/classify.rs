//! AQI severity classification.
//!
//! Maps a raw AQI score onto the six US EPA categories, together with the
//! cautionary statement shown to the user and a display color.

use serde::Serialize;

const CAUTION_LIMIT_PROLONGED: &str = "Active children and adults, and people with respiratory disease, such as asthma, should limit prolonged outdoor exertion.";
const CAUTION_AVOID_PROLONGED: &str = "Active children and adults, and people with respiratory disease, such as asthma, should avoid prolonged outdoor exertion; everyone else, especially children, should limit prolonged outdoor exertion.";
const CAUTION_AVOID_ALL: &str = "Active children and adults, and people with respiratory disease, such as asthma, should avoid all outdoor exertion; everyone else, especially children, should limit outdoor exertion.";
const CAUTION_EVERYONE: &str = "Everyone should avoid all outdoor exertion.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Severity {
    pub const fn all() -> &'static [Severity] {
        &[
            Severity::Good,
            Severity::Moderate,
            Severity::UnhealthySensitive,
            Severity::Unhealthy,
            Severity::VeryUnhealthy,
            Severity::Hazardous,
        ]
    }

    /// Display color for the category (EPA palette).
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Good => "#00E400",
            Severity::Moderate => "#FFFF00",
            Severity::UnhealthySensitive => "#FF7E00",
            Severity::Unhealthy => "#FF0000",
            Severity::VeryUnhealthy => "#8F3F97",
            Severity::Hazardous => "#7E0023",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(classify_label(*self))
    }
}

/// Human-facing description of an AQI score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityDescriptor {
    pub label: &'static str,
    pub caution: Option<&'static str>,
    pub category: Severity,
}

/// Classify an AQI score. Total over all integers: anything outside 0..=300
/// (including negative values) is reported as hazardous.
pub fn classify(aqi: i64) -> SeverityDescriptor {
    let (category, caution) = match aqi {
        0..=50 => (Severity::Good, None),
        51..=100 => (Severity::Moderate, Some(CAUTION_LIMIT_PROLONGED)),
        101..=150 => (Severity::UnhealthySensitive, Some(CAUTION_LIMIT_PROLONGED)),
        151..=200 => (Severity::Unhealthy, Some(CAUTION_AVOID_PROLONGED)),
        201..=300 => (Severity::VeryUnhealthy, Some(CAUTION_AVOID_ALL)),
        _ => (Severity::Hazardous, Some(CAUTION_EVERYONE)),
    };

    SeverityDescriptor {
        label: classify_label(category),
        caution,
        category,
    }
}

fn classify_label(category: Severity) -> &'static str {
    match category {
        Severity::Good => "Good",
        Severity::Moderate => "Moderate",
        Severity::UnhealthySensitive => "Unhealthy for Sensitive Groups",
        Severity::Unhealthy => "Unhealthy",
        Severity::VeryUnhealthy => "Very Unhealthy",
        Severity::Hazardous => "Hazardous",
    }
}
