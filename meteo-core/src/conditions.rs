//! WMO weather code lookups.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use std::collections::HashMap;

pub const UNKNOWN_CONDITION: &str = "Unknown";
pub const UNKNOWN_ICON: &str = "❓";

const OPEN_METEO_CODES: &[(i32, &str, &str)] = &[
    (0, "Clear sky", "☀️"),
    (1, "Mainly clear", "🌤️"),
    (2, "Partly cloudy", "⛅"),
    (3, "Overcast", "☁️"),
    (45, "Fog", "🌫️"),
    (48, "Depositing rime fog", "🌫️"),
    (51, "Light drizzle", "🌧️"),
    (53, "Moderate drizzle", "🌧️"),
    (55, "Dense drizzle", "🌧️"),
    (61, "Slight rain", "🌧️"),
    (63, "Moderate rain", "🌧️"),
    (65, "Heavy rain", "🌧️"),
    (80, "Light rain showers", "🌦️"),
    (81, "Moderate rain showers", "🌦️"),
    (82, "Violent rain showers", "🌦️"),
    (95, "Thunderstorm", "⛈️"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConditionEntry {
    condition: &'static str,
    icon: &'static str,
}

/// Immutable weather code -> (condition, icon) mapping.
///
/// Build it once at startup and share it by reference (or `Arc`); there is no
/// way to mutate it after construction.
#[derive(Debug, Clone)]
pub struct ConditionTable {
    entries: HashMap<i32, ConditionEntry>,
}

impl ConditionTable {
    /// The table for the codes Open-Meteo reports.
    pub fn open_meteo() -> Self {
        let entries = OPEN_METEO_CODES
            .iter()
            .map(|&(code, condition, icon)| (code, ConditionEntry { condition, icon }))
            .collect();

        Self { entries }
    }

    /// Human-readable condition, `"Unknown"` for missing or unmapped codes.
    pub fn condition_for(&self, code: Option<i32>) -> &'static str {
        code.and_then(|c| self.entries.get(&c))
            .map(|e| e.condition)
            .unwrap_or(UNKNOWN_CONDITION)
    }

    /// Glyph for the code, a question mark for missing or unmapped codes.
    pub fn icon_for(&self, code: Option<i32>) -> &'static str {
        code.and_then(|c| self.entries.get(&c))
            .map(|e| e.icon)
            .unwrap_or(UNKNOWN_ICON)
    }
}

impl Default for ConditionTable {
    fn default() -> Self {
        Self::open_meteo()
    }
}
