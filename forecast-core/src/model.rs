use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One city/date forecast record as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub id: String,
    pub city: String,
    pub country: String,
    pub date: NaiveDate,
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub condition: String,
    pub humidity: u8,
    pub wind_speed_kmh: f64,
    #[serde(default)]
    pub wind_direction: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WeatherForecast {
    /// Grouping key, e.g. `"Paris, FR"`.
    pub fn location_key(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Precomputed temperature for `unit`; never converts client-side.
    pub fn temperature_in(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.temperature_celsius,
            TemperatureUnit::Fahrenheit => self.temperature_fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
        }
    }

    /// Whole-degree display, halves rounded up (`-2.5` shows as `-2`).
    pub fn format(self, value: f64) -> String {
        let rounded = (value + 0.5).floor();
        // avoid printing "-0"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{rounded}{}", self.symbol())
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `GET /api/weather/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Body of `GET /api/weather/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub total_forecasts: u64,
    pub timestamp: String,
}
