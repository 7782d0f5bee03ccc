use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::WeatherForecast;

pub mod http;

pub use http::HttpForecastApi;

/// Read-side failures of the forecast API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch weather data: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to fetch weather data (HTTP {0})")]
    Status(StatusCode),

    /// 404 on an endpoint where that means "no matching records".
    #[error("No matching forecasts")]
    NotFound,

    #[error("Failed to fetch weather data: malformed response ({0})")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Which collection endpoint to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    City(String),
    CityCountry { city: String, country: String },
    CityDate { city: String, date: NaiveDate },
    CityRange {
        city: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Query {
    /// Search box semantics: blank or whitespace-only text reads everything.
    pub fn search(text: &str) -> Self {
        if text.trim().is_empty() {
            Query::All
        } else {
            Query::City(text.to_string())
        }
    }

    /// `true` for every query narrower than [`Query::All`].
    pub fn is_filtered(&self) -> bool {
        !matches!(self, Query::All)
    }

    /// Human label used in "No forecasts found for ..." messages.
    pub fn label(&self) -> String {
        match self {
            Query::All => "all cities".to_string(),
            Query::City(city) => city.clone(),
            Query::CityCountry { city, country } => format!("{city}, {country}"),
            Query::CityDate { city, date } => format!("{city} on {date}"),
            Query::CityRange { city, start, end } => format!("{city} from {start} to {end}"),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match self {
            Query::CityRange { start, end, .. } if start > end => Err(ApiError::InvalidRange {
                start: *start,
                end: *end,
            }),
            _ => Ok(()),
        }
    }

    /// Path and query string relative to the API base URL.
    pub fn path(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).into_owned();
        match self {
            Query::All => "/api/weather".to_string(),
            Query::City(city) => format!("/api/weather/city/{}", enc(city)),
            Query::CityCountry { city, country } => {
                format!("/api/weather/city/{}/country/{}", enc(city), enc(country))
            }
            Query::CityDate { city, date } => {
                format!("/api/weather/city/{}/date/{date}", enc(city))
            }
            Query::CityRange { city, start, end } => format!(
                "/api/weather/city/{}/range?startDate={start}&endDate={end}",
                enc(city)
            ),
        }
    }
}

#[async_trait]
pub trait ForecastApi: Send + Sync + Debug {
    /// Read the forecast list selected by `query`.
    ///
    /// A 404 maps to [`ApiError::NotFound`] only for filtered queries; for
    /// [`Query::All`] it is an ordinary [`ApiError::Status`].
    async fn forecasts(&self, query: &Query) -> Result<Vec<WeatherForecast>, ApiError>;

    async fn fetch_all(&self) -> Result<Vec<WeatherForecast>, ApiError> {
        self.forecasts(&Query::All).await
    }

    async fn fetch_by_city(&self, city: &str) -> Result<Vec<WeatherForecast>, ApiError> {
        self.forecasts(&Query::search(city)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_search_reads_everything() {
        assert_eq!(Query::search(""), Query::All);
        assert_eq!(Query::search("   \t"), Query::All);
        assert_eq!(Query::search("Paris"), Query::City("Paris".into()));
    }

    #[test]
    fn search_keeps_text_as_typed() {
        assert_eq!(Query::search(" Paris "), Query::City(" Paris ".into()));
    }

    #[test]
    fn city_path_is_percent_encoded() {
        let q = Query::City("São Paulo/Centro".into());
        assert_eq!(q.path(), "/api/weather/city/S%C3%A3o%20Paulo%2FCentro");
    }

    #[test]
    fn extended_paths() {
        assert_eq!(Query::All.path(), "/api/weather");

        let q = Query::CityCountry {
            city: "New York".into(),
            country: "US".into(),
        };
        assert_eq!(q.path(), "/api/weather/city/New%20York/country/US");

        let q = Query::CityDate {
            city: "Paris".into(),
            date: day(2024, 1, 2),
        };
        assert_eq!(q.path(), "/api/weather/city/Paris/date/2024-01-02");

        let q = Query::CityRange {
            city: "Paris".into(),
            start: day(2024, 1, 1),
            end: day(2024, 1, 5),
        };
        assert_eq!(
            q.path(),
            "/api/weather/city/Paris/range?startDate=2024-01-01&endDate=2024-01-05"
        );
    }

    #[test]
    fn reversed_range_is_invalid() {
        let q = Query::CityRange {
            city: "Paris".into(),
            start: day(2024, 1, 5),
            end: day(2024, 1, 1),
        };
        let err = q.validate().unwrap_err();
        assert!(matches!(err, ApiError::InvalidRange { .. }));
        assert!(err.to_string().contains("2024-01-05"));

        let same_day = Query::CityRange {
            city: "Paris".into(),
            start: day(2024, 1, 1),
            end: day(2024, 1, 1),
        };
        assert!(same_day.validate().is_ok());
    }

    #[test]
    fn status_error_reads_as_generic_failure() {
        let err = ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Failed to fetch weather data (HTTP 500 Internal Server Error)"
        );
    }
}
