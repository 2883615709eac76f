use crate::error::{ApiError, Result};
use serde_json::Value;
use std::fmt;

#[cfg(feature = "api")]
use crate::{date_range::DateRange, measure::Measure, measure::MeasureFilter, reading::Reading};
#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// Base URL of the Environment Agency real-time flood-monitoring API.
pub const BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring/";

/// Metadata for a monitoring station: its reference and position.
///
/// Latitude and longitude are private with read-only accessors; a
/// station's position never changes after lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub station_id: String,
    latitude: f64,
    longitude: f64,
}

impl Station {
    /// Build a station from the `items` array of an `id/stations`
    /// response. An empty array means the station reference is unknown.
    pub fn from_items(station_id: &str, items: &Value) -> Result<Station> {
        let first = items
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or_else(|| ApiError::StationNotFound(station_id.to_string()))?;
        let latitude = first
            .get("lat")
            .and_then(Value::as_f64)
            .ok_or_else(|| ApiError::StationNotFound(station_id.to_string()))?;
        let longitude = first
            .get("long")
            .and_then(Value::as_f64)
            .ok_or_else(|| ApiError::StationNotFound(station_id.to_string()))?;
        Ok(Station {
            station_id: station_id.to_string(),
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n----Station Summary----\n\nStation ID : {}\nLocation : ({}, {})\n\n-----Summary Ended-----\n",
            self.station_id, self.latitude, self.longitude
        )
    }
}

/// HTTP client for the flood-monitoring API.
#[cfg(feature = "api")]
pub struct FloodApiClient {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl FloodApiClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(FloodApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string() + "/",
        })
    }

    /// GET a path with query params, retrying on failure with
    /// exponential backoff.
    async fn get_text(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let max_tries = 3;
        let mut sleep_millis: u64 = 1000;
        let url = format!("{}{}", self.base_url, path);

        for attempt in 1..=max_tries {
            match self.client.get(&url).query(params).send().await {
                Ok(response) => {
                    if response.status() != StatusCode::OK {
                        let status = response.status();
                        warn!(
                            "Attempt {}/{}: Bad response status for {}: {}",
                            attempt, max_tries, path, status
                        );
                        if attempt == max_tries {
                            return Err(ApiError::BadStatus(status.as_u16()));
                        }
                    } else {
                        match response.text().await {
                            Ok(body) => return Ok(body),
                            Err(e) => {
                                warn!(
                                    "Attempt {}/{}: Failed to read body for {}: {}",
                                    attempt, max_tries, path, e
                                );
                                if attempt == max_tries {
                                    return Err(ApiError::HttpRequest(e));
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, max_tries, path, e
                    );
                    if attempt == max_tries {
                        return Err(ApiError::HttpRequest(e));
                    }
                }
            }

            info!(
                "Sleeping for {} milliseconds before retry for {}",
                sleep_millis, path
            );
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }

        unreachable!("retry loop returns on the final attempt")
    }

    async fn get_items(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let body = self.get_text(path, params).await?;
        let json: Value = serde_json::from_str(&body)?;
        Ok(json.get("items").cloned().unwrap_or(Value::Null))
    }

    /// Fetch station metadata by station reference.
    pub async fn get_station(&self, station_id: &str) -> Result<Station> {
        let params = [("stationReference", station_id.to_string())];
        let items = self.get_items("id/stations", &params).await?;
        Station::from_items(station_id, &items)
    }

    /// Fetch the measures available at a station, filtered by
    /// parameter/qualifier. Errors when nothing matches the filter.
    pub async fn get_measures(
        &self,
        station_id: &str,
        filter: &MeasureFilter,
    ) -> Result<Vec<Measure>> {
        let params = [("stationReference", station_id.to_string())];
        let items = self.get_items("id/measures", &params).await?;
        let measures = filter.apply(Measure::from_items(&items)?);
        if measures.is_empty() {
            return Err(ApiError::NoMatchingMeasures {
                station_id: station_id.to_string(),
                parameter: if filter.parameter.is_empty() {
                    None
                } else {
                    Some(filter.parameter.clone())
                },
            });
        }
        Ok(measures)
    }

    /// Fetch readings for one measure over a date range, sorted
    /// ascending by timestamp.
    pub async fn get_readings(
        &self,
        measure_notation: &str,
        range: &DateRange,
        limit: Option<u32>,
    ) -> Result<Vec<Reading>> {
        let path = format!("id/measures/{}/readings.csv", measure_notation);
        let (start, end) = range.as_params();
        let mut params = vec![("startdate", start), ("enddate", end)];
        if let Some(limit) = limit {
            params.push(("_limit", limit.to_string()));
        }
        let body = self.get_text(&path, &params).await?;
        Reading::from_csv(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::Station;

    const ITEMS_JSON: &str = r#"[
        {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/F1906",
            "stationReference": "F1906",
            "lat": 53.869735,
            "long": -1.089289
        }
    ]"#;

    #[test]
    fn test_station_from_items() {
        let items: serde_json::Value = serde_json::from_str(ITEMS_JSON).unwrap();
        let station = Station::from_items("F1906", &items).unwrap();
        assert_eq!(station.station_id, "F1906");
        assert!((station.latitude() - 53.869735).abs() < 1e-9);
        assert!((station.longitude() + 1.089289).abs() < 1e-9);
    }

    #[test]
    fn test_station_empty_items() {
        let items: serde_json::Value = serde_json::from_str("[]").unwrap();
        assert!(Station::from_items("NOPE", &items).is_err());
    }
}
