use crate::error::{ApiError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Timestamp format used by the flood-monitoring API: "2025-06-05T13:00:00Z"
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Expected number of columns in a readings CSV row: dateTime,measure,value
pub const CSV_ROW_LENGTH: usize = 3;

/// A single timestamped reading for one measure.
///
/// `value` is `None` when the API recorded the instant but supplied no
/// usable numeric value (blank or malformed cell). Downstream lag
/// construction drops rows whose history touches a missing value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub datetime: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(datetime: DateTime<Utc>, value: Option<f64>) -> Self {
        Reading { datetime, value }
    }

    /// Parse an API timestamp string into a UTC datetime.
    pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| ApiError::TimestampParse(format!("{}: {}", raw.trim(), e)))
    }

    /// Parse a readings CSV response body (header `dateTime,measure,value`)
    /// into readings sorted ascending by timestamp.
    pub fn from_csv(body: &str) -> Result<Vec<Reading>> {
        let mut readings = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes())
            .records()
            .map(|record| {
                let record = record?;
                record.try_into()
            })
            .collect::<Result<Vec<Reading>>>()?;
        readings.sort();
        Ok(readings)
    }
}

impl TryFrom<StringRecord> for Reading {
    type Error = ApiError;

    fn try_from(record: StringRecord) -> Result<Self> {
        if record.len() < CSV_ROW_LENGTH {
            return Err(ApiError::TimestampParse(format!(
                "short row: {} columns",
                record.len()
            )));
        }
        let datetime = Reading::parse_timestamp(record.get(0).unwrap_or_default())?;
        // Blank and malformed cells become missing values rather than errors.
        let value = record
            .get(2)
            .and_then(|s| s.trim().parse::<f64>().ok());
        Ok(Reading { datetime, value })
    }
}

impl Ord for Reading {
    fn cmp(&self, other: &Self) -> Ordering {
        self.datetime.cmp(&other.datetime)
    }
}

impl Eq for Reading {}

impl PartialEq for Reading {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
    }
}

impl PartialOrd for Reading {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mean of the present values, `None` when no reading carries a value.
pub fn mean_value(readings: &[Reading]) -> Option<f64> {
    let values: Vec<f64> = readings.iter().filter_map(|r| r.value).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Spread (max - min) of the present values, `None` when no reading
/// carries a value. For tidal level measures this is the tidal range.
pub fn value_span(readings: &[Reading]) -> Option<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for reading in readings {
        if let Some(v) = reading.value {
            min = min.min(v);
            max = max.max(v);
            seen = true;
        }
    }
    if seen {
        Some(max - min)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{mean_value, value_span, Reading};

    // https://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C/readings.csv
    const STR_RESULT: &str = "\
dateTime,measure,value
2025-06-05T00:00:00Z,http://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C,10.6
2025-06-05T01:00:00Z,http://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C,10.5
2025-06-05T02:00:00Z,http://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C,10.6
2025-06-05T03:00:00Z,http://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C,
2025-06-05T04:00:00Z,http://environment.data.gov.uk/flood-monitoring/id/measures/1412-temperature-dry_bulb-i-1_h-deg_C,11.6
";

    #[test]
    fn test_from_csv() {
        let readings = Reading::from_csv(STR_RESULT).unwrap();
        assert_eq!(readings.len(), 5);
        assert_eq!(readings[0].value, Some(10.6));
        // blank cell becomes a missing value, not an error
        assert_eq!(readings[3].value, None);
    }

    #[test]
    fn test_from_csv_sorts_ascending() {
        let shuffled = "\
dateTime,measure,value
2025-06-05T04:00:00Z,m,11.6
2025-06-05T00:00:00Z,m,10.6
2025-06-05T02:00:00Z,m,10.5
";
        let readings = Reading::from_csv(shuffled).unwrap();
        assert!(readings.windows(2).all(|w| w[0].datetime < w[1].datetime));
        assert_eq!(readings[0].value, Some(10.6));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(Reading::parse_timestamp("05/06/2025 13:00").is_err());
    }

    #[test]
    fn test_summaries() {
        let readings = Reading::from_csv(STR_RESULT).unwrap();
        let mean = mean_value(&readings).unwrap();
        assert!((mean - 10.825).abs() < 1e-9);
        let span = value_span(&readings).unwrap();
        assert!((span - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_summaries_empty() {
        assert_eq!(mean_value(&[]), None);
        assert_eq!(value_span(&[]), None);
    }
}
