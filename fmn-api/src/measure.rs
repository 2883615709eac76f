use crate::error::Result;
use crate::reading::Reading;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latest reading attached to a measure in the `id/measures` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub value: Option<f64>,
}

/// A measure offered by a monitoring station, as returned by the
/// `id/measures` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default)]
    pub notation: String,
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub qualifier: String,
    #[serde(default, rename = "unitName")]
    pub units: String,
    #[serde(default, rename = "valueType")]
    pub value_type: String,
    #[serde(default, rename = "latestReading")]
    pub latest_reading: Option<LatestReading>,
}

impl Measure {
    /// Parse the `items` array of an `id/measures` JSON response.
    pub fn from_items(items: &serde_json::Value) -> Result<Vec<Measure>> {
        let measures: Vec<Measure> = serde_json::from_value(items.clone())?;
        Ok(measures)
    }

    /// The latest reading as a typed `Reading`, when both timestamp and
    /// value are present and parseable.
    pub fn latest(&self) -> Option<Reading> {
        let latest = self.latest_reading.as_ref()?;
        let raw = latest.date_time.as_deref()?;
        let datetime = Reading::parse_timestamp(raw).ok()?;
        Some(Reading::new(datetime, latest.value))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n----Measure Summary----\n\nMeasure ID : {}\nParameter : {}\nQualifier : {}\nUnits : {}\nValue Type : {}",
            self.notation, self.parameter, self.qualifier, self.units, self.value_type
        )
    }
}

/// Parameter/qualifier filter applied to a station's measures.
///
/// An empty parameter disables the parameter check; an empty qualifier
/// list disables the qualifier check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureFilter {
    pub parameter: String,
    pub qualifiers: Vec<String>,
}

impl MeasureFilter {
    pub fn new(parameter: &str, qualifiers: &[&str]) -> Self {
        MeasureFilter {
            parameter: parameter.to_string(),
            qualifiers: qualifiers.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Whether a measure passes the filter.
    pub fn matches(&self, measure: &Measure) -> bool {
        let mut valid = true;
        if !self.parameter.is_empty() {
            valid = measure.parameter == self.parameter;
        }
        if !self.qualifiers.is_empty() {
            valid = measure.parameter == self.parameter
                && self.qualifiers.contains(&measure.qualifier);
        }
        valid
    }

    /// Retain only the measures that pass the filter.
    pub fn apply(&self, measures: Vec<Measure>) -> Vec<Measure> {
        measures.into_iter().filter(|m| self.matches(m)).collect()
    }
}

/// The station types the toolkit knows how to monitor, each carrying
/// the parameter/qualifier combination its measures are filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationKind {
    RiverLevel,
    RiverFlow,
    TidalLevel,
    Temperature,
}

impl StationKind {
    pub fn filter(&self) -> MeasureFilter {
        match self {
            StationKind::RiverLevel => {
                MeasureFilter::new("level", &["Stage", "Downstream Stage", "Height"])
            }
            StationKind::RiverFlow => MeasureFilter::new("flow", &[]),
            StationKind::TidalLevel => MeasureFilter::new("level", &["Tidal Level"]),
            StationKind::Temperature => MeasureFilter::new("temperature", &[]),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationKind::RiverLevel => "River Level",
            StationKind::RiverFlow => "River Flow",
            StationKind::TidalLevel => "Tidal Level",
            StationKind::Temperature => "Temperature",
        }
    }
}
