//! Station inspection commands: metadata, latest readings, and
//! reading summaries over a date range.

use fmn_api::measure::{Measure, StationKind};
use fmn_api::reading::{mean_value, value_span};
use fmn_api::station::FloodApiClient;
use log::info;

/// Print a station summary and each measure matching the station kind.
pub async fn run_station_info(station_id: &str, kind: StationKind) -> anyhow::Result<()> {
    let client = FloodApiClient::new()?;
    let station = client.get_station(station_id).await?;
    let measures = client.get_measures(station_id, &kind.filter()).await?;

    println!("Station Type : {}", kind.label());
    println!("{}", station);
    for measure in &measures {
        println!("{}", measure);
    }
    Ok(())
}

/// Print the latest reading for each matching measure. Falls back to a
/// limited readings query when the measure metadata carries no latest
/// reading.
pub async fn run_latest(station_id: &str, kind: StationKind) -> anyhow::Result<()> {
    let client = FloodApiClient::new()?;
    let measures = client.get_measures(station_id, &kind.filter()).await?;

    for measure in &measures {
        let latest = match measure.latest() {
            Some(reading) => Some(reading),
            None => fetch_latest(&client, measure).await,
        };
        match latest {
            Some(reading) => match reading.value {
                Some(value) => println!(
                    "{} : {} {} at {}",
                    measure.notation, value, measure.units, reading.datetime
                ),
                None => println!("{} : no value recorded", measure.notation),
            },
            None => println!("{} : no readings available", measure.notation),
        }
    }
    Ok(())
}

async fn fetch_latest(
    client: &FloodApiClient,
    measure: &Measure,
) -> Option<fmn_api::reading::Reading> {
    let range = fmn_api::date_range::DateRange::today();
    match client.get_readings(&measure.notation, &range, Some(1)).await {
        Ok(readings) => readings.into_iter().last(),
        Err(e) => {
            info!("No latest reading for {}: {}", measure.notation, e);
            None
        }
    }
}

/// Print mean and spread of each matching measure's readings over the
/// range. For tidal level measures the spread is the tidal range.
pub async fn run_stats(
    station_id: &str,
    kind: StationKind,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<()> {
    let range = crate::resolve_range(start, end)?;
    let client = FloodApiClient::new()?;
    let measures = client.get_measures(station_id, &kind.filter()).await?;

    for (idx, measure) in measures.iter().enumerate() {
        // Be polite to the API between measure queries
        if idx > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
        let readings = client.get_readings(&measure.notation, &range, None).await?;
        info!(
            "{} readings for {} between {} and {}",
            readings.len(),
            measure.notation,
            range.start(),
            range.end()
        );
        match (mean_value(&readings), value_span(&readings)) {
            (Some(mean), Some(span)) => println!(
                "{} : mean {:.2} {units}, spread {:.2} {units}",
                measure.notation,
                mean,
                span,
                units = measure.units
            ),
            _ => println!("{} : no readings in range", measure.notation),
        }
    }
    Ok(())
}
