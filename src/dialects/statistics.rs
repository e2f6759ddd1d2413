//! Shared entry mapping for the statistics-array dialects
//!
//! The single-workout and HealthKit dialects describe a workout with the
//! same field contract (`type`/`startDate`/`endDate`/`sourceName` plus an
//! optional `workoutStatistics` array); they differ only in where the entry
//! sits in the document. Both parsers delegate entry mapping here.

use serde::Deserialize;
use serde_json::{Number, Value};

use super::{decode, require, RawSample, RawStatisticEntry, RawWorkout};
use crate::error::ImportError;
use crate::types::Dialect;

pub(super) fn parse_entry(entry: &Value, dialect: Dialect) -> Result<RawWorkout, ImportError> {
    // a source-supplied `uuid` is ignored; identity is generated at assembly
    let w: WorkoutJson = decode(entry, dialect)?;

    let kind = require(w.kind, dialect, "type")?;
    let start = require(w.start_date, dialect, "startDate")?;
    let end = require(w.end_date, dialect, "endDate")?;
    let source = require(w.source_name, dialect, "sourceName")?;

    let mut samples = Vec::new();
    for s in w.workout_statistics.unwrap_or_default() {
        samples.push(RawSample::Statistic(RawStatisticEntry {
            kind: require(s.kind, dialect, "workoutStatistics[].type")?,
            value: require(s.value, dialect, "workoutStatistics[].value")?,
            unit: require(s.unit, dialect, "workoutStatistics[].unit")?,
        }));
    }

    Ok(RawWorkout {
        name: Some(kind),
        location: None,
        source: Some(source),
        start,
        end,
        // these exports never carry an explicit duration; it is derived
        // from the span during normalization
        duration: None,
        active_energy: None,
        distance: None,
        intensity: None,
        temperature: None,
        humidity: None,
        samples,
    })
}

#[derive(Debug, Deserialize)]
struct WorkoutJson {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    #[serde(rename = "sourceName")]
    source_name: Option<String>,
    #[serde(rename = "workoutStatistics")]
    workout_statistics: Option<Vec<StatisticJson>>,
}

#[derive(Debug, Deserialize)]
struct StatisticJson {
    #[serde(rename = "type")]
    kind: Option<String>,
    value: Option<Number>,
    unit: Option<String>,
}
