//! Legacy aggregate-workout dialect
//!
//! The oldest exporter wraps everything in `data.workouts`; each entry
//! carries a `start`/`end` span, aggregate quantity objects, and per-sample
//! arrays for heart rate, heart-rate recovery and active energy. Heart-rate
//! fields are capitalized (`Avg`/`Min`/`Max`) in the source.

use serde::Deserialize;
use serde_json::{Number, Value};

use super::{
    decode, require, wrapped_workouts, DialectParser, RawEnergyEntry, RawQuantity, RawRangeEntry,
    RawSample, RawWorkout,
};
use crate::error::ImportError;
use crate::types::Dialect;

/// Parser for the legacy aggregate export
pub struct LegacyParser;

impl DialectParser for LegacyParser {
    fn dialect(&self) -> Dialect {
        Dialect::LegacyAggregate
    }

    fn workout_entries<'a>(&self, doc: &'a Value) -> Result<Vec<&'a Value>, ImportError> {
        wrapped_workouts(doc, self.dialect())
    }

    fn parse_workout(&self, entry: &Value) -> Result<RawWorkout, ImportError> {
        let dialect = self.dialect();
        // a source-supplied `id` is ignored here: workout identity is always
        // generated fresh at assembly
        let w: WorkoutJson = decode(entry, dialect)?;

        let start = require(w.start, dialect, "start")?;
        let end = require(w.end, dialect, "end")?;

        let mut samples = Vec::new();
        for e in w.heart_rate_data.unwrap_or_default() {
            samples.push(RawSample::HeartRate(range_entry(
                e,
                dialect,
                "heartRateData[].date",
            )?));
        }
        for e in w.heart_rate_recovery.unwrap_or_default() {
            samples.push(RawSample::HeartRateRecovery(range_entry(
                e,
                dialect,
                "heartRateRecovery[].date",
            )?));
        }
        for e in w.active_energy.unwrap_or_default() {
            samples.push(RawSample::ActiveEnergy(RawEnergyEntry {
                date: require(e.date, dialect, "activeEnergy[].date")?,
                source: e.source,
                units: e.units,
                qty: e.qty,
            }));
        }

        Ok(RawWorkout {
            name: w.name,
            location: w.location,
            source: None,
            start,
            end,
            duration: w.duration,
            active_energy: w.active_energy_burned,
            distance: w.distance,
            intensity: w.intensity,
            temperature: w.temperature,
            humidity: w.humidity,
            samples,
        })
    }
}

fn range_entry(
    e: RangeEntryJson,
    dialect: Dialect,
    date_field: &str,
) -> Result<RawRangeEntry, ImportError> {
    Ok(RawRangeEntry {
        date: require(e.date, dialect, date_field)?,
        source: e.source,
        units: e.units,
        avg: e.avg,
        min: e.min,
        max: e.max,
    })
}

#[derive(Debug, Deserialize)]
struct WorkoutJson {
    name: Option<String>,
    location: Option<String>,
    start: Option<String>,
    end: Option<String>,
    duration: Option<Number>,
    #[serde(rename = "activeEnergyBurned")]
    active_energy_burned: Option<RawQuantity>,
    distance: Option<RawQuantity>,
    intensity: Option<RawQuantity>,
    humidity: Option<RawQuantity>,
    temperature: Option<RawQuantity>,
    #[serde(rename = "heartRateData")]
    heart_rate_data: Option<Vec<RangeEntryJson>>,
    #[serde(rename = "heartRateRecovery")]
    heart_rate_recovery: Option<Vec<RangeEntryJson>>,
    #[serde(rename = "activeEnergy")]
    active_energy: Option<Vec<EnergyEntryJson>>,
}

#[derive(Debug, Deserialize)]
struct RangeEntryJson {
    #[serde(rename = "Avg")]
    avg: Option<Number>,
    #[serde(rename = "Min")]
    min: Option<Number>,
    #[serde(rename = "Max")]
    max: Option<Number>,
    units: Option<String>,
    date: Option<String>,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnergyEntryJson {
    qty: Option<Number>,
    units: Option<String>,
    date: Option<String>,
    source: Option<String>,
}
