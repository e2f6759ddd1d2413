//! Dialect parsers
//!
//! One parser per recognized export dialect, behind a common trait. Each
//! parser validates the fields its dialect requires and maps the dialect's
//! field names onto the canonical intermediate [`RawWorkout`]; value
//! conversion (decimals, instants) is left to the field normalizers so every
//! dialect shares one set of conversion rules.

mod healthkit;
mod legacy;
mod single_workout;
mod statistics;

pub use healthkit::HealthKitParser;
pub use legacy::LegacyParser;
pub use single_workout::SingleWorkoutParser;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::ImportError;
use crate::types::Dialect;

/// A dialect-specific parser
///
/// `workout_entries` validates document-level structure and locates the
/// individual workout entries; `parse_workout` validates one entry. The
/// split lets the pipeline isolate per-workout failures without giving up
/// on the rest of the document.
pub trait DialectParser {
    fn dialect(&self) -> Dialect;

    /// Locate the workout entries in a detected document.
    fn workout_entries<'a>(&self, doc: &'a Value) -> Result<Vec<&'a Value>, ImportError>;

    /// Validate one workout entry and map it to the canonical field set.
    fn parse_workout(&self, entry: &Value) -> Result<RawWorkout, ImportError>;
}

/// Parser singleton for a detected dialect.
pub fn parser_for(dialect: Dialect) -> &'static dyn DialectParser {
    match dialect {
        Dialect::LegacyAggregate => &LegacyParser,
        Dialect::SingleWorkout => &SingleWorkoutParser,
        Dialect::HealthKit => &HealthKitParser,
    }
}

/// Dialect-parsed workout: canonical field names, unconverted values
///
/// `start`/`end` stay raw strings and numbers stay [`Number`] here; the
/// normalizers turn them into instants and decimals during assembly.
#[derive(Debug, Clone)]
pub struct RawWorkout {
    pub name: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub start: String,
    pub end: String,
    /// Explicit duration in minutes, when the dialect supplies one
    pub duration: Option<Number>,
    pub active_energy: Option<RawQuantity>,
    pub distance: Option<RawQuantity>,
    pub intensity: Option<RawQuantity>,
    pub temperature: Option<RawQuantity>,
    pub humidity: Option<RawQuantity>,
    pub samples: Vec<RawSample>,
}

/// A `{qty, units}` object as it appears in the source document
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuantity {
    pub qty: Option<Number>,
    pub units: Option<String>,
}

/// One dialect-parsed metric entry, not yet normalized
#[derive(Debug, Clone)]
pub enum RawSample {
    HeartRate(RawRangeEntry),
    HeartRateRecovery(RawRangeEntry),
    ActiveEnergy(RawEnergyEntry),
    Statistic(RawStatisticEntry),
}

/// Avg/min/max entry from the heart-rate style arrays
#[derive(Debug, Clone)]
pub struct RawRangeEntry {
    pub date: String,
    pub source: Option<String>,
    pub units: Option<String>,
    pub avg: Option<Number>,
    pub min: Option<Number>,
    pub max: Option<Number>,
}

/// Accumulated-quantity entry from the active-energy array
#[derive(Debug, Clone)]
pub struct RawEnergyEntry {
    pub date: String,
    pub source: Option<String>,
    pub units: Option<String>,
    pub qty: Option<Number>,
}

/// Entry from a workout-statistics array; all three fields are required by
/// the source contract
#[derive(Debug, Clone)]
pub struct RawStatisticEntry {
    pub kind: String,
    pub value: Number,
    pub unit: String,
}

/// Deserialize an entry into a dialect's serde shape.
///
/// The shapes keep every field optional so absence is reported through
/// [`require`] with a precise field name; a field of the wrong primitive
/// type fails here and carries serde's description of the mismatch.
fn decode<T: DeserializeOwned>(entry: &Value, dialect: Dialect) -> Result<T, ImportError> {
    serde_json::from_value(entry.clone()).map_err(|err| ImportError::MissingRequiredField {
        dialect,
        field: err.to_string(),
    })
}

/// Unwrap a required field, naming it on absence. Parsers never substitute
/// values for required fields.
fn require<T>(value: Option<T>, dialect: Dialect, field: &str) -> Result<T, ImportError> {
    value.ok_or_else(|| ImportError::MissingRequiredField {
        dialect,
        field: field.to_string(),
    })
}

/// Locate `data.workouts` in a wrapped document. A missing `workouts` key is
/// an empty export, not an error; a `data` that is not an object is.
fn wrapped_workouts<'a>(doc: &'a Value, dialect: Dialect) -> Result<Vec<&'a Value>, ImportError> {
    let data = doc
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| ImportError::MissingRequiredField {
            dialect,
            field: "data".to_string(),
        })?;

    match data.get("workouts") {
        Some(workouts) => {
            let entries = workouts
                .as_array()
                .ok_or_else(|| ImportError::MissingRequiredField {
                    dialect,
                    field: "data.workouts".to_string(),
                })?;
            Ok(entries.iter().collect())
        }
        None => Ok(Vec::new()),
    }
}
