//! HealthKit-derived dialect
//!
//! HealthKit exports wrap their workouts in `data.workouts` like the legacy
//! format, but each entry follows the statistics-array field contract.

use serde_json::Value;

use super::{statistics, wrapped_workouts, DialectParser, RawWorkout};
use crate::error::ImportError;
use crate::types::Dialect;

/// Parser for the HealthKit-derived export
pub struct HealthKitParser;

impl DialectParser for HealthKitParser {
    fn dialect(&self) -> Dialect {
        Dialect::HealthKit
    }

    fn workout_entries<'a>(&self, doc: &'a Value) -> Result<Vec<&'a Value>, ImportError> {
        wrapped_workouts(doc, self.dialect())
    }

    fn parse_workout(&self, entry: &Value) -> Result<RawWorkout, ImportError> {
        statistics::parse_entry(entry, self.dialect())
    }
}
