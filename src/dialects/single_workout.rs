//! Flat single-workout dialect
//!
//! The newer exporter posts one workout per request as a flat document; the
//! document itself is the only workout entry. Field contract is shared with
//! the HealthKit dialect.

use serde_json::Value;

use super::{statistics, DialectParser, RawWorkout};
use crate::error::ImportError;
use crate::types::Dialect;

/// Parser for the flat single-workout export
pub struct SingleWorkoutParser;

impl DialectParser for SingleWorkoutParser {
    fn dialect(&self) -> Dialect {
        Dialect::SingleWorkout
    }

    fn workout_entries<'a>(&self, doc: &'a Value) -> Result<Vec<&'a Value>, ImportError> {
        Ok(vec![doc])
    }

    fn parse_workout(&self, entry: &Value) -> Result<RawWorkout, ImportError> {
        statistics::parse_entry(entry, self.dialect())
    }
}
