//! Core types for the Pulseline import pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: the dialect tag, normalized field values, canonical workout and
//! metric records, and the import bundle handed to storage.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recognized export dialects
///
/// Detection is structural (none of the source formats carry a version tag),
/// so this set is closed: adding an exporter means adding a variant and a
/// parser, not threading new conditionals through existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Aggregate export: `data.workouts` entries with `start`/`end`,
    /// quantity objects and per-sample arrays
    LegacyAggregate,
    /// Flat single-workout document with `startDate`/`endDate` and a
    /// statistics array
    SingleWorkout,
    /// HealthKit-derived export: `data.workouts` entries shaped like the
    /// single-workout document
    HealthKit,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::LegacyAggregate => "legacy_aggregate",
            Dialect::SingleWorkout => "single_workout",
            Dialect::HealthKit => "healthkit",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A magnitude/unit pair after normalization
///
/// Both halves are independently optional: the source formats permit a unit
/// without a value (`{"qty": null, "units": "km"}`) as well as a wholly
/// absent quantity object. Absent never collapses to zero here; zero
/// substitution is a presentation concern outside this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuantity {
    /// Fixed-precision magnitude, converted from the exact source text
    pub magnitude: Option<Decimal>,
    /// Source unit label, passed through verbatim
    pub unit: Option<String>,
}

impl NormalizedQuantity {
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Canonical workout row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Freshly generated identity; never derived from source data, so
    /// repeated imports and imports from different users cannot collide
    pub id: Uuid,
    /// Caller identity stamped onto the record, when supplied
    pub actor_id: Option<String>,
    /// Workout name or activity type label
    pub name: Option<String>,
    pub location: Option<String>,
    /// Exporting application name
    pub source: Option<String>,
    /// Start of the temporal span; always offset-aware
    pub start: DateTime<FixedOffset>,
    /// End of the temporal span; `start <= end` holds for every record
    pub end: DateTime<FixedOffset>,
    /// Duration in minutes: supplied by the dialect, or derived from the span
    pub duration_minutes: Decimal,
    pub active_energy: NormalizedQuantity,
    pub distance: NormalizedQuantity,
    pub intensity: NormalizedQuantity,
    pub temperature: NormalizedQuantity,
    pub humidity: NormalizedQuantity,
}

/// Heart-rate style sample: avg/min/max at a moment, shared by the
/// heart-rate and heart-rate-recovery arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeSample {
    pub workout_id: Uuid,
    pub recorded_at: DateTime<FixedOffset>,
    pub source: Option<String>,
    pub unit: Option<String>,
    pub avg: Option<Decimal>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

/// Accumulated-quantity sample (active energy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySample {
    pub workout_id: Uuid,
    pub recorded_at: DateTime<FixedOffset>,
    pub source: Option<String>,
    pub unit: Option<String>,
    pub qty: Option<Decimal>,
}

/// Workout-statistic row from the statistics-array dialects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticSample {
    pub workout_id: Uuid,
    /// Statistic rows carry no timestamp of their own; they are stamped
    /// with the owning workout's start instant
    pub recorded_at: DateTime<FixedOffset>,
    /// Statistic type identifier (e.g. `HKQuantityTypeIdentifierActiveEnergyBurned`)
    pub kind: String,
    pub value: Decimal,
    pub unit: String,
}

/// One metric row owned by a workout
///
/// A metric never outlives its bundle and is never persisted independently
/// of it; every variant carries the owning workout's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum MetricRecord {
    HeartRate(RangeSample),
    HeartRateRecovery(RangeSample),
    ActiveEnergy(EnergySample),
    Statistic(StatisticSample),
}

impl MetricRecord {
    /// Identity of the owning workout
    pub fn workout_id(&self) -> Uuid {
        match self {
            MetricRecord::HeartRate(s) | MetricRecord::HeartRateRecovery(s) => s.workout_id,
            MetricRecord::ActiveEnergy(s) => s.workout_id,
            MetricRecord::Statistic(s) => s.workout_id,
        }
    }

    pub fn recorded_at(&self) -> DateTime<FixedOffset> {
        match self {
            MetricRecord::HeartRate(s) | MetricRecord::HeartRateRecovery(s) => s.recorded_at,
            MetricRecord::ActiveEnergy(s) => s.recorded_at,
            MetricRecord::Statistic(s) => s.recorded_at,
        }
    }
}

/// Unit of pipeline output: one workout plus all of its metric rows
///
/// Storage persists the workout row first, then each metric row referencing
/// it, as one logical unit per bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBundle {
    pub workout: WorkoutRecord,
    pub metrics: Vec<MetricRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::LegacyAggregate.to_string(), "legacy_aggregate");
        assert_eq!(Dialect::SingleWorkout.to_string(), "single_workout");
        assert_eq!(Dialect::HealthKit.to_string(), "healthkit");
    }

    #[test]
    fn test_absent_quantity() {
        let q = NormalizedQuantity::absent();
        assert!(q.magnitude.is_none());
        assert!(q.unit.is_none());
    }
}
