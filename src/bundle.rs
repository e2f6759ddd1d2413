//! Bundle assembly
//!
//! Combines one dialect-parsed workout with its metric entries into an
//! [`ImportBundle`]: normalizes every field, generates the workout identity,
//! and attaches each metric to it. Assembly of one workout is independent of
//! its siblings; the pipeline collects per-workout failures around this.

use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::dialects::{RawRangeEntry, RawSample, RawWorkout};
use crate::error::ImportError;
use crate::normalize;
use crate::types::{
    EnergySample, ImportBundle, MetricRecord, RangeSample, StatisticSample, WorkoutRecord,
};

/// Assemble one workout and its metric entries into a bundle.
///
/// The workout id is always freshly generated, regardless of any identifier
/// in the source document, so repeated imports and imports from different
/// users cannot collide. When the dialect supplies an explicit duration it
/// is trusted as-is; otherwise the duration is derived from the span. A
/// supplied duration that disagrees with the derived one beyond a second is
/// logged, not rejected.
pub fn assemble(raw: RawWorkout, actor_id: Option<&str>) -> Result<ImportBundle, ImportError> {
    let start = normalize::instant(&raw.start)?;
    let end = normalize::instant(&raw.end)?;
    if start > end {
        return Err(ImportError::InvalidTemporalValue(format!(
            "workout starts at {start} but ends earlier at {end}"
        )));
    }

    let derived = normalize::span_minutes(start, end);
    let duration_minutes = match raw.duration {
        Some(n) => {
            let supplied = normalize::decimal(&n)?;
            if (supplied - derived).abs() > Decimal::ONE / Decimal::from(60) {
                warn!(%supplied, %derived, "supplied duration disagrees with span");
            }
            supplied
        }
        None => derived,
    };

    let id = Uuid::new_v4();

    let mut metrics = Vec::with_capacity(raw.samples.len());
    for sample in raw.samples {
        metrics.push(match sample {
            RawSample::HeartRate(e) => MetricRecord::HeartRate(range_sample(id, e)?),
            RawSample::HeartRateRecovery(e) => {
                MetricRecord::HeartRateRecovery(range_sample(id, e)?)
            }
            RawSample::ActiveEnergy(e) => MetricRecord::ActiveEnergy(EnergySample {
                workout_id: id,
                recorded_at: normalize::instant(&e.date)?,
                source: e.source,
                unit: e.units,
                qty: normalize::optional_decimal(e.qty.as_ref())?,
            }),
            // statistic rows carry no timestamp; stamp the workout's start
            RawSample::Statistic(s) => MetricRecord::Statistic(StatisticSample {
                workout_id: id,
                recorded_at: start,
                kind: s.kind,
                value: normalize::decimal(&s.value)?,
                unit: s.unit,
            }),
        });
    }

    let workout = WorkoutRecord {
        id,
        actor_id: actor_id.map(str::to_string),
        name: raw.name,
        location: raw.location,
        source: raw.source,
        start,
        end,
        duration_minutes,
        active_energy: normalize::quantity_pair(raw.active_energy.as_ref())?,
        distance: normalize::quantity_pair(raw.distance.as_ref())?,
        intensity: normalize::quantity_pair(raw.intensity.as_ref())?,
        temperature: normalize::quantity_pair(raw.temperature.as_ref())?,
        humidity: normalize::quantity_pair(raw.humidity.as_ref())?,
    };

    Ok(ImportBundle { workout, metrics })
}

fn range_sample(workout_id: Uuid, e: RawRangeEntry) -> Result<RangeSample, ImportError> {
    Ok(RangeSample {
        workout_id,
        recorded_at: normalize::instant(&e.date)?,
        source: e.source,
        unit: e.units,
        avg: normalize::optional_decimal(e.avg.as_ref())?,
        min: normalize::optional_decimal(e.min.as_ref())?,
        max: normalize::optional_decimal(e.max.as_ref())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialects::{RawEnergyEntry, RawStatisticEntry};
    use pretty_assertions::assert_eq;
    use serde_json::Number;

    fn num(text: &str) -> Number {
        serde_json::from_str(text).unwrap()
    }

    fn bare_workout() -> RawWorkout {
        RawWorkout {
            name: Some("Run".to_string()),
            location: None,
            source: None,
            start: "2024-01-01 08:00:00 +0000".to_string(),
            end: "2024-01-01 08:30:00 +0000".to_string(),
            duration: None,
            active_energy: None,
            distance: None,
            intensity: None,
            temperature: None,
            humidity: None,
            samples: Vec::new(),
        }
    }

    #[test]
    fn test_identity_is_always_fresh() {
        let a = assemble(bare_workout(), None).unwrap();
        let b = assemble(bare_workout(), None).unwrap();
        assert_ne!(a.workout.id, b.workout.id);
    }

    #[test]
    fn test_zero_metric_bundle_is_valid() {
        let bundle = assemble(bare_workout(), None).unwrap();
        assert!(bundle.metrics.is_empty());
        assert_eq!(bundle.workout.name.as_deref(), Some("Run"));
    }

    #[test]
    fn test_derived_duration() {
        let bundle = assemble(bare_workout(), None).unwrap();
        assert_eq!(bundle.workout.duration_minutes, Decimal::from(30));
    }

    #[test]
    fn test_supplied_duration_is_trusted() {
        let mut raw = bare_workout();
        raw.duration = Some(num("25"));
        let bundle = assemble(raw, None).unwrap();
        assert_eq!(bundle.workout.duration_minutes, Decimal::from(25));
    }

    #[test]
    fn test_metrics_reference_the_workout() {
        let mut raw = bare_workout();
        raw.samples = vec![
            RawSample::HeartRate(RawRangeEntry {
                date: "2024-01-01 08:10:00 +0000".to_string(),
                source: Some("Watch".to_string()),
                units: Some("bpm".to_string()),
                avg: Some(num("140")),
                min: None,
                max: None,
            }),
            RawSample::ActiveEnergy(RawEnergyEntry {
                date: "2024-01-01 08:05:00 +0000".to_string(),
                source: None,
                units: Some("kcal".to_string()),
                qty: Some(num("12.25")),
            }),
        ];
        let bundle = assemble(raw, None).unwrap();
        assert_eq!(bundle.metrics.len(), 2);
        for metric in &bundle.metrics {
            assert_eq!(metric.workout_id(), bundle.workout.id);
        }
    }

    #[test]
    fn test_statistics_stamped_with_workout_start() {
        let mut raw = bare_workout();
        raw.samples = vec![RawSample::Statistic(RawStatisticEntry {
            kind: "HKQuantityTypeIdentifierActiveEnergyBurned".to_string(),
            value: num("412.72"),
            unit: "kcal".to_string(),
        })];
        let bundle = assemble(raw, None).unwrap();
        assert_eq!(bundle.metrics[0].recorded_at(), bundle.workout.start);
    }

    #[test]
    fn test_actor_is_stamped() {
        let bundle = assemble(bare_workout(), Some("user-7")).unwrap();
        assert_eq!(bundle.workout.actor_id.as_deref(), Some("user-7"));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let mut raw = bare_workout();
        raw.start = "2024-01-01 09:00:00 +0000".to_string();
        raw.end = "2024-01-01 08:00:00 +0000".to_string();
        let err = assemble(raw, None).unwrap_err();
        assert!(matches!(err, ImportError::InvalidTemporalValue(_)));
    }

    #[test]
    fn test_bad_sample_timestamp_fails_the_workout() {
        let mut raw = bare_workout();
        raw.samples = vec![RawSample::HeartRate(RawRangeEntry {
            date: "not a timestamp".to_string(),
            source: None,
            units: None,
            avg: None,
            min: None,
            max: None,
        })];
        let err = assemble(raw, None).unwrap_err();
        assert!(matches!(err, ImportError::InvalidTemporalValue(_)));
    }

    #[test]
    fn test_decimal_fidelity_through_assembly() {
        let mut raw = bare_workout();
        raw.active_energy = Some(crate::dialects::RawQuantity {
            qty: Some(num("19.999999")),
            units: Some("kcal".to_string()),
        });
        let bundle = assemble(raw, None).unwrap();
        assert_eq!(
            bundle.workout.active_energy.magnitude.unwrap().to_string(),
            "19.999999"
        );
    }
}
