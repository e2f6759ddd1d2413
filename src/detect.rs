//! Structural dialect detection
//!
//! None of the export formats declare a version tag, so the dialect is
//! decided once per document from its shape alone. Detection is total:
//! every document either matches exactly one dialect or is unrecognized.

use serde_json::Value;

use crate::types::Dialect;

/// Fields that only appear in legacy aggregate workout entries.
const LEGACY_ENTRY_MARKERS: [&str; 13] = [
    "start",
    "end",
    "name",
    "location",
    "duration",
    "activeEnergyBurned",
    "distance",
    "intensity",
    "humidity",
    "temperature",
    "heartRateData",
    "heartRateRecovery",
    "activeEnergy",
];

/// Decide which dialect a parsed document represents.
///
/// Wrapped documents (`data.workouts`) are discriminated by their first
/// workout entry. An entry that could satisfy both wrapped dialects is
/// resolved in favor of HealthKit, which requires more fields and is
/// therefore the more specific match. An empty `workouts` array carries no
/// discriminating entry at all; it is routed to the legacy parser, where it
/// yields a successful empty import.
pub fn detect(doc: &Value) -> Option<Dialect> {
    let obj = doc.as_object()?;

    if let Some(workouts) = obj
        .get("data")
        .and_then(|data| data.get("workouts"))
        .and_then(Value::as_array)
    {
        let first = match workouts.iter().find(|w| w.is_object()) {
            Some(first) => first,
            None => return Some(Dialect::LegacyAggregate),
        };

        if first.get("startDate").is_some() || first.get("endDate").is_some() {
            return Some(Dialect::HealthKit);
        }
        if LEGACY_ENTRY_MARKERS.iter().any(|key| first.get(key).is_some()) {
            return Some(Dialect::LegacyAggregate);
        }
        return None;
    }

    if obj.contains_key("type") && obj.contains_key("startDate") && obj.contains_key("endDate") {
        return Some(Dialect::SingleWorkout);
    }

    None
}
