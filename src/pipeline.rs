//! Pipeline orchestration
//!
//! This module provides the public API of Pulseline. One call runs the full
//! import pipeline over a received body:
//! envelope extraction → dialect detection → parsing → normalization →
//! bundle assembly. The pipeline performs no I/O and holds no state across
//! calls; persistence belongs to the caller once bundles are returned.

use serde_json::Value;
use tracing::{debug, warn};

use crate::bundle;
use crate::detect;
use crate::dialects;
use crate::envelope::{self, Transport};
use crate::error::ImportError;
use crate::types::ImportBundle;

/// Outcome of a successful import call
///
/// Per-workout failures do not abort the batch: each failed workout is
/// reported alongside the bundles that did assemble, so one bad entry in a
/// multi-workout document costs exactly that entry.
#[derive(Debug)]
pub struct ImportReport {
    /// Bundles in document order (failed entries are skipped)
    pub bundles: Vec<ImportBundle>,
    /// Entries that failed, with their position in the document
    pub failures: Vec<WorkoutFailure>,
}

impl ImportReport {
    /// True when every workout in the payload assembled.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One workout entry that failed to parse or normalize
#[derive(Debug)]
pub struct WorkoutFailure {
    /// Zero-based position of the entry in the source document
    pub index: usize,
    pub error: ImportError,
}

/// Run the import pipeline over a received body.
///
/// # Arguments
/// * `payload` - Raw request body bytes
/// * `transport` - Declared transport wrapping (see [`Transport::from_content_type`])
/// * `actor_id` - Optional caller identity to stamp onto produced records
///
/// # Returns
/// An [`ImportReport`] with the assembled bundles (an empty report means the
/// payload held no workouts, which is success), or an [`ImportError`] when
/// the document as a whole could not be processed. Every error carries the
/// pipeline stage that raised it via [`ImportError::stage`].
pub fn import(
    payload: &[u8],
    transport: Transport,
    actor_id: Option<&str>,
) -> Result<ImportReport, ImportError> {
    let doc: Value = envelope::extract(payload, transport)?;

    let dialect = detect::detect(&doc).ok_or(ImportError::UnrecognizedDialect)?;
    let parser = dialects::parser_for(dialect);

    let entries = parser.workout_entries(&doc)?;
    debug!(%dialect, workouts = entries.len(), "detected export dialect");

    let mut bundles = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match parser
            .parse_workout(entry)
            .and_then(|raw| bundle::assemble(raw, actor_id))
        {
            Ok(bundle) => bundles.push(bundle),
            Err(error) => {
                warn!(%dialect, index, stage = %error.stage(), %error, "workout failed to import");
                failures.push(WorkoutFailure { index, error });
            }
        }
    }

    debug!(
        imported = bundles.len(),
        failed = failures.len(),
        "import complete"
    );
    Ok(ImportReport { bundles, failures })
}
