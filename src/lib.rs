//! Pulseline - Import normalization engine for health-tracking export payloads
//!
//! Pulseline converts export payloads from mutually incompatible health
//! tracking clients into a canonical, strongly-typed record set through a
//! deterministic pipeline: envelope extraction → dialect detection →
//! parsing → field normalization → bundle assembly.
//!
//! The pipeline is a pure, synchronous transformation over already-received
//! bytes: no I/O, no shared state, one [`pipeline::import`] call per payload.
//! The surrounding HTTP layer hands in raw bytes plus a content-type hint
//! and receives bundles (or a typed failure) to persist or report.

pub mod bundle;
pub mod detect;
pub mod dialects;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use envelope::Transport;
pub use error::{ImportError, Stage};
pub use pipeline::{import, ImportReport, WorkoutFailure};
pub use types::{Dialect, ImportBundle, MetricRecord, NormalizedQuantity, WorkoutRecord};

/// Pulseline version embedded in CLI reports
pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");
