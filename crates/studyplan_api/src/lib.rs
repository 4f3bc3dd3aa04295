//! JSON boundary over StudyPlan core use-cases.
//!
//! # Responsibility
//! - Parse query parameters and JSON bodies into core requests.
//! - Render results as `{ data, extraInfo }` envelopes or plain JSON values.
//! - Classify failures as `400`, `404` or `500` with an `{ error }` body.
//!
//! # Invariants
//! - Endpoint functions never panic; every outcome is an `ApiResponse`.
//! - Callers own the connection; no function here opens a database.

pub mod calendar;
pub mod exams;
pub mod notes;
mod response;
pub mod sessions;
pub mod stats;

pub use response::ApiResponse;

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Safe to call repeatedly with the same `level + log_dir`. Returns an
/// empty string on success and the error message on failure.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match studyplan_core::init_logging(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Core crate version.
pub fn core_version() -> &'static str {
    studyplan_core::core_version()
}
