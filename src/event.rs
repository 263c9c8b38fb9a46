//! Typed payloads for the two instrumentation events this crate consumes.
//!
//! The dispatch collaborator delivers events as named payloads; decoding
//! them into these structs at that boundary keeps the formatter free of
//! stringly-typed map lookups.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Emitted when a request handler issues a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Redirect {
    /// The target the client is being sent to.
    pub location: String,
}

/// Emitted when request processing finishes, successfully or not.
///
/// Every field except `path` may be absent in a real payload: a request
/// that dies before routing has no method, one that dies in an exception
/// has no status, and the runtime timings only exist when the respective
/// layer ran. Absence is normal, not an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestCompleted {
    /// HTTP method as the framework recorded it.
    pub method: Option<String>,
    /// Request path, possibly still carrying its query string.
    pub path: String,
    /// Request parameters, routing plumbing included.
    pub params: BTreeMap<String, String>,
    /// Status the framework recorded, absent when an exception escaped.
    pub status: Option<u16>,
    /// Exception class name first, structured detail entries after it.
    pub exception: Option<Vec<String>>,
    /// Time spent rendering, in milliseconds.
    pub view_runtime_ms: Option<f64>,
    /// Time spent in the database, in milliseconds.
    pub db_runtime_ms: Option<f64>,
}
