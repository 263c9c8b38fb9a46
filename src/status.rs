//! Derives the status to display, and an exception summary when one escaped.

use std::collections::HashMap;

use crate::event::RequestCompleted;

/// Maps an exception class name to the HTTP status it should display as.
///
/// This is the pluggable seam towards whatever component owns the
/// exception-to-status policy; [`StatusCodeTable`] is the default
/// implementation.
pub trait ExceptionMapper {
    /// The status to display for `class_name`.
    fn status_code_for_exception(&self, class_name: &str) -> u16;
}

/// A fixed exception-class to status-code table.
///
/// Unmapped classes fall back to `500`.
///
/// # Example
///
/// ```
/// use concise_logging::{ExceptionMapper, StatusCodeTable};
///
/// let table = StatusCodeTable::new()
///     .map("RecordNotFound", 404)
///     .map("AccessDenied", 403);
///
/// assert_eq!(table.status_code_for_exception("RecordNotFound"), 404);
/// assert_eq!(table.status_code_for_exception("SomethingElse"), 500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatusCodeTable {
    codes: HashMap<String, u16>,
}

impl StatusCodeTable {
    /// Creates an empty table; every class maps to `500` until mapped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping from `class_name` to `status`.
    #[must_use]
    pub fn map(mut self, class_name: impl Into<String>, status: u16) -> Self {
        self.codes.insert(class_name.into(), status);
        self
    }
}

impl ExceptionMapper for StatusCodeTable {
    fn status_code_for_exception(&self, class_name: &str) -> u16 {
        self.codes.get(class_name).copied().unwrap_or(500)
    }
}

/// Resolves the status to display and, when an exception escaped the
/// request, a human-readable summary of it.
///
/// An explicitly recorded status always wins and suppresses the exception
/// path entirely. Otherwise the exception's class name (its first element)
/// is mapped through `exceptions`, and the remaining detail entries are
/// deduplicated, order preserved, and space-joined into the summary.
/// With neither status nor exception the result is `(None, None)`; the
/// formatter renders that as status `0`.
#[must_use]
pub fn resolve_status(
    event: &RequestCompleted,
    exceptions: &dyn ExceptionMapper,
) -> (Option<u16>, Option<String>) {
    if let Some(status) = event.status {
        return (Some(status), None);
    }
    let Some((class_name, details)) = event.exception.as_deref().and_then(<[String]>::split_first)
    else {
        return (None, None);
    };

    let status = exceptions.status_code_for_exception(class_name);

    let mut unique: Vec<&str> = Vec::with_capacity(details.len());
    for detail in details {
        if !unique.contains(&detail.as_str()) {
            unique.push(detail);
        }
    }
    let summary = if unique.is_empty() {
        None
    } else {
        Some(unique.join(" "))
    };

    (Some(status), summary)
}
