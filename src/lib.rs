//! # Overview
//!
#![doc = include_utils::include_md!("README.md:description")]
//!
//! A request is instrumented by two events that never call each other: a
//! redirect may be issued somewhere in the middle of handling, and the
//! request completes at the end. This crate correlates the two through
//! execution-context-local storage and renders one colorized summary line
//! per completed request:
//!
//! - [`RequestContext`] holds the per-request slots (redirect target,
//!   client address) without letting concurrent requests see each other.
//! - [`LogSubscriber`] consumes the two events and emits the line through
//!   the [`log`] facade at `warn` level.
//! - [`FutureExt`] carries the slots across `.await` points on
//!   multi-threaded runtimes.
//!
//! ## Basic example
//!
#![doc = include_utils::include_md!("README.md:basic_example")]

use std::collections::BTreeMap;

pub use self::{
    color::{AnsiColors, Color, Colorize, PlainColors},
    context::RequestContext,
    event::{Redirect, RequestCompleted},
    future::FutureExt,
    guard::RequestScope,
    status::{ExceptionMapper, StatusCodeTable, resolve_status},
};

mod color;
mod context;
mod event;
pub mod future;
pub mod guard;
mod status;

/// Param keys injected by routing and dispatch plumbing, never shown.
const INTERNAL_PARAMS: [&str; 5] = ["controller", "action", "format", "_method", "only_path"];

/// Fixed identity token opening every summary line.
const IDENTITY_TAG: &str = "HTTP";

/// Rendered when a payload carries no method at all.
const UNKNOWN_METHOD: &str = "-";

/// The two-method interface a dispatch collaborator registers.
///
/// Both handlers for one logical request are invoked from that request's
/// own execution context, redirects strictly before the single terminal
/// completion. The pairing is what lets an implementation stash state in
/// [`RequestContext`] during `on_redirect` and consume it during
/// `on_request_completed`.
pub trait RequestSubscriber {
    /// A redirect was issued while handling the current request.
    fn on_redirect(&self, event: &Redirect);

    /// The current request finished; `duration_ms` is its total wall time.
    fn on_request_completed(&self, event: &RequestCompleted, duration_ms: f64);
}

/// Formats each completed request into one colorized summary line.
///
/// The line carries the status (colored by class), total duration, the
/// effective method, the path with its query string stripped, the redirect
/// target if one was issued, surviving request parameters, an exception
/// summary when one escaped, the app/db runtime split, and the client
/// address padded to a fixed width.
///
/// # Example
///
/// ```
/// use concise_logging::{
///     LogSubscriber, RequestCompleted, RequestContext, RequestSubscriber, StatusCodeTable,
/// };
///
/// let subscriber = LogSubscriber::new()
///     .with_exception_mapper(StatusCodeTable::new().map("RecordNotFound", 404));
///
/// // Populated by the connection-observing collaborator.
/// RequestContext::set_client_ip("10.0.0.5");
///
/// let event = RequestCompleted {
///     method: Some("GET".to_owned()),
///     path: "/widgets/7".to_owned(),
///     status: Some(200),
///     ..RequestCompleted::default()
/// };
/// // One warn-level line goes out through the `log` facade.
/// subscriber.on_request_completed(&event, 45.6);
/// ```
pub struct LogSubscriber {
    exceptions: Box<dyn ExceptionMapper + Send + Sync>,
    colors: Box<dyn Colorize + Send + Sync>,
}

impl LogSubscriber {
    /// Creates a subscriber with an empty [`StatusCodeTable`] and ANSI
    /// colors.
    #[must_use]
    pub fn new() -> Self {
        LogSubscriber {
            exceptions: Box::new(StatusCodeTable::new()),
            colors: Box::new(AnsiColors),
        }
    }

    /// Replaces the exception-class to status-code collaborator.
    #[must_use]
    pub fn with_exception_mapper<M>(mut self, exceptions: M) -> Self
    where
        M: ExceptionMapper + Send + Sync + 'static,
    {
        self.exceptions = Box::new(exceptions);
        self
    }

    /// Replaces the colorize capability, e.g. with [`PlainColors`] when
    /// the sink is not a terminal.
    #[must_use]
    pub fn with_colors<C>(mut self, colors: C) -> Self
    where
        C: Colorize + Send + Sync + 'static,
    {
        self.colors = Box::new(colors);
        self
    }

    fn format_line(
        &self,
        event: &RequestCompleted,
        duration_ms: f64,
        location: Option<&str>,
        ip: Option<&str>,
    ) -> String {
        // A hidden `_method` form field spoofing PUT/PATCH/DELETE beats
        // the transport-level method.
        let method = event
            .params
            .get("_method")
            .map(|method| method.to_uppercase())
            .or_else(|| event.method.clone())
            .unwrap_or_else(|| UNKNOWN_METHOD.to_owned());

        let (status, exception_summary) = resolve_status(event, self.exceptions.as_ref());
        let path = event.path.split('?').next().unwrap_or_default();
        let params = display_params(&event.params);

        let app = event.view_runtime_ms.unwrap_or_default().floor() as i64;
        let db = event.db_runtime_ms.unwrap_or_default().floor() as i64;

        let mut message = format!(
            "{prefix} {status} in {duration}ms {method} {path}",
            prefix = self.colors.colorize(IDENTITY_TAG, Color::Magenta),
            status = self.format_status(status.unwrap_or(0)),
            duration = duration_ms.round() as i64,
            method = self.format_method(&method),
        );
        if let Some(location) = location {
            message.push_str(&format!(" redirect_to={location}"));
        }
        if !params.is_empty() {
            message.push_str(&format!(" parameters={params}"));
        }
        if let Some(summary) = exception_summary {
            message.push(' ');
            message.push_str(&self.colors.colorize(&summary, Color::Red));
        }
        message.push_str(&format!(" (app: {app}ms db: {db}ms)"));
        message.push_str(&format!(" for {:<15}", ip.unwrap_or_default()));
        message
    }

    fn format_status(&self, status: u16) -> String {
        let color = if status >= 400 {
            Color::Red
        } else if status >= 300 {
            Color::Yellow
        } else {
            Color::Green
        };
        self.colors.colorize(&status.to_string(), color)
    }

    fn format_method(&self, method: &str) -> String {
        let color = if method.trim() == "GET" {
            Color::Cyan
        } else {
            Color::Yellow
        };
        self.colors.colorize(method, color)
    }
}

impl Default for LogSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSubscriber").finish_non_exhaustive()
    }
}

impl RequestSubscriber for LogSubscriber {
    fn on_redirect(&self, event: &Redirect) {
        RequestContext::set_redirect_location(event.location.as_str());
    }

    fn on_request_completed(&self, event: &RequestCompleted, duration_ms: f64) {
        let location = RequestContext::take_redirect_location();
        let ip = RequestContext::client_ip();

        let message = self.format_line(event, duration_ms, location.as_deref(), ip.as_deref());

        // One atomic write per request; line-atomicity is the sink's
        // guarantee, delivery failures are its problem.
        log::warn!("{message}");
    }
}

/// Renders the caller-supplied parameters, or an empty string when only
/// plumbing keys were present.
fn display_params(params: &BTreeMap<String, String>) -> String {
    let entries: Vec<String> = params
        .iter()
        .filter(|(key, _)| !INTERNAL_PARAMS.contains(&key.as_str()))
        .map(|(key, value)| format!("{key:?} => {value:?}"))
        .collect();
    if entries.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", entries.join(", "))
    }
}
