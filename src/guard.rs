//! A guard scoping the context slots to one request.

use std::marker::PhantomData;

use crate::context::{ContextSlots, RequestContext};

/// A guard giving the current execution context a fresh slot set.
///
/// Worker threads are reused across requests, so a slot written while
/// serving one request would otherwise still be visible when the next
/// request runs on the same thread. Entering a scope resets the slots;
/// dropping the guard restores whatever was there before.
///
/// # Examples
///
/// ```
/// use concise_logging::{RequestContext, RequestScope};
///
/// let scope = RequestScope::enter();
/// RequestContext::set_client_ip("10.0.0.5");
///
/// // Handle the request, emit the summary line...
///
/// // When `scope` is dropped, the slots written above are gone.
/// drop(scope);
/// assert_eq!(RequestContext::client_ip(), None);
/// ```
#[non_exhaustive]
#[derive(Debug)]
pub struct RequestScope<'a> {
    saved: Option<ContextSlots>,
    // Make this guard unsendable.
    _marker: PhantomData<&'a *mut ()>,
}

impl RequestScope<'_> {
    /// Resets the current execution context's slots, saving the old set.
    #[must_use]
    pub fn enter<'a>() -> RequestScope<'a> {
        let saved = RequestContext::swap_slots(ContextSlots::empty());
        RequestScope {
            saved: Some(saved),
            _marker: PhantomData,
        }
    }
}

impl Drop for RequestScope<'_> {
    fn drop(&mut self) {
        RequestContext::swap_slots(self.saved.take().unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scope_starts_clean() {
        RequestContext::set_redirect_location("/stale");

        let scope = RequestScope::enter();
        assert_eq!(RequestContext::take_redirect_location(), None);
        assert_eq!(RequestContext::client_ip(), None);
        drop(scope);

        // The pre-scope slots come back untouched.
        assert_eq!(
            RequestContext::take_redirect_location().as_deref(),
            Some("/stale")
        );
    }

    #[test]
    fn test_nested_scopes_restore_in_order() {
        let outer = RequestScope::enter();
        RequestContext::set_client_ip("10.0.0.1");

        {
            let inner = RequestScope::enter();
            RequestContext::set_client_ip("10.0.0.2");
            assert_eq!(RequestContext::client_ip().as_deref(), Some("10.0.0.2"));
            drop(inner);
        }

        assert_eq!(RequestContext::client_ip().as_deref(), Some("10.0.0.1"));
        drop(outer);
        assert_eq!(RequestContext::client_ip(), None);
    }
}
