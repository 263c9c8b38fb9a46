use std::cell::RefCell;

thread_local! {
    pub(crate) static REQUEST_CONTEXT: RequestContext = const { RequestContext::new() };
}

/// Slot values owned by a single execution context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSlots {
    pub redirect_location: Option<String>,
    pub client_ip: Option<String>,
}

impl ContextSlots {
    pub(crate) const fn empty() -> Self {
        ContextSlots {
            redirect_location: None,
            client_ip: None,
        }
    }
}

/// Execution-context-local storage correlating the two per-request events.
///
/// A redirect and the completion of the request that issued it are delivered
/// as two independent events with no call relationship between them; the only
/// thing they share is running on the same execution context. `RequestContext`
/// gives that context a private slot set, so a value written while handling
/// one event can be read while handling the other, and concurrent requests
/// can never observe each other's slots.
///
/// # Example
///
/// ```
/// use concise_logging::RequestContext;
///
/// RequestContext::set_redirect_location("/login");
/// assert_eq!(RequestContext::take_redirect_location().as_deref(), Some("/login"));
/// // The slot is cleared by the take, so a later request on this
/// // execution context starts clean.
/// assert_eq!(RequestContext::take_redirect_location(), None);
/// ```
#[derive(Debug)]
pub struct RequestContext {
    slots: RefCell<ContextSlots>,
}

impl RequestContext {
    pub(crate) const fn new() -> Self {
        RequestContext {
            slots: RefCell::new(ContextSlots::empty()),
        }
    }

    /// Stores the target of a redirect issued by the current request.
    ///
    /// A request that issues several redirects before the final one is
    /// followed overwrites the slot each time; the last redirect wins.
    pub fn set_redirect_location(location: impl Into<String>) {
        REQUEST_CONTEXT.with(|ctx| {
            ctx.slots.borrow_mut().redirect_location = Some(location.into());
        });
    }

    /// Returns the captured redirect target and clears the slot.
    ///
    /// Safe to call when no redirect was issued; the slot is left `None`
    /// either way, so the value cannot leak into an unrelated request that
    /// later reuses this execution context.
    pub fn take_redirect_location() -> Option<String> {
        REQUEST_CONTEXT.with(|ctx| ctx.slots.borrow_mut().redirect_location.take())
    }

    /// Records the inbound client address for the current request.
    ///
    /// Called by the connection-observing collaborator before the request
    /// completes; the formatter only ever reads it.
    pub fn set_client_ip(ip: impl Into<String>) {
        REQUEST_CONTEXT.with(|ctx| {
            ctx.slots.borrow_mut().client_ip = Some(ip.into());
        });
    }

    /// The inbound client address, if one was recorded for this context.
    #[must_use]
    pub fn client_ip() -> Option<String> {
        REQUEST_CONTEXT.with(|ctx| ctx.slots.borrow().client_ip.clone())
    }

    /// Replaces the current slot set, returning the previous one.
    pub(crate) fn swap_slots(slots: ContextSlots) -> ContextSlots {
        REQUEST_CONTEXT.with(|ctx| ctx.slots.replace(slots))
    }
}
