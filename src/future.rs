//! Request-context propagation across `.await` points.

use std::task::Poll;

use pin_project::pin_project;

use crate::context::{ContextSlots, RequestContext};

/// Extension trait attaching a private slot set to a future.
///
/// On a multi-threaded runtime a request's task may resume on a different
/// worker thread after every suspension; plain thread-local slots would be
/// left behind on the old worker. Wrapping the request future keeps its
/// slots with the task: they are swapped in before every poll and swapped
/// back out after it.
///
/// # Examples
///
/// ```
/// use concise_logging::{FutureExt, RequestContext};
///
/// async fn handle_request() {
///     RequestContext::set_redirect_location("/login");
///     // ...await downstream work, possibly resuming on another thread...
///     assert_eq!(
///         RequestContext::take_redirect_location().as_deref(),
///         Some("/login"),
///     );
/// }
///
/// let _fut = handle_request().in_request_scope();
/// ```
pub trait FutureExt: Future + Sized {
    /// Gives this future its own context slot set, isolated from every
    /// other task and from the worker threads it runs on.
    fn in_request_scope(self) -> RequestScopeFuture<Self>;
}

impl<F> FutureExt for F
where
    F: Future,
{
    fn in_request_scope(self) -> RequestScopeFuture<Self> {
        RequestScopeFuture {
            inner: self,
            slots: Some(ContextSlots::empty()),
        }
    }
}

/// A future holding the request's context slots between polls.
///
/// This is returned by [`FutureExt::in_request_scope`].
#[pin_project]
#[derive(Debug)]
pub struct RequestScopeFuture<F> {
    #[pin]
    inner: F,
    slots: Option<ContextSlots>,
}

impl<F> Future for RequestScopeFuture<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        let saved = RequestContext::swap_slots(this.slots.take().unwrap_or_default());
        let result = this.inner.poll(cx);
        this.slots.replace(RequestContext::swap_slots(saved));

        result
    }
}
