use std::sync::{Arc, Barrier};
use std::thread;

use concise_logging::{
    LogSubscriber, PlainColors, Redirect, RequestCompleted, RequestContext, RequestSubscriber,
};

use crate::common::{find_line, init_capture_logger};

pub mod common;

fn completed(path: &str) -> RequestCompleted {
    RequestCompleted {
        method: Some("GET".to_owned()),
        path: path.to_owned(),
        status: Some(200),
        ..RequestCompleted::default()
    }
}

#[test]
fn test_overlapping_requests_do_not_share_redirects() {
    let lines = init_capture_logger();
    let subscriber = Arc::new(LogSubscriber::new().with_colors(PlainColors));

    // Hold both requests in flight at once: the first sets its redirect
    // before either is allowed to complete.
    let barrier = Arc::new(Barrier::new(2));

    let redirecting = {
        let subscriber = Arc::clone(&subscriber);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            RequestContext::set_client_ip("10.0.0.1");
            subscriber.on_redirect(&Redirect {
                location: "/moved".to_owned(),
            });
            barrier.wait();
            subscriber.on_request_completed(&completed("/a"), 10.0);
        })
    };
    let plain = {
        let subscriber = Arc::clone(&subscriber);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            RequestContext::set_client_ip("10.0.0.2");
            barrier.wait();
            subscriber.on_request_completed(&completed("/b"), 10.0);
        })
    };
    redirecting.join().unwrap();
    plain.join().unwrap();

    let line_a = find_line(&lines, |line| line.contains(" /a ")).unwrap();
    let line_b = find_line(&lines, |line| line.contains(" /b ")).unwrap();

    assert!(line_a.contains("redirect_to=/moved"));
    assert!(line_a.contains("for 10.0.0.1"));
    assert!(!line_b.contains("redirect_to"));
    assert!(line_b.contains("for 10.0.0.2"));
}
