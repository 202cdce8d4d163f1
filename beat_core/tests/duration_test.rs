use beat_core::time::duration::{duration_channel, DurationOutcome, DurationRequest};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_ready_request_is_known() {
    let outcome = DurationRequest::ready(95.5).wait(Duration::from_millis(10));
    assert_eq!(outcome, DurationOutcome::Known(95.5));
    assert_eq!(outcome.seconds(), Some(95.5));
}

#[test]
fn test_dropped_sender_cancels_without_waiting() {
    let started = Instant::now();
    let outcome = DurationRequest::unavailable().wait(Duration::from_secs(5));
    assert_eq!(outcome, DurationOutcome::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_silent_sender_times_out() {
    let (_sender, request) = duration_channel();
    let outcome = request.wait(Duration::from_millis(20));
    assert_eq!(outcome, DurationOutcome::TimedOut);
    assert_eq!(outcome.seconds(), None);
}

#[test]
fn test_duration_resolved_from_another_thread() {
    let (sender, request) = duration_channel();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        sender.resolve(42.0);
    });

    let outcome = request.wait(Duration::from_secs(5));
    handle.join().unwrap();
    assert_eq!(outcome, DurationOutcome::Known(42.0));
}

#[test]
fn test_unusable_lengths_are_invalid() {
    assert_eq!(
        DurationRequest::ready(0.0).wait(Duration::from_millis(10)),
        DurationOutcome::Invalid(0.0)
    );
    assert!(matches!(
        DurationRequest::ready(f64::INFINITY).wait(Duration::from_millis(10)),
        DurationOutcome::Invalid(_)
    ));
}
