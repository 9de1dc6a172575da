//! Scanner thread lifecycle and cleanup to prevent thread leaks.
//!
//! Verifies that:
//! - The pump thread is cleaned up when the Scanner is dropped
//! - Multiple scanners can be created and destroyed in sequence
//! - Queued advertisements are delivered to the consumer

use std::time::Duration;
use weigh_core::mocks::{VecSource, scale_advertisement};
use weigh_core::scanner::Scanner;
use weigh_traits::clock::MonotonicClock;

#[test]
fn scanner_thread_exits_on_drop() {
    let source = VecSource::new([]);
    let scanner = Scanner::spawn(source, Duration::from_millis(50), MonotonicClock::new());

    // Give thread time to start
    std::thread::sleep(Duration::from_millis(50));

    // Drop the scanner - thread should exit gracefully
    drop(scanner);

    std::thread::sleep(Duration::from_millis(50));
}

#[test]
fn queued_advertisements_are_delivered() {
    let source = VecSource::new([scale_advertisement(180.0), scale_advertisement(180.1)]);
    let scanner = Scanner::spawn(source, Duration::from_millis(20), MonotonicClock::new());

    let first = scanner.recv_timeout(Duration::from_millis(500)).expect("first advert");
    assert_eq!(first.local_name.as_deref(), Some("UREVO"));
    assert!(scanner.recv_timeout(Duration::from_millis(500)).is_some());
}

#[test]
fn multiple_scanners_dont_leak_threads() {
    for _ in 0..10 {
        let source = VecSource::new([scale_advertisement(180.0)]);
        let scanner = Scanner::spawn(source, Duration::from_millis(20), MonotonicClock::new());

        // Let it run briefly
        std::thread::sleep(Duration::from_millis(10));

        let _ = scanner.try_recv();
        drop(scanner);
    }

    // All threads should have exited
    std::thread::sleep(Duration::from_millis(100));
}

#[test]
fn scanner_shutdown_is_prompt() {
    let source = VecSource::new([]);
    let scanner = Scanner::spawn(source, Duration::from_millis(50), MonotonicClock::new());

    std::thread::sleep(Duration::from_millis(100));

    let start = std::time::Instant::now();
    drop(scanner);
    let shutdown_time = start.elapsed();

    // Worst case: the in-flight source.recv() timeout plus join overhead.
    assert!(
        shutdown_time < Duration::from_millis(200),
        "Shutdown took {shutdown_time:?}, expected < 200ms"
    );
}

#[test]
fn stall_tracking_moves_with_deliveries() {
    let source = VecSource::new([scale_advertisement(180.0)]);
    let scanner = Scanner::spawn(source, Duration::from_millis(20), MonotonicClock::new());

    // After the single advert is pumped, last-ok stops advancing.
    let _ = scanner.recv_timeout(Duration::from_millis(500));
    std::thread::sleep(Duration::from_millis(100));
    assert!(scanner.stalled_for_now() >= 50);
}
