use std::thread;
use std::time::Duration;

use super::thread::Clock;
use super::types::{AudioEvent, LoadId};

#[test]
fn clock_does_not_advance_until_resumed() {
    let clock = Clock::default();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), Duration::ZERO);
    assert!(!clock.is_running());
}

#[test]
fn clock_accumulates_across_pause_and_resume() {
    let mut clock = Clock::default();
    clock.resume();
    thread::sleep(Duration::from_millis(30));
    clock.pause();

    let paused_at = clock.elapsed();
    assert!(paused_at >= Duration::from_millis(30));

    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), paused_at);

    clock.resume();
    thread::sleep(Duration::from_millis(10));
    assert!(clock.elapsed() >= paused_at + Duration::from_millis(10));
}

#[test]
fn clock_reset_keeps_running_state() {
    let mut clock = Clock::default();
    clock.reset_to(Duration::from_secs(42));
    assert_eq!(clock.elapsed(), Duration::from_secs(42));
    assert!(!clock.is_running());

    clock.resume();
    clock.reset_to(Duration::from_secs(7));
    assert!(clock.is_running());
    assert!(clock.elapsed() >= Duration::from_secs(7));
    assert!(clock.elapsed() < Duration::from_secs(8));
}

#[test]
fn load_ids_are_distinct_and_displayable() {
    let first = LoadId::default();
    let second = first.next();
    assert_ne!(first, second);
    assert_eq!(second.next(), first.next().next());

    assert_eq!(second.to_string(), "load#1");
    assert_ne!(
        AudioEvent::Ended { load: first },
        AudioEvent::Ended { load: second }
    );
}
