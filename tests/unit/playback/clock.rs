use super::*;

#[test]
fn manual_clock_is_shared_between_clones() {
    let clock = ManualClock::new();
    let handle = clock.clone();
    assert_eq!(clock.now(), Duration::ZERO);
    handle.advance(Duration::from_millis(250));
    assert_eq!(clock.now(), Duration::from_millis(250));
    handle.set(Duration::from_secs(3));
    assert_eq!(clock.now(), Duration::from_secs(3));
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock::new();
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn virtual_ticks_advance_clock_and_stop_at_limit() {
    let clock = ManualClock::new();
    let mut ticks = VirtualTicks::new(clock.clone(), Duration::from_millis(100)).limit(3);
    assert_eq!(ticks.next_tick(), Some(Duration::from_millis(100)));
    assert_eq!(ticks.next_tick(), Some(Duration::from_millis(200)));
    assert_eq!(ticks.next_tick(), Some(Duration::from_millis(300)));
    assert_eq!(ticks.next_tick(), None);
    assert_eq!(clock.now(), Duration::from_millis(300));
}

#[test]
fn interval_ticks_sleep_between_ticks() {
    let mut ticks = IntervalTicks::new(Duration::from_millis(5)).limit(2);
    let start = Instant::now();
    assert!(ticks.next_tick().is_some());
    assert!(ticks.next_tick().is_some());
    assert!(ticks.next_tick().is_none());
    assert!(start.elapsed() >= Duration::from_millis(10));
}

#[test]
fn from_hz_zero_does_not_panic() {
    let mut ticks = IntervalTicks::from_hz(0).limit(0);
    assert!(ticks.next_tick().is_none());
}
