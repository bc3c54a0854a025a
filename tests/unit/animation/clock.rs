use super::*;

#[test]
fn rejects_non_positive_cycles() {
    assert!(AnimationClock::new(0.0).is_err());
    assert!(AnimationClock::new(-5.0).is_err());
    assert!(AnimationClock::new(f64::NAN).is_err());
}

#[test]
fn stopped_clock_reports_no_elapsed() {
    let c = AnimationClock::new(1000.0).unwrap();
    assert!(!c.is_running());
    assert_eq!(c.elapsed(50.0), None);
}

#[test]
fn restart_resets_baseline() {
    let mut c = AnimationClock::new(30_000.0).unwrap();
    c.start(1_000.0);
    assert_eq!(c.elapsed(13_000.0), Some(12_000.0));

    c.stop();
    assert_eq!(c.elapsed(20_000.0), None);

    c.start(20_000.0);
    assert_eq!(c.elapsed(20_000.0), Some(0.0));
    assert_eq!(c.progress_at(0.0), 0.0);
}

#[test]
fn elapsed_never_goes_negative() {
    let mut c = AnimationClock::new(1000.0).unwrap();
    c.start(500.0);
    assert_eq!(c.elapsed(100.0), Some(0.0));
}

#[test]
fn progress_wraps_per_cycle() {
    let c = AnimationClock::new(1000.0).unwrap();
    assert!((c.progress_at(2_250.0) - 0.25).abs() < 1e-12);
}
