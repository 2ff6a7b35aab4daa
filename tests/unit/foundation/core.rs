use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn elapsed_frames_floor_is_exact_on_boundaries() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.elapsed_to_frames_floor(Duration::from_secs(1)), 30);
    assert_eq!(
        fps.elapsed_to_frames_floor(Duration::from_nanos(33_333_333)),
        0
    );
    assert_eq!(
        fps.elapsed_to_frames_floor(Duration::from_nanos(33_333_334)),
        1
    );
    assert!((fps.frame_delay_ms() - 33.333).abs() < 0.001);
}

#[test]
fn timing_total_frames_rounds() {
    let t = Timing::new(5.0, Fps::new(30, 1).unwrap()).unwrap();
    assert_eq!(t.total_frames(), 150);
    let t = Timing::new(1.0 / 3.0, Fps::new(10, 1).unwrap()).unwrap();
    assert_eq!(t.total_frames(), 3);
}

#[test]
fn progress_endpoints_and_clamp() {
    let t = Timing::new(5.0, Fps::new(30, 1).unwrap()).unwrap();
    assert_eq!(t.progress(FrameIndex(0)), 0.0);
    assert_eq!(t.progress(FrameIndex(150)), 1.0);
    assert_eq!(t.progress(FrameIndex(400)), 1.0);

    let mut last = -1.0;
    for f in 0..=150 {
        let p = t.progress(FrameIndex(f));
        assert!(p >= last);
        last = p;
    }
}

#[test]
fn zero_frame_timeline_is_fully_revealed() {
    let t = Timing::new(0.01, Fps::new(10, 1).unwrap()).unwrap();
    assert_eq!(t.total_frames(), 0);
    assert_eq!(t.progress(FrameIndex(0)), 1.0);
}

#[test]
fn timing_rejects_bad_duration() {
    let fps = Fps::new(30, 1).unwrap();
    assert!(Timing::new(0.0, fps).is_err());
    assert!(Timing::new(-1.0, fps).is_err());
    assert!(Timing::new(f64::NAN, fps).is_err());
}

#[test]
fn canvas_validation() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(64, 32).unwrap();
    assert_eq!(c.center(), Point::new(32.0, 16.0));
    assert_eq!(c.rgba_len(), 64 * 32 * 4);
}

#[test]
fn premul_conversion_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}
