use super::*;
use crate::encode::sink::InMemorySink;
use crate::compile::fingerprint::fingerprint_plan;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::render::backend::FrameRGBA;
use crate::settings::model::SettingsUpdate;

fn engine() -> RenderEngine {
    RenderEngine::with_block_glyphs(Canvas::new(64, 36).unwrap()).unwrap()
}

fn one_second_at_10fps() -> Settings {
    Settings::default()
        .apply(
            &SettingsUpdate::new()
                .duration(1.0)
                .fps(10)
                .font_size(12)
                .letter_spacing(1),
        )
        .unwrap()
}

#[test]
fn captures_every_frame_inclusive_with_fixed_delay() {
    let mut e = engine();
    let s = one_second_at_10fps();
    let mut sink = InMemorySink::new();
    let stats = capture_frames(&mut e, &s, &mut sink, CaptureOpts::default()).unwrap();

    assert_eq!(stats.frames, 11);
    assert_eq!(stats.total_frames, 10);
    assert_eq!(sink.frames().len(), 11);
    for (i, f) in sink.frames().iter().enumerate() {
        assert_eq!(f.index, FrameIndex(i as u64));
        assert!((f.delay_ms - 100.0).abs() < 1e-9);
    }
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.frame_count, 11);
    assert_eq!((cfg.width, cfg.height), (64, 36));
    assert!(sink.is_finished());
    assert!(!sink.is_aborted());
}

#[test]
fn progress_reaches_one_and_yield_hook_runs() {
    let mut e = engine();
    let s = one_second_at_10fps();
    let mut sink = InMemorySink::new();
    let mut seen = Vec::new();
    let mut yields = 0;
    capture_frames(
        &mut e,
        &s,
        &mut sink,
        CaptureOpts::default()
            .yield_every(4)
            .on_progress(|p| seen.push(p))
            .on_yield(|| yields += 1),
    )
    .unwrap();

    assert_eq!(seen.len(), 11);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert!((seen[10] - 1.0).abs() < 1e-12);
    assert_eq!(yields, 2);
}

#[test]
fn cancellation_aborts_sink_without_end() {
    let mut e = engine();
    let s = one_second_at_10fps();
    let mut sink = InMemorySink::new();
    let token = CancelToken::new();
    let trigger = token.clone();
    let mut pushed = 0;
    let err = capture_frames(
        &mut e,
        &s,
        &mut sink,
        CaptureOpts::default().cancel(token).on_progress(|_| {
            pushed += 1;
            if pushed == 3 {
                trigger.cancel();
            }
        }),
    )
    .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(sink.frames().len(), 3);
    assert!(sink.is_aborted());
    assert!(!sink.is_finished());
}

#[test]
fn invalid_settings_never_touch_the_sink() {
    let mut e = engine();
    let mut s = one_second_at_10fps();
    s.fps = 0;
    let mut sink = InMemorySink::new();
    assert!(capture_frames(&mut e, &s, &mut sink, CaptureOpts::default()).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn unbounded_duration_errors_instead_of_overflowing() {
    let mut e = engine();
    let mut s = one_second_at_10fps();
    s.duration = 1e300;
    let mut sink = InMemorySink::new();
    let err = capture_frames(&mut e, &s, &mut sink, CaptureOpts::default()).unwrap_err();
    assert!(matches!(err, TitleCardError::Validation(_)), "{err:?}");
    assert!(sink.config().is_none());
}

struct RejectingSink {
    accept: usize,
    aborted: bool,
}

impl FrameSink for RejectingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> TitleCardResult<()> {
        Ok(())
    }

    fn push_frame(
        &mut self,
        _idx: FrameIndex,
        _frame: &FrameRGBA,
        _delay_ms: f64,
    ) -> TitleCardResult<()> {
        if self.accept == 0 {
            return Err(TitleCardError::render("disk full"));
        }
        self.accept -= 1;
        Ok(())
    }

    fn end(&mut self) -> TitleCardResult<()> {
        panic!("end must not be called after a failed push");
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn sink_failure_aborts_and_propagates() {
    let mut e = engine();
    let s = one_second_at_10fps();
    let mut sink = RejectingSink {
        accept: 2,
        aborted: false,
    };
    let err = capture_frames(&mut e, &s, &mut sink, CaptureOpts::default()).unwrap_err();
    assert!(matches!(err, TitleCardError::Render(_)));
    assert!(sink.aborted);
}

#[test]
fn held_frames_count_repeated_plans() {
    let mut e = engine();
    let s = one_second_at_10fps();
    let mut expected = 0;
    let mut previous = None;
    for f in 0..=10 {
        let fp = fingerprint_plan(&e.plan(&s, FrameIndex(f)).unwrap());
        if previous == Some(fp) {
            expected += 1;
        }
        previous = Some(fp);
    }

    let mut sink = InMemorySink::new();
    let stats = capture_frames(&mut e, &s, &mut sink, CaptureOpts::default()).unwrap();
    assert_eq!(stats.held_frames, expected);
    assert!(stats.held_frames < stats.frames);
}

