use super::*;
use crate::render::grain::SeededGrain;
use crate::settings::model::{Layout, SettingsUpdate};

fn engine() -> RenderEngine {
    RenderEngine::with_block_glyphs(Canvas::new(192, 108).unwrap()).unwrap()
}

fn small_settings() -> Settings {
    Settings::default()
        .apply(&SettingsUpdate::new().font_size(24).letter_spacing(2))
        .unwrap()
}

#[test]
fn zero_canvas_fails_fast() {
    assert!(RenderEngine::with_block_glyphs(Canvas { width: 0, height: 10 }).is_err());
    assert!(RenderEngine::with_block_glyphs(Canvas { width: 70_000, height: 10 }).is_err());
}

#[test]
fn render_is_repeatable_without_grain() {
    let s = small_settings();
    let mut e = engine();
    let a = e.render(&s, FrameIndex(30)).unwrap();
    let b = e.render(&s, FrameIndex(30)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_order_rendering_matches_in_order() {
    let s = small_settings();
    let mut forward = engine();
    let seq: Vec<_> = (0..4).map(|f| forward.render(&s, FrameIndex(f * 20)).unwrap()).collect();
    let mut backward = engine();
    for f in (0..4).rev() {
        assert_eq!(backward.render(&s, FrameIndex(f * 20)).unwrap(), seq[f as usize]);
    }
}

#[test]
fn seeded_grain_is_deterministic() {
    let s = small_settings()
        .apply(&SettingsUpdate::new().grain(true).scanlines(true))
        .unwrap();
    let mut a = engine().with_grain_source(SeededGrain::new(99));
    let mut b = engine().with_grain_source(SeededGrain::new(99));
    for f in [0, 75, 150] {
        assert_eq!(
            a.render(&s, FrameIndex(f)).unwrap(),
            b.render(&s, FrameIndex(f)).unwrap()
        );
    }
}

#[test]
fn entropy_grain_differs_between_renders() {
    let s = small_settings().apply(&SettingsUpdate::new().grain(true)).unwrap();
    let mut e = engine();
    let a = e.render(&s, FrameIndex(10)).unwrap();
    let b = e.render(&s, FrameIndex(10)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn title_phases_are_never_blank() {
    let s = small_settings()
        .apply(&SettingsUpdate::new().vignette(false))
        .unwrap();
    let mut e = engine();
    for f in (0..=150).step_by(15) {
        let frame = e.render(&s, FrameIndex(f)).unwrap();
        let lit = frame.data.chunks_exact(4).filter(|px| px[0] > 0).count();
        assert!(lit > 0, "frame {f} is blank");
    }
}

#[test]
fn line_layout_renders_and_differs_from_pieces() {
    let s = small_settings();
    let line = s.apply(&SettingsUpdate::new().layout(Layout::Line)).unwrap();
    let mut e = engine();
    assert_ne!(
        e.render(&s, FrameIndex(140)).unwrap(),
        e.render(&line, FrameIndex(140)).unwrap()
    );
}

#[test]
fn plan_matches_render_inputs() {
    let s = small_settings();
    let mut e = engine();
    let plan = e.plan(&s, FrameIndex(75)).unwrap();
    assert_eq!(plan.canvas, e.canvas());
    assert!((plan.progress - 0.5).abs() < 1e-12);
}

#[test]
fn fingerprinted_render_matches_plain_render() {
    let mut e = engine();
    let s = small_settings();
    let (rgba, fp) = e.render_fingerprinted(&s, FrameIndex(12)).unwrap();
    assert_eq!(rgba, e.render(&s, FrameIndex(12)).unwrap());
    assert_eq!(
        fp,
        crate::compile::fingerprint::fingerprint_plan(&e.plan(&s, FrameIndex(12)).unwrap())
    );
}
