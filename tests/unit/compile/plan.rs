use super::*;
use crate::settings::model::{SettingsUpdate, TitleSequence, TitleUnit};
use crate::text::BlockGlyphs;

fn canvas() -> Canvas {
    Canvas::new(640, 360).unwrap()
}

fn line_settings() -> Settings {
    Settings::default()
        .apply(&SettingsUpdate::new().layout(Layout::Line))
        .unwrap()
}

fn compile(settings: &Settings, frame: u64) -> FramePlan {
    compile_frame(settings, canvas(), FrameIndex(frame), &mut BlockGlyphs::new()).unwrap()
}

#[test]
fn progress_endpoints() {
    let s = Settings::default();
    assert_eq!(compile(&s, 0).progress, 0.0);
    assert_eq!(compile(&s, 150).progress, 1.0);
    assert_eq!(compile(&s, 400).progress, 1.0);
}

#[test]
fn pieces_core_window_draws_one_run() {
    let s = Settings::default();
    // progress 0.3 is inside the core window of unit 1 ("WILL").
    let plan = compile(&s, 45);
    assert_eq!(plan.text.len(), 1);
    let run = &plan.text[0];
    assert_eq!(run.alpha, 1.0);
    let text: String = run.glyphs.iter().map(|g| g.ch).collect();
    assert_eq!(text, "WILL");
    assert_eq!(run.font.weight, crate::settings::model::FontWeight::BLACK);
}

#[test]
fn pieces_frame_zero_shows_name_fading_in() {
    let s = Settings::default();
    let plan = compile(&s, 0);
    assert_eq!(plan.text.len(), 1);
    let text: String = plan.text[0].glyphs.iter().map(|g| g.ch).collect();
    assert_eq!(text, "VICTOR VON DOOM");
    assert!((plan.text[0].alpha - 0.5).abs() < 1e-9);
}

#[test]
fn pieces_run_is_centered() {
    let s = Settings::default();
    let plan = compile(&s, 45);
    let run = &plan.text[0];
    let mut g = BlockGlyphs::new();
    let last = run.glyphs.last().unwrap();
    let right = last.x + g.advance(last.ch, &run.font).unwrap();
    let left = run.glyphs[0].x;
    assert!(((left + right) / 2.0 - 320.0).abs() < 1e-6);
}

#[test]
fn pieces_shadow_tracks_alpha_and_flag() {
    let s = Settings::default();
    let plan = compile(&s, 0);
    let shadow = plan.text[0].shadow.unwrap();
    assert!((shadow.blur - SHADOW_BLUR * plan.text[0].alpha).abs() < 1e-9);

    let no_shadow = s.apply(&SettingsUpdate::new().text_shadow(false)).unwrap();
    assert!(compile(&no_shadow, 0).text[0].shadow.is_none());
}

#[test]
fn blank_name_renders_placeholder() {
    let s = Settings::default()
        .apply(&SettingsUpdate::new().character_name(""))
        .unwrap();
    let plan = compile(&s, 15);
    let text: String = plan.text[0].glyphs.iter().map(|g| g.ch).collect();
    assert_eq!(text, "CHARACTER NAME");
}

#[test]
fn line_scenario_frame_112_has_four_parts_fully_revealed() {
    let s = line_settings();
    assert_eq!(s.total_frames(), 150);
    let plan = compile(&s, 112);
    assert!((plan.progress - 112.0 / 150.0).abs() < 1e-12);
    let full = plan
        .text
        .iter()
        .zip(s.sequence.units())
        .filter(|(d, u)| {
            let reveal = d.alpha / timeline::line_opacity(u.highlight, plan.progress);
            (reveal - 1.0).abs() < 1e-9
        })
        .count();
    assert!(full >= 4);
}

#[test]
fn line_parts_are_laid_out_left_to_right_with_spaces() {
    let s = line_settings();
    let plan = compile(&s, 150);
    assert_eq!(plan.text.len(), 5);
    let joined: String = plan
        .text
        .iter()
        .flat_map(|d| d.glyphs.iter().map(|g| g.ch))
        .collect();
    assert_eq!(joined, "VICTOR VON DOOM WILL RETURN IN AVENGERS: DOOMSDAY");
    let xs: Vec<f64> = plan
        .text
        .iter()
        .flat_map(|d| d.glyphs.iter().map(|g| g.x))
        .collect();
    assert!(xs.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn line_is_centered_even_before_reveal() {
    let s = line_settings();
    let mut g = BlockGlyphs::new();
    let plan = compile(&s, 1);
    // Only the first part has started revealing, but it sits where the full line puts it.
    assert_eq!(plan.text.len(), 1);
    let font = &plan.text[0].font;
    let spacing = f64::from(s.letter_spacing) * LINE_SPACING_FACTOR;
    let full = "VICTOR VON DOOM WILL RETURN IN AVENGERS: DOOMSDAY";
    let total = g.measure(full, font, spacing).unwrap();
    assert!((plan.text[0].glyphs[0].x - (320.0 - total / 2.0)).abs() < 1e-6);
}

#[test]
fn line_dimmed_parts_brighten_and_glow_late() {
    let s = line_settings();
    let at = |frame| compile(&s, frame);
    let dimmed = |plan: &FramePlan| plan.text[3].alpha;
    assert!((dimmed(&at(120)) - 0.4 - 0.6 * timeline::crescendo(0.8)).abs() < 1e-9);
    assert!(dimmed(&at(135)) > dimmed(&at(120)));
    assert!((dimmed(&at(150)) - 1.0).abs() < 1e-9);
    assert!(at(100).text[3].shadow.is_none());
    assert!(at(140).text[3].shadow.is_some());
    assert!(at(100).text[0].shadow.is_some());
}

#[test]
fn custom_sequence_drives_layout() {
    let s = Settings::default()
        .apply(
            &SettingsUpdate::new()
                .character_name("Storm")
                .layout(Layout::Line)
                .sequence(TitleSequence(vec![
                    TitleUnit::new("{name}").highlighted(),
                    TitleUnit::new("is back"),
                ])),
        )
        .unwrap();
    let plan = compile(&s, 150);
    let joined: String = plan
        .text
        .iter()
        .flat_map(|d| d.glyphs.iter().map(|g| g.ch))
        .collect();
    assert_eq!(joined, "STORM IS BACK");
}

#[test]
fn effects_flags_flow_into_plan() {
    let s = Settings::default()
        .apply(&SettingsUpdate::new().vignette(false).scanlines(true).grain(true))
        .unwrap();
    let plan = compile(&s, 10);
    assert!(!plan.vignette && plan.scanlines && plan.grain);
    assert_eq!(plan.background.to_array(), [0, 0, 0, 255]);
}
