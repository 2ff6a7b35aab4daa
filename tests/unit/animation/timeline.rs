use super::*;

fn samples(n: usize) -> impl Iterator<Item = f64> {
    (0..=n).map(move |i| i as f64 / n as f64)
}

#[test]
fn pieces_core_window_is_exclusive() {
    let count = 5;
    for i in 0..count {
        let (start, end) = pieces_slice(i, count);
        let lo = start + PIECES_FADE;
        let hi = end - PIECES_FADE;
        for k in 1..20 {
            let p = lo + (hi - lo) * (k as f64 / 20.0);
            let alphas: Vec<f64> = (0..count).map(|j| pieces_phase(p, j, count).alpha).collect();
            assert_eq!(alphas.iter().filter(|&&a| a == 1.0).count(), 1, "p={p}");
            assert_eq!(alphas.iter().filter(|&&a| a == 0.0).count(), count - 1, "p={p}");
            assert_eq!(alphas[i], 1.0);
        }
    }
}

#[test]
fn pieces_cross_dissolve_overlaps_at_boundary() {
    let p = 0.4;
    let a = pieces_phase(p, 1, 5);
    let b = pieces_phase(p, 2, 5);
    assert!((a.alpha - 0.5).abs() < 1e-9);
    assert!((b.alpha - 0.5).abs() < 1e-9);
}

#[test]
fn pieces_first_frame_is_not_blank() {
    let s = pieces_phase(0.0, 0, 5);
    assert!(s.is_visible());
    assert!(pieces_phase(1.0, 4, 5).is_visible());
}

#[test]
fn pieces_scale_grows_up_to_ten_percent() {
    let mut last = 1.0;
    for p in samples(200) {
        let s = pieces_phase(p, 2, 5);
        if !s.is_visible() {
            continue;
        }
        assert!(s.scale >= last);
        assert!(s.scale <= 1.0 + PIECES_ZOOM + 1e-12);
        last = s.scale;
    }
    assert!(last > 1.0);
}

#[test]
fn pieces_scale_starts_mid_zoom_and_caps_at_slice_middle() {
    let (start, end) = pieces_slice(1, 5);
    assert!((pieces_phase(start, 1, 5).scale - 1.05).abs() < 1e-12);
    let mid = (start + end) / 2.0;
    assert!((pieces_phase(mid, 1, 5).scale - 1.10).abs() < 1e-12);
    assert!((pieces_phase(end - 0.01, 1, 5).scale - 1.10).abs() < 1e-12);
    // Fading in ahead of its slice the piece is still above base size.
    let early = pieces_phase(start - PIECES_FADE / 2.0, 1, 5);
    assert!(early.is_visible());
    assert!((early.scale - 1.0375).abs() < 1e-12);
}

#[test]
fn pieces_out_of_range_index_is_hidden() {
    assert!(!pieces_phase(0.5, 7, 5).is_visible());
}

#[test]
fn line_parts_complete_by_reveal_end() {
    for p in samples(100).filter(|&p| p >= LINE_REVEAL_END) {
        for i in 0..5 {
            assert_eq!(line_reveal(p, i, 5), 1.0, "p={p} part={i}");
        }
    }
}

#[test]
fn line_reveal_is_staggered_left_to_right() {
    let p = 0.2;
    assert_eq!(line_reveal(p, 0, 5), 1.0);
    assert!(line_reveal(p, 1, 5) > 0.0);
    assert_eq!(line_reveal(p, 2, 5), 0.0);
}

#[test]
fn crescendo_brightens_dimmed_parts_monotonically() {
    let mut last = line_opacity(false, CRESCENDO_START);
    assert!((last - DIMMED_OPACITY).abs() < 1e-12);
    for k in 1..=100 {
        let p = CRESCENDO_START + (1.0 - CRESCENDO_START) * (k as f64 / 100.0);
        let o = line_opacity(false, p);
        assert!(o > last, "p={p}");
        last = o;
    }
    assert!((line_opacity(false, 1.0) - 1.0).abs() < 1e-12);
}

#[test]
fn highlighted_parts_are_always_full() {
    for p in samples(50) {
        assert_eq!(line_opacity(true, p), 1.0);
        assert!(line_glow(true, p));
    }
}

#[test]
fn glow_on_dimmed_parts_starts_mid_crescendo() {
    assert!(!line_glow(false, 0.7));
    assert!(line_glow(false, 0.85));
}

#[test]
fn line_zoom_spans_five_percent() {
    assert_eq!(line_zoom(0.0), 1.0);
    assert!((line_zoom(1.0) - 1.05).abs() < 1e-12);
}

#[test]
fn five_second_thirty_fps_frame_112() {
    let p = 112.0 / 150.0;
    let revealed = (0..5).filter(|&i| line_reveal(p, i, 5) == 1.0).count();
    assert!(revealed >= 4);
}
