use super::*;

fn gray(n: usize) -> Vec<u8> {
    [128u8, 128, 128, 255].repeat(n)
}

#[test]
fn seeded_grain_is_reproducible_per_frame() {
    let mut a = SeededGrain::new(7);
    let mut b = SeededGrain::new(7);
    assert_eq!(a.frame_seed(FrameIndex(3)), b.frame_seed(FrameIndex(3)));
    assert_ne!(a.frame_seed(FrameIndex(3)), a.frame_seed(FrameIndex(4)));
    assert_ne!(
        SeededGrain::new(1).frame_seed(FrameIndex(3)),
        SeededGrain::new(2).frame_seed(FrameIndex(3))
    );
}

#[test]
fn grain_offsets_rgb_equally_and_keeps_alpha() {
    let mut buf = gray(256);
    apply_grain(&mut buf, 42);
    let mut changed = 0;
    for px in buf.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
        let delta = i16::from(px[0]) - 128;
        assert!((-20..=20).contains(&delta));
        if delta != 0 {
            changed += 1;
        }
    }
    assert!(changed > 128);
}

#[test]
fn same_seed_same_pattern() {
    let mut a = gray(64);
    let mut b = gray(64);
    apply_grain(&mut a, 9);
    apply_grain(&mut b, 9);
    assert_eq!(a, b);
    let mut c = gray(64);
    apply_grain(&mut c, 10);
    assert_ne!(a, c);
}

#[test]
fn grain_never_exceeds_premultiplied_alpha() {
    let mut buf = [10u8, 10, 10, 12].repeat(128);
    apply_grain(&mut buf, 1);
    for px in buf.chunks_exact(4) {
        assert!(px[0] <= px[3]);
    }
}

#[test]
fn entropy_grain_varies() {
    let mut g = EntropyGrain;
    let seeds: std::collections::HashSet<u64> =
        (0..8).map(|_| g.frame_seed(FrameIndex(0))).collect();
    assert!(seeds.len() > 1);
}
