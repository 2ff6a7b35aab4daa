use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0).is_err());
}

#[test]
fn shadow_kernel_covers_three_sigmas() {
    assert_eq!(shadow_kernel(20.0), (30, 10.0));
    assert_eq!(shadow_kernel(0.0).0, 0);
}

#[test]
fn alpha_bounds_and_crop() {
    let (w, h) = (6u32, 4u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    assert_eq!(alpha_bounds(&buf, w, h), None);
    for (x, y) in [(1u32, 1u32), (3, 2)] {
        buf[((y * w + x) * 4 + 3) as usize] = 200;
    }
    let r = alpha_bounds(&buf, w, h).unwrap();
    assert_eq!(
        r,
        PxRect {
            x0: 1,
            y0: 1,
            x1: 4,
            y1: 3
        }
    );
    let grown = r.inflate(2, w, h);
    assert_eq!((grown.x0, grown.y0, grown.x1, grown.y1), (0, 0, 6, 4));

    let c = crop(&buf, w, r);
    assert_eq!(c.len(), 3 * 2 * 4);
    assert_eq!(c[3], 200);
    assert_eq!(c[(3 + 2) * 4 + 3], 200);
}
