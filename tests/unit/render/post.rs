use super::*;

fn white(canvas: Canvas) -> Vec<u8> {
    [255u8, 255, 255, 255].repeat(canvas.width as usize * canvas.height as usize)
}

#[test]
fn vignette_darkens_edges_more_than_center() {
    let canvas = Canvas::new(100, 60).unwrap();
    let mask = VignetteMask::new(canvas);
    assert_eq!(mask.canvas(), canvas);
    let mut buf = white(canvas);
    mask.apply(&mut buf);
    let px = |x: usize, y: usize| buf[(y * 100 + x) * 4];
    assert!(px(50, 30) > 250);
    assert!(px(0, 0) < px(25, 15));
    assert!(px(25, 15) < px(50, 30));
    assert_eq!(buf[3], 255);
}

#[test]
fn vignette_saturates_at_eighty_percent() {
    // Corner of a very wide canvas sits beyond the radius.
    let canvas = Canvas::new(10, 200).unwrap();
    let mask = VignetteMask::new(canvas);
    let mut buf = white(canvas);
    mask.apply(&mut buf);
    // 255 * (1 - 204/255) = 51
    assert_eq!(buf[0], 51);
}

#[test]
fn scanlines_touch_every_fourth_row() {
    let (w, h) = (8u32, 9u32);
    let mut buf = [0u8, 0, 0, 255].repeat((w * h) as usize);
    apply_scanlines(&mut buf, w, h);
    for y in 0..h {
        let v = buf[(y * w * 4) as usize];
        if y % 4 == 0 {
            assert_eq!(v, 8, "row {y}");
        } else {
            assert_eq!(v, 0, "row {y}");
        }
    }
}

#[test]
fn composite_over_respects_offset_and_opacity() {
    let mut dst = [0u8, 0, 0, 255].repeat(16);
    let src = [255u8, 255, 255, 255].repeat(4);
    composite_over(&mut dst, 4, &src, 2, (1, 1), 0.5);
    let px = |x: usize, y: usize| dst[(y * 4 + x) * 4];
    assert_eq!(px(0, 0), 0);
    assert_eq!(px(1, 1), 128);
    assert_eq!(px(2, 2), 128);
    assert_eq!(px(3, 3), 0);
}
