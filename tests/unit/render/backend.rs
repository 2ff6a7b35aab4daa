use super::*;

#[test]
fn pixel_lookup_is_bounds_checked() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        premultiplied: true,
    };
    assert_eq!(f.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let f = FrameRGBA {
        width: 3,
        height: 1,
        data: vec![128, 64, 0, 128, 9, 9, 9, 0, 10, 20, 30, 255],
        premultiplied: true,
    };
    let s = f.to_straight_rgba8();
    assert_eq!(&s[0..4], &[255, 128, 0, 128]);
    assert_eq!(&s[4..8], &[9, 9, 9, 0]);
    assert_eq!(&s[8..12], &[10, 20, 30, 255]);
}
