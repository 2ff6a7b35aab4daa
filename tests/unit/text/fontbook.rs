use super::*;
use crate::settings::model::FontWeight;

fn any_system_font() -> Option<Vec<u8>> {
    let candidates = [
        std::env::var("TITLECARD_TEST_FONT").unwrap_or_default(),
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_owned(),
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_owned(),
        "/usr/share/fonts/TTF/DejaVuSans.ttf".to_owned(),
        "/System/Library/Fonts/Supplemental/Arial.ttf".to_owned(),
    ];
    candidates
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn empty_book_reports_render_error() {
    let mut book = FontBook::new();
    assert!(book.is_empty());
    let err = book
        .advance('A', &FontSpec::new("Anything", FontWeight::BOLD, 40.0))
        .unwrap_err();
    assert!(matches!(err, TitleCardError::Render(_)));
}

#[test]
fn garbage_bytes_do_not_register() {
    let mut book = FontBook::new();
    assert!(book.register_font_bytes(b"not a font".to_vec()).is_err());
    assert!(book.families().is_empty());
}

#[test]
fn missing_font_file_is_an_error() {
    let mut book = FontBook::new();
    assert!(book.register_font_file("does/not/exist.ttf").is_err());
}

#[test]
fn registered_face_measures_and_falls_back() {
    let Some(bytes) = any_system_font() else {
        return;
    };
    let mut book = FontBook::new();
    let names = book.register_font_bytes(bytes).unwrap();
    assert!(!names.is_empty());

    let own = FontSpec::new(names[0].clone(), FontWeight::BOLD, 50.0);
    let unknown = FontSpec::new("'Neo Sans Std', sans-serif", FontWeight::BOLD, 50.0);

    let w = book.advance('W', &own).unwrap();
    let i = book.advance('I', &own).unwrap();
    assert!(w > i);
    assert_eq!(book.advance('W', &unknown).unwrap(), w);

    let double = FontSpec::new(names[0].clone(), FontWeight::BOLD, 100.0);
    assert!((book.advance('W', &double).unwrap() - 2.0 * w).abs() < 1e-3);

    let vm = book.vmetrics(&own).unwrap();
    assert!(vm.ascent > 0.0 && vm.descent >= 0.0);
}
