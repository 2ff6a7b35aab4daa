use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TitleCardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TitleCardError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TitleCardError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        TitleCardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TitleCardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn cancelled_is_detectable() {
    assert!(TitleCardError::cancelled("stop").is_cancelled());
    assert!(!TitleCardError::render("nope").is_cancelled());
}

#[test]
fn serde_json_errors_convert() {
    let err: TitleCardError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
    assert!(matches!(err, TitleCardError::Serde(_)));
}
