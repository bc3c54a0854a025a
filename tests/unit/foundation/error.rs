use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RevealError::degenerate("x")
            .to_string()
            .contains("degenerate polygon:")
    );
    assert!(
        RevealError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RevealError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RevealError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: RevealError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, RevealError::Serde(_)));
    assert!(!err.is_degenerate_polygon());
}
