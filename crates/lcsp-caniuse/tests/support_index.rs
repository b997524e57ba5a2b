//! Support index behaviour
//!
//! Exact, range and `all` entries plus extrapolation beyond the known data.

use lcsp_caniuse::SupportIndex;

fn index(json: &str) -> SupportIndex {
    SupportIndex::from_json(json).expect("valid table")
}

fn supports(json: &str, major: u32, minor: u32, patch: Option<u32>) -> Option<bool> {
    index(json).supported("ie", major, minor, patch)
}

// ============================================================================
// SUPPORT CODES
// ============================================================================

#[test]
fn test_all_yes() {
    assert_eq!(supports(r#"{"ie": {"all": "y"}}"#, 11, 0, None), Some(true));
}

#[test]
fn test_all_no() {
    assert_eq!(supports(r#"{"ie": {"all": "n"}}"#, 11, 0, None), Some(false));
}

#[test]
fn test_code_with_note() {
    assert_eq!(supports(r#"{"ie": {"11": "y #4"}}"#, 11, 0, None), Some(true));
    assert_eq!(supports(r#"{"ie": {"11": "a #2"}}"#, 11, 0, None), Some(false));
    assert_eq!(supports(r#"{"ie": {"11": "n"}}"#, 11, 0, None), Some(false));
}

// ============================================================================
// EXACT VERSIONS
// ============================================================================

#[test]
fn test_exact_major() {
    let json = r#"{"ie": {"11": "y"}}"#;
    assert_eq!(supports(json, 11, 0, None), Some(true));
    assert_eq!(supports(json, 11, 1, None), Some(true));
    assert_eq!(supports(json, 11, 1, Some(2)), Some(true));
}

#[test]
fn test_exact_minor() {
    let json = r#"{"ie": {"11.1": "y"}}"#;
    assert_eq!(supports(json, 11, 1, None), Some(true));
    assert_ne!(supports(json, 11, 0, None), Some(true));
}

#[test]
fn test_exact_patch() {
    let json = r#"{"ie": {"11.1.2": "y"}}"#;
    assert_eq!(supports(json, 11, 1, Some(2)), Some(true));
    assert_ne!(supports(json, 11, 1, None), Some(true));
}

// ============================================================================
// RANGES
// ============================================================================

#[test]
fn test_range_over_minor_versions() {
    let json = r#"{"ie": {"10.1-10.2": "y"}}"#;
    assert_eq!(supports(json, 10, 1, None), Some(true));
    assert_eq!(supports(json, 10, 2, None), Some(true));
    assert_ne!(supports(json, 10, 0, None), Some(true));
}

#[test]
fn test_range_over_major_versions() {
    let json = r#"{"ie": {"10.3-12.1": "y"}}"#;
    assert_eq!(supports(json, 10, 3, None), Some(true));
    assert_eq!(supports(json, 10, 20, None), Some(true));
    assert_eq!(supports(json, 10, 20, Some(4)), Some(true));
    assert_ne!(supports(json, 10, 0, None), Some(true));
    assert_eq!(supports(json, 11, 0, None), Some(true));
    assert_eq!(supports(json, 11, 20, None), Some(true));
    assert_eq!(supports(json, 12, 0, None), Some(true));
    assert_eq!(supports(json, 12, 1, None), Some(true));
}

#[test]
fn test_multiple_ranges() {
    let json = r#"{"ie": {"10.0-10.1": "n", "10.3-12.1": "y"}}"#;
    assert_eq!(supports(json, 10, 0, None), Some(false));
    assert_eq!(supports(json, 10, 1, None), Some(false));
    assert_eq!(supports(json, 10, 2, None), None);
    assert_eq!(supports(json, 10, 3, None), Some(true));
    assert_eq!(supports(json, 11, 0, None), Some(true));
    assert_eq!(supports(json, 12, 1, None), Some(true));
}

// ============================================================================
// EXTRAPOLATION
// ============================================================================

#[test]
fn test_newer_version_follows_highest_known() {
    for highest in ["10", "10.5", "10.5.8", "10.2-10.4"] {
        let yes = format!(r#"{{"ie": {{"{highest}": "y"}}}}"#);
        let no = format!(r#"{{"ie": {{"{highest}": "n"}}}}"#);
        assert_eq!(supports(&yes, 11, 0, None), Some(true), "highest {highest}");
        assert_eq!(supports(&no, 11, 0, None), Some(false), "highest {highest}");
    }
}

#[test]
fn test_older_version_is_unknown() {
    for lowest in ["10", "10.5", "10.5.8", "10.5.2-10.5.8"] {
        for code in ["y", "n"] {
            let json = format!(r#"{{"ie": {{"{lowest}": "{code}"}}}}"#);
            assert_eq!(supports(&json, 9, 0, None), None, "lowest {lowest} = {code}");
        }
    }
}

#[test]
fn test_no_data() {
    assert_eq!(supports("{}", 10, 0, None), None);
}
