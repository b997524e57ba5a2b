//! Resolver against real user agents and the bundled data

use lcsp_policy::CspLevel;
use lcsp_resolver::{
    BrowserFamily, CaniuseLookup, OverrideRule, OverrideTable, Resolver, TargetLevel, X_CONTENT_SECURITY_POLICY,
    X_WEBKIT_CSP,
};

const SAFARI_5: &str = "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; en-us) AppleWebKit/534.50 (KHTML, like Gecko) Version/5.1 Safari/534.50";
const SAFARI_6: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_5) AppleWebKit/536.30.1 (KHTML, like Gecko) Version/6.0.5 Safari/536.30.1";
const SAFARI_8: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_4) AppleWebKit/600.7.12 (KHTML, like Gecko) Version/8.0.7 Safari/600.7.12";
const SAFARI_17: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15";
const IOS_6_1: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 6_1_3 like Mac OS X) AppleWebKit/536.26 (KHTML, like Gecko) Version/6.0 Mobile/10B329 Safari/8536.25";
const IOS_9: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 9_3 like Mac OS X) AppleWebKit/601.1.46 (KHTML, like Gecko) Version/9.0 Mobile/13E188a Safari/601.1";
const IE_9: &str = "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; Trident/5.0)";
const IE_10: &str = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)";
const IE_11: &str = "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko";
const EDGE_16: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36 Edge/16.16299";
const FIREFOX_40: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:40.0) Gecko/20100101 Firefox/40.0";
const FIREFOX_121: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";
const CHROME_120: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36";

fn resolver() -> Resolver {
    Resolver::bundled().expect("bundled data loads")
}

fn level(n: u8) -> TargetLevel {
    TargetLevel::from_number(n).expect("valid level")
}

// ============================================================================
// WEBKIT
// ============================================================================

#[test]
fn test_safari_5_has_no_csp() {
    let resolution = resolver().resolve_user_agent(Some(SAFARI_5));
    assert_eq!(resolution.level, TargetLevel::Unsupported);
}

#[test]
fn test_safari_6_gets_prefixed_header() {
    let resolution = resolver().resolve_user_agent(Some(SAFARI_6));
    assert_eq!(resolution.level, level(1));
    assert_eq!(resolution.header.as_deref(), Some(X_WEBKIT_CSP));
}

#[test]
fn test_safari_8_gets_csp1() {
    let resolution = resolver().resolve_user_agent(Some(SAFARI_8));
    assert_eq!(resolution.level, level(1));
    assert_eq!(resolution.header, None);
}

#[test]
fn test_modern_safari_passes_through() {
    let resolution = resolver().resolve_user_agent(Some(SAFARI_17));
    assert_eq!(resolution.level, TargetLevel::Level(CspLevel::Csp3));
    assert!(resolution.level.is_passthrough());
}

#[test]
fn test_mobile_safari() {
    let r = resolver();
    let ios6 = r.resolve_user_agent(Some(IOS_6_1));
    assert_eq!(ios6.level, level(1));
    assert_eq!(ios6.header.as_deref(), Some(X_WEBKIT_CSP));

    assert_eq!(r.resolve_user_agent(Some(IOS_9)).level, level(1));
}

// ============================================================================
// TRIDENT / EDGE
// ============================================================================

#[test]
fn test_ie_9_has_no_csp() {
    assert_eq!(resolver().resolve_user_agent(Some(IE_9)).level, TargetLevel::Unsupported);
}

#[test]
fn test_ie_10_and_11_use_legacy_header() {
    let r = resolver();
    for ua in [IE_10, IE_11] {
        let resolution = r.resolve_user_agent(Some(ua));
        assert_eq!(resolution.level, level(1), "{ua}");
        assert_eq!(resolution.header_name("Content-Security-Policy"), X_CONTENT_SECURITY_POLICY);
    }
}

#[test]
fn test_legacy_edge_gets_csp2() {
    assert_eq!(resolver().resolve_user_agent(Some(EDGE_16)).level, level(2));
}

// ============================================================================
// GECKO / BLINK
// ============================================================================

#[test]
fn test_firefox_pinned_to_csp2() {
    let r = resolver();
    assert_eq!(r.resolve_user_agent(Some(FIREFOX_40)).level, level(2));
    assert_eq!(r.resolve_user_agent(Some(FIREFOX_121)).level, level(2));
}

#[test]
fn test_firefox_pin_has_no_upper_bound() {
    let r = resolver();
    for major in [52, 60, 121, 200] {
        assert_eq!(r.resolve_target_level(BrowserFamily::Firefox, major, 0, None), level(2), "Firefox {major}");
    }
    // the capability data alone would pass these through
    let unpinned = Resolver::new(CaniuseLookup::bundled().unwrap(), OverrideTable::empty());
    assert_eq!(unpinned.resolve_target_level(BrowserFamily::Firefox, 60, 0, None), level(3));
}

#[test]
fn test_current_browsers_pass_through() {
    assert_eq!(resolver().resolve_user_agent(Some(CHROME_120)).level, level(3));
}

// ============================================================================
// UNKNOWN AGENTS
// ============================================================================

#[test]
fn test_unrecognized_agent_is_unknown() {
    let r = resolver();
    assert_eq!(r.resolve_user_agent(Some("SomeBot/1.0")).level, TargetLevel::Unknown);
    assert_eq!(r.resolve_user_agent(None).level, TargetLevel::Unknown);
    assert_eq!(r.resolve_user_agent(Some("SomeBot/1.0")).header_name("Content-Security-Policy"), "Content-Security-Policy");
}

// ============================================================================
// CUSTOM OVERRIDES
// ============================================================================

#[test]
fn test_override_table_from_json() {
    let rules: Vec<OverrideRule> = serde_json::from_str(
        r#"[{ "family": "Chrome", "min_version": "100", "max_version": "200", "level": 2 }]"#,
    )
    .unwrap();
    let resolver = Resolver::new(
        CaniuseLookup::bundled().unwrap(),
        OverrideTable::from_rules(&rules),
    );
    assert_eq!(resolver.resolve_user_agent(Some(CHROME_120)).level, level(2));
    // default overrides replaced, so IE 10 falls back to the data: no level answers yes
    assert_eq!(resolver.resolve_user_agent(Some(IE_10)).level, TargetLevel::Unsupported);
}
