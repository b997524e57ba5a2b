//! Directive names
//!
//! Wire names are hyphenated (`script-src`); policies are keyed by the
//! camel-cased internal form (`scriptSrc`). The two are one-to-one for
//! lower-case directive names.

use std::fmt;

/// CSP directive names (wire form)
pub const DEFAULT_SRC: &str = "default-src";
pub const SCRIPT_SRC: &str = "script-src";
pub const STYLE_SRC: &str = "style-src";
pub const IMG_SRC: &str = "img-src";
pub const FONT_SRC: &str = "font-src";
pub const CONNECT_SRC: &str = "connect-src";
pub const MEDIA_SRC: &str = "media-src";
pub const OBJECT_SRC: &str = "object-src";
pub const FRAME_SRC: &str = "frame-src";
pub const CHILD_SRC: &str = "child-src";
pub const WORKER_SRC: &str = "worker-src";
pub const MANIFEST_SRC: &str = "manifest-src";
pub const FRAME_ANCESTORS: &str = "frame-ancestors";
pub const REPORT_URI: &str = "report-uri";
pub const REPORT_TO: &str = "report-to";
pub const UPGRADE_INSECURE: &str = "upgrade-insecure-requests";

/// Directives that are looked up in `default-src` when absent from a policy.
pub const FALLS_BACK_TO_DEFAULT_SRC: &[&str] = &[
    CONNECT_SRC,
    FONT_SRC,
    FRAME_SRC,
    IMG_SRC,
    MANIFEST_SRC,
    MEDIA_SRC,
    OBJECT_SRC,
    SCRIPT_SRC,
    STYLE_SRC,
    WORKER_SRC,
];

/// Directives introduced by CSP level 3.
pub const CSP3_ONLY: &[&str] = &[MANIFEST_SRC, WORKER_SRC, REPORT_TO];

/// Convert a hyphenated wire name to its internal camel-cased key.
///
/// Only a hyphen followed by a lower-case ASCII letter is folded; any other
/// hyphen is kept as is.
pub fn to_internal_key(wire_name: &str) -> String {
    let mut key = String::with_capacity(wire_name.len());
    let mut chars = wire_name.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                key.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => key.push(c),
        }
    }

    key
}

/// Convert an internal key back to its wire name.
pub fn to_wire_name(internal_key: &str) -> String {
    let mut name = String::with_capacity(internal_key.len() + 4);
    for c in internal_key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// Key of a directive inside a parsed policy (internal form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectiveKey(String);

impl DirectiveKey {
    /// Build a key from either a wire name or an internal key.
    ///
    /// Case is preserved; the parser lower-cases wire names before calling this.
    pub fn new(name: &str) -> Self {
        Self(to_internal_key(name))
    }

    /// Internal (camel-cased) form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphenated form, as written in a header
    pub fn wire_name(&self) -> String {
        to_wire_name(&self.0)
    }

    /// Fetch directives (`*-src`) are subject to downgrade rules.
    pub fn is_source_directive(&self) -> bool {
        self.0.ends_with("Src")
    }

    /// Whether a browser consults `default-src` when this directive is absent.
    pub fn falls_back_to_default_src(&self) -> bool {
        let wire = self.wire_name();
        FALLS_BACK_TO_DEFAULT_SRC.contains(&wire.as_str())
    }

    /// Whether the directive only exists from CSP level 3 on.
    pub fn is_csp3_only(&self) -> bool {
        let wire = self.wire_name();
        CSP3_ONLY.contains(&wire.as_str())
    }
}

impl fmt::Display for DirectiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_name())
    }
}

impl From<&str> for DirectiveKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_internal_key() {
        assert_eq!(to_internal_key("script-src"), "scriptSrc");
        assert_eq!(to_internal_key("upgrade-insecure-requests"), "upgradeInsecureRequests");
        assert_eq!(to_internal_key("sandbox"), "sandbox");
    }

    #[test]
    fn test_internal_key_is_idempotent() {
        assert_eq!(to_internal_key("scriptSrc"), "scriptSrc");
    }

    #[test]
    fn test_hyphen_before_digit_is_kept() {
        assert_eq!(to_internal_key("x-1"), "x-1");
        assert_eq!(to_wire_name("x-1"), "x-1");
    }

    #[test]
    fn test_round_trip() {
        for name in [
            DEFAULT_SRC, SCRIPT_SRC, FRAME_ANCESTORS, REPORT_URI,
            UPGRADE_INSECURE, "block-all-mixed-content", "require-sri-for",
        ] {
            assert_eq!(to_wire_name(&to_internal_key(name)), name);
        }
    }

    #[test]
    fn test_directive_class() {
        assert!(DirectiveKey::new(SCRIPT_SRC).is_source_directive());
        assert!(DirectiveKey::new("scriptSrc").is_source_directive());
        assert!(!DirectiveKey::new(REPORT_URI).is_source_directive());
        assert!(!DirectiveKey::new(FRAME_ANCESTORS).is_source_directive());
    }

    #[test]
    fn test_default_src_fallback() {
        assert!(DirectiveKey::new("styleSrc").falls_back_to_default_src());
        assert!(!DirectiveKey::new(CHILD_SRC).falls_back_to_default_src());
        assert!(!DirectiveKey::new("base-uri").falls_back_to_default_src());
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(DirectiveKey::new("frameAncestors").to_string(), "frame-ancestors");
    }
}
