//! Family-specific overrides
//!
//! Empirical corrections to the capability data. Rules are plain data so a
//! deployment can ship its own table without touching the resolver.

use lcsp_caniuse::{PartialVersion, Version, VersionRange};
use serde::{Deserialize, Serialize};

use crate::user_agent::{BrowserFamily, UserAgent};

/// Legacy IE header name
pub const X_CONTENT_SECURITY_POLICY: &str = "X-Content-Security-Policy";
/// Legacy WebKit header name
pub const X_WEBKIT_CSP: &str = "X-WebKit-CSP";

/// One override entry as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub family: BrowserFamily,
    /// Lowest matching version, e.g. `"10"` or `"6.0"`
    pub min_version: String,
    /// Highest matching version; partial versions cover all sub-versions.
    /// Absent means no upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,
    /// Target level, 0 to 3
    pub level: u8,
    /// Header to emit instead of `Content-Security-Policy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl OverrideRule {
    pub fn new(family: BrowserFamily, min_version: &str, max_version: &str, level: u8) -> Self {
        Self {
            family,
            min_version: min_version.to_string(),
            max_version: Some(max_version.to_string()),
            level,
            header: None,
        }
    }

    /// Rule covering `min_version` and everything above it
    pub fn at_least(family: BrowserFamily, min_version: &str, level: u8) -> Self {
        Self {
            family,
            min_version: min_version.to_string(),
            max_version: None,
            level,
            header: None,
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    fn compile(&self) -> Option<CompiledRule> {
        let low: Version = PartialVersion::parse(self.min_version.trim())?.into();
        let high = match &self.max_version {
            Some(max) => Some(PartialVersion::parse(max.trim())?),
            None => None,
        };
        let empty = high.is_some_and(|high| !VersionRange { low, high }.contains(low));
        if self.level > 3 || empty {
            return None;
        }
        Some(CompiledRule {
            family: self.family,
            low,
            high,
            level: self.level,
            header: self.header.clone(),
        })
    }
}

/// A validated override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub family: BrowserFamily,
    pub low: Version,
    /// `None` for open-ended rules
    pub high: Option<PartialVersion>,
    pub level: u8,
    pub header: Option<String>,
}

impl CompiledRule {
    pub fn contains(&self, version: Version) -> bool {
        version >= self.low && self.high.is_none_or(|high| high.admits_up_to(version))
    }
}

/// Ordered override table; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTable {
    rules: Vec<CompiledRule>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build a table from raw rules. Invalid rules are logged and skipped.
    pub fn from_rules(rules: &[OverrideRule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| {
                let compiled = rule.compile();
                if compiled.is_none() {
                    tracing::warn!(
                        family = %rule.family,
                        min = %rule.min_version,
                        max = rule.max_version.as_deref().unwrap_or("*"),
                        level = rule.level,
                        "skipping invalid override rule"
                    );
                }
                compiled
            })
            .collect();
        Self { rules }
    }

    /// Built-in rules
    pub fn default_rules() -> Vec<OverrideRule> {
        vec![
            OverrideRule::new(BrowserFamily::Ie, "10", "11", 1).with_header(X_CONTENT_SECURITY_POLICY),
            OverrideRule::new(BrowserFamily::Safari, "6.0", "6", 1).with_header(X_WEBKIT_CSP),
            OverrideRule::new(BrowserFamily::MobileSafari, "6.0", "6", 1).with_header(X_WEBKIT_CSP),
            OverrideRule::at_least(BrowserFamily::Firefox, "31", 2),
        ]
    }

    pub fn find(&self, agent: &UserAgent) -> Option<&CompiledRule> {
        let version = agent.version();
        self.rules
            .iter()
            .find(|rule| rule.family == agent.family && rule.contains(version))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self::from_rules(&Self::default_rules())
    }
}
