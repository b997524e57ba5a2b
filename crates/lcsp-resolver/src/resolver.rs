//! Capability resolver
//!
//! Decides, per request, which CSP level a browser gets and which header it
//! is sent under. Overrides are consulted first, then the capability data
//! from the highest level down.

use std::collections::HashMap;
use std::fmt;

use lcsp_caniuse::{CSP1_FEATURE, CSP2_FEATURE, CSP3_FEATURE, CaniuseError, CapabilityData};
use lcsp_policy::CspLevel;

use crate::overrides::OverrideTable;
use crate::user_agent::{BrowserFamily, UserAgent};

/// Report-only variant suffix
pub const REPORT_ONLY_SUFFIX: &str = "-Report-Only";

/// Level a policy is rewritten to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLevel {
    /// No CSP support; the header is removed
    Unsupported,
    Level(CspLevel),
    /// No data; the policy passes through
    Unknown,
}

impl TargetLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            0 => Some(TargetLevel::Unsupported),
            n => CspLevel::from_number(n).map(TargetLevel::Level),
        }
    }

    /// Whether the policy is sent unmodified
    pub fn is_passthrough(&self) -> bool {
        matches!(self, TargetLevel::Unknown | TargetLevel::Level(CspLevel::Csp3))
    }

    /// Level to downgrade to, when a downgrade applies
    pub fn downgrade_level(&self) -> Option<CspLevel> {
        match self {
            TargetLevel::Level(level @ (CspLevel::Csp1 | CspLevel::Csp2)) => Some(*level),
            _ => None,
        }
    }
}

impl fmt::Display for TargetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetLevel::Unsupported => f.write_str("0"),
            TargetLevel::Level(level) => write!(f, "{}", level.number()),
            TargetLevel::Unknown => f.write_str("unknown"),
        }
    }
}

/// Outcome of resolving one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub level: TargetLevel,
    /// Replacement for `Content-Security-Policy`, if any
    pub header: Option<String>,
}

impl Resolution {
    pub fn new(level: TargetLevel) -> Self {
        Self { level, header: None }
    }

    pub fn unknown() -> Self {
        Self::new(TargetLevel::Unknown)
    }

    /// Header name to emit for a policy found under `original`.
    ///
    /// A renamed report-only header keeps its `-Report-Only` suffix.
    pub fn header_name(&self, original: &str) -> String {
        match &self.header {
            None => original.to_string(),
            Some(header) if is_report_only(original) => format!("{header}{REPORT_ONLY_SUFFIX}"),
            Some(header) => header.clone(),
        }
    }
}

fn is_report_only(name: &str) -> bool {
    let suffix = REPORT_ONLY_SUFFIX.len();
    name.len() >= suffix
        && name
            .get(name.len() - suffix..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(REPORT_ONLY_SUFFIX))
}

/// Capability lookup collaborator
pub trait CapabilityLookup: Send + Sync {
    /// Tri-state support for one CSP level; `None` means no data.
    fn supported(
        &self,
        level: CspLevel,
        family: BrowserFamily,
        major: u32,
        minor: u32,
        patch: Option<u32>,
    ) -> Option<bool>;
}

/// Browser family → capability data browser id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMap {
    ids: HashMap<BrowserFamily, String>,
}

impl FamilyMap {
    pub fn get(&self, family: BrowserFamily) -> Option<&str> {
        self.ids.get(&family).map(String::as_str)
    }

    pub fn set(&mut self, family: BrowserFamily, id: &str) {
        self.ids.insert(family, id.to_string());
    }

    pub fn remove(&mut self, family: BrowserFamily) {
        self.ids.remove(&family);
    }
}

impl Default for FamilyMap {
    fn default() -> Self {
        let ids = BrowserFamily::ALL
            .iter()
            .map(|family| (*family, family.caniuse_id().to_string()))
            .collect();
        Self { ids }
    }
}

fn feature_for(level: CspLevel) -> &'static str {
    match level {
        CspLevel::Csp1 => CSP1_FEATURE,
        CspLevel::Csp2 => CSP2_FEATURE,
        CspLevel::Csp3 => CSP3_FEATURE,
    }
}

/// Lookup backed by caniuse support tables
#[derive(Debug, Clone)]
pub struct CaniuseLookup {
    data: CapabilityData,
    families: FamilyMap,
}

impl CaniuseLookup {
    pub fn new(data: CapabilityData, families: FamilyMap) -> Self {
        Self { data, families }
    }

    pub fn bundled() -> Result<Self, CaniuseError> {
        Ok(Self::new(CapabilityData::bundled()?, FamilyMap::default()))
    }
}

impl CapabilityLookup for CaniuseLookup {
    fn supported(
        &self,
        level: CspLevel,
        family: BrowserFamily,
        major: u32,
        minor: u32,
        patch: Option<u32>,
    ) -> Option<bool> {
        let browser_id = self.families.get(family)?;
        self.data.supported(feature_for(level), browser_id, major, minor, patch)
    }
}

/// Per-request level resolver
pub struct Resolver {
    lookup: Box<dyn CapabilityLookup>,
    overrides: OverrideTable,
}

impl Resolver {
    pub fn new(lookup: impl CapabilityLookup + 'static, overrides: OverrideTable) -> Self {
        Self {
            lookup: Box::new(lookup),
            overrides,
        }
    }

    /// Resolver over the bundled data and the default overrides
    pub fn bundled() -> Result<Self, CaniuseError> {
        Ok(Self::new(CaniuseLookup::bundled()?, OverrideTable::default()))
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Resolve from a raw `User-Agent` header; unrecognized or missing
    /// agents resolve to [`TargetLevel::Unknown`].
    pub fn resolve_user_agent(&self, header: Option<&str>) -> Resolution {
        match header.and_then(UserAgent::parse) {
            Some(agent) => self.resolve(&agent),
            None => {
                tracing::debug!(user_agent = ?header, "unrecognized user agent, passing policy through");
                Resolution::unknown()
            }
        }
    }

    pub fn resolve(&self, agent: &UserAgent) -> Resolution {
        if let Some(rule) = self.overrides.find(agent) {
            let level = TargetLevel::from_number(rule.level).unwrap_or(TargetLevel::Unknown);
            tracing::debug!(agent = %agent, level = %level, header = ?rule.header, "override applies");
            return Resolution {
                level,
                header: rule.header.clone(),
            };
        }

        let level = self.lookup_level(agent.family, agent.major, agent.minor, agent.patch);
        tracing::debug!(agent = %agent, level = %level, "resolved from capability data");
        Resolution::new(level)
    }

    /// Target level for a family/version; overrides included.
    pub fn resolve_target_level(
        &self,
        family: BrowserFamily,
        major: u32,
        minor: u32,
        patch: Option<u32>,
    ) -> TargetLevel {
        self.resolve(&UserAgent::new(family, major, minor, patch)).level
    }

    fn lookup_level(&self, family: BrowserFamily, major: u32, minor: u32, patch: Option<u32>) -> TargetLevel {
        let mut lowest_answer = None;
        for level in CspLevel::DESCENDING {
            let answer = self.lookup.supported(level, family, major, minor, patch);
            if answer == Some(true) {
                return TargetLevel::Level(level);
            }
            lowest_answer = answer;
        }

        // Nothing supported: level 1 data decides between removal and
        // passing through
        match lowest_answer {
            Some(false) => TargetLevel::Unsupported,
            _ => TargetLevel::Unknown,
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers from a fixed (level, answer) list, same for every browser
    struct Fixed(Vec<(CspLevel, Option<bool>)>);

    impl CapabilityLookup for Fixed {
        fn supported(&self, level: CspLevel, _: BrowserFamily, _: u32, _: u32, _: Option<u32>) -> Option<bool> {
            self.0.iter().find(|(l, _)| *l == level).and_then(|(_, a)| *a)
        }
    }

    fn level_for(answers: Vec<(CspLevel, Option<bool>)>) -> TargetLevel {
        Resolver::new(Fixed(answers), OverrideTable::empty())
            .resolve_target_level(BrowserFamily::Chrome, 50, 0, None)
    }

    #[test]
    fn test_highest_supported_level_wins() {
        let level = level_for(vec![
            (CspLevel::Csp3, Some(false)),
            (CspLevel::Csp2, Some(true)),
            (CspLevel::Csp1, Some(true)),
        ]);
        assert_eq!(level, TargetLevel::Level(CspLevel::Csp2));
    }

    #[test]
    fn test_missing_level3_data() {
        let level = level_for(vec![(CspLevel::Csp2, Some(false)), (CspLevel::Csp1, Some(true))]);
        assert_eq!(level, TargetLevel::Level(CspLevel::Csp1));
    }

    #[test]
    fn test_all_unsupported() {
        let level = level_for(vec![
            (CspLevel::Csp3, Some(false)),
            (CspLevel::Csp2, Some(false)),
            (CspLevel::Csp1, Some(false)),
        ]);
        assert_eq!(level, TargetLevel::Unsupported);
    }

    #[test]
    fn test_all_unknown() {
        assert_eq!(level_for(vec![]), TargetLevel::Unknown);
    }

    #[test]
    fn test_override_beats_data() {
        let resolver = Resolver::new(
            Fixed(vec![(CspLevel::Csp3, Some(true))]),
            OverrideTable::default(),
        );
        let resolution = resolver.resolve(&UserAgent::new(BrowserFamily::Ie, 10, 0, None));
        assert_eq!(resolution.level, TargetLevel::Level(CspLevel::Csp1));
        assert_eq!(resolution.header.as_deref(), Some("X-Content-Security-Policy"));
    }

    #[test]
    fn test_header_name() {
        let renamed = Resolution {
            level: TargetLevel::Level(CspLevel::Csp1),
            header: Some("X-WebKit-CSP".to_string()),
        };
        assert_eq!(renamed.header_name("Content-Security-Policy"), "X-WebKit-CSP");
        assert_eq!(
            renamed.header_name("content-security-policy-report-only"),
            "X-WebKit-CSP-Report-Only"
        );

        let kept = Resolution::new(TargetLevel::Level(CspLevel::Csp2));
        assert_eq!(kept.header_name("Content-Security-Policy-Report-Only"), "Content-Security-Policy-Report-Only");
    }

    #[test]
    fn test_target_level_numbers() {
        assert_eq!(TargetLevel::from_number(0), Some(TargetLevel::Unsupported));
        assert_eq!(TargetLevel::from_number(2), Some(TargetLevel::Level(CspLevel::Csp2)));
        assert_eq!(TargetLevel::from_number(4), None);
        assert_eq!(TargetLevel::Unknown.to_string(), "unknown");
        assert!(TargetLevel::Level(CspLevel::Csp3).is_passthrough());
        assert!(!TargetLevel::Unsupported.is_passthrough());
        assert_eq!(TargetLevel::Level(CspLevel::Csp3).downgrade_level(), None);
    }

    #[test]
    fn test_family_map_unmapped_family_is_unknown() {
        let mut families = FamilyMap::default();
        families.remove(BrowserFamily::Opera);
        let lookup = CaniuseLookup::new(CapabilityData::bundled().unwrap(), families);
        let resolver = Resolver::new(lookup, OverrideTable::empty());
        assert_eq!(resolver.resolve_target_level(BrowserFamily::Opera, 10, 0, None), TargetLevel::Unknown);
        assert_eq!(resolver.resolve_target_level(BrowserFamily::Chrome, 20, 0, None), TargetLevel::Level(CspLevel::Csp1));
    }
}
