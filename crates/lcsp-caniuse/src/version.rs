//! Version specifiers
//!
//! Support tables key their entries by an exact version (`11`, `11.2`,
//! `11.2.3`), an inclusive range (`10.3-12.1`) or the sentinel `all`.

use std::fmt;

/// Fully specified version; missing components count as 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl From<PartialVersion> for Version {
    fn from(v: PartialVersion) -> Self {
        Self::new(v.major, v.minor.unwrap_or(0), v.patch.unwrap_or(0))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version as written in a table: one to three numeric components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialVersion {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
}

impl PartialVersion {
    pub fn major(major: u32) -> Self {
        Self { major, minor: None, patch: None }
    }

    pub fn minor(major: u32, minor: u32) -> Self {
        Self { major, minor: Some(minor), patch: None }
    }

    pub fn patch(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor: Some(minor), patch: Some(patch) }
    }

    /// Parse `M`, `M.m` or `M.m.p`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('.');
        let major = parse_component(parts.next()?)?;
        let minor = match parts.next() {
            Some(part) => Some(parse_component(part)?),
            None => None,
        };
        let patch = match parts.next() {
            Some(part) => Some(parse_component(part)?),
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { major, minor, patch })
    }

    /// Whether `version` is at or below this bound, comparing only the
    /// components given here (`12.1` admits every `12.1.x`).
    pub fn admits_up_to(&self, version: Version) -> bool {
        match (self.minor, self.patch) {
            (None, _) => version.major <= self.major,
            (Some(minor), None) => (version.major, version.minor) <= (self.major, minor),
            (Some(minor), Some(patch)) => version <= Version::new(self.major, minor, patch),
        }
    }
}

impl fmt::Display for PartialVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Inclusive version range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub low: Version,
    pub high: PartialVersion,
}

impl VersionRange {
    pub fn contains(&self, version: Version) -> bool {
        version >= self.low && self.high.admits_up_to(version)
    }

    /// Smallest version above the range, used to order ranges by width.
    fn upper_exclusive(&self) -> (u32, u32, u32) {
        let h = self.high;
        match (h.minor, h.patch) {
            (None, _) => (h.major.saturating_add(1), 0, 0),
            (Some(minor), None) => (h.major, minor.saturating_add(1), 0),
            (Some(minor), Some(patch)) => (h.major, minor, patch.saturating_add(1)),
        }
    }

    /// Ordering key where a smaller key is a more specific range.
    pub(crate) fn specificity(&self) -> (u32, u32, u32, std::cmp::Reverse<Version>) {
        let (hi_major, hi_minor, hi_patch) = self.upper_exclusive();
        let low = self.low;
        let width = if (hi_major, hi_minor) == (low.major, low.minor) {
            (0, 0, hi_patch.saturating_sub(low.patch))
        } else if hi_major == low.major {
            (0, hi_minor.saturating_sub(low.minor), 0)
        } else {
            (hi_major.saturating_sub(low.major), 0, 0)
        };
        (width.0, width.1, width.2, std::cmp::Reverse(low))
    }
}

/// Key of a support table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    All,
    Exact(PartialVersion),
    Range(VersionRange),
}

impl VersionSpec {
    /// Parse a table key; unsupported forms (`TP`, `3.1-`) yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "all" {
            return Some(VersionSpec::All);
        }
        if let Some((low, high)) = s.split_once('-') {
            let low = PartialVersion::parse(low.trim())?;
            let high = PartialVersion::parse(high.trim())?;
            let range = VersionRange { low: low.into(), high };
            if !range.contains(range.low) {
                return None;
            }
            return Some(VersionSpec::Range(range));
        }
        PartialVersion::parse(s).map(VersionSpec::Exact)
    }

    /// Highest version covered, padded with zeroes.
    pub fn upper_bound(&self) -> Option<Version> {
        match self {
            VersionSpec::All => None,
            VersionSpec::Exact(v) => Some((*v).into()),
            VersionSpec::Range(r) => Some(r.high.into()),
        }
    }
}
