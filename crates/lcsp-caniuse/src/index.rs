//! Support index
//!
//! Answers "is this feature supported in browser X version M.m.p" from a
//! caniuse-style table. The answer is tri-state: `Some(true)`,
//! `Some(false)` or `None` when the table has nothing to say.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::CaniuseError;
use crate::version::{PartialVersion, Version, VersionRange, VersionSpec};

/// Raw table: browser id → version specifier → support code
pub type SupportTable = BTreeMap<String, BTreeMap<String, String>>;

/// Either a bare table or a caniuse feature file (`{ "stats": { … } }`)
#[derive(Deserialize)]
#[serde(untagged)]
enum TableFile {
    Feature { stats: SupportTable },
    Bare(SupportTable),
}

/// Support codes starting with `y` mean supported; anything else does not.
pub fn is_supported_code(code: &str) -> bool {
    code.starts_with('y')
}

#[derive(Debug, Clone, Default)]
struct BrowserSupport {
    exact: HashMap<PartialVersion, bool>,
    ranges: Vec<(VersionRange, bool)>,
    all: Option<bool>,
    highest: Option<(Version, bool)>,
}

impl BrowserSupport {
    fn record(&mut self, spec: VersionSpec, supported: bool) {
        if let Some(upper) = spec.upper_bound() {
            if self.highest.is_none_or(|(highest, _)| upper > highest) {
                self.highest = Some((upper, supported));
            }
        }

        match spec {
            VersionSpec::All => self.all = Some(supported),
            VersionSpec::Exact(version) => {
                self.exact.insert(version, supported);
            }
            VersionSpec::Range(range) => self.ranges.push((range, supported)),
        }
    }

    fn lookup(&self, major: u32, minor: u32, patch: Option<u32>) -> Option<bool> {
        let exact = patch
            .and_then(|patch| self.exact.get(&PartialVersion::patch(major, minor, patch)))
            .or_else(|| self.exact.get(&PartialVersion::minor(major, minor)))
            .or_else(|| self.exact.get(&PartialVersion::major(major)));
        if let Some(&supported) = exact {
            return Some(supported);
        }

        let version = Version::new(major, minor, patch.unwrap_or(0));

        let in_range = self
            .ranges
            .iter()
            .filter(|(range, _)| range.contains(version))
            .min_by_key(|(range, _)| range.specificity());
        if let Some(&(_, supported)) = in_range {
            return Some(supported);
        }

        if let Some(supported) = self.all {
            return Some(supported);
        }

        // Newer than anything in the table: assume the latest answer holds
        match self.highest {
            Some((highest, supported)) if version > highest => Some(supported),
            _ => None,
        }
    }
}

/// Indexed support table for one feature
#[derive(Debug, Clone, Default)]
pub struct SupportIndex {
    browsers: HashMap<String, BrowserSupport>,
}

impl SupportIndex {
    /// Index a raw table, skipping entries whose version cannot be parsed.
    pub fn from_table(table: &SupportTable) -> Self {
        let mut browsers = HashMap::with_capacity(table.len());

        for (browser_id, versions) in table {
            let support: &mut BrowserSupport = browsers.entry(browser_id.clone()).or_default();
            for (version, code) in versions {
                match VersionSpec::parse(version) {
                    Some(spec) => support.record(spec, is_supported_code(code)),
                    None if version.chars().all(|c| c.is_ascii_alphabetic()) => {
                        tracing::debug!(browser = %browser_id, version = %version, "ignoring non-numeric version");
                    }
                    None => {
                        tracing::warn!(browser = %browser_id, version = %version, "skipping malformed version specifier");
                    }
                }
            }
        }

        Self { browsers }
    }

    /// Parse and index a JSON table.
    pub fn from_json(json: &str) -> Result<Self, CaniuseError> {
        let table = match serde_json::from_str(json)? {
            TableFile::Feature { stats } => stats,
            TableFile::Bare(table) => table,
        };
        Ok(Self::from_table(&table))
    }

    /// Read and index a JSON table from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, CaniuseError> {
        let json = std::fs::read_to_string(path).map_err(|source| CaniuseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Look up support for a browser version.
    ///
    /// Precedence: exact `M.m.p`, `M.m`, `M` entries, then the most specific
    /// range, then `all`, then extrapolation from the highest known entry for
    /// versions above it. Versions below every entry yield `None`.
    pub fn supported(&self, browser_id: &str, major: u32, minor: u32, patch: Option<u32>) -> Option<bool> {
        self.browsers.get(browser_id)?.lookup(major, minor, patch)
    }

    pub fn contains_browser(&self, browser_id: &str) -> bool {
        self.browsers.contains_key(browser_id)
    }

    pub fn browser_ids(&self) -> impl Iterator<Item = &str> {
        self.browsers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.browsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }
}
