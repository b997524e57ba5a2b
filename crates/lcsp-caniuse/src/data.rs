//! Capability data
//!
//! One support index per feature, built once at startup and shared
//! read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use crate::{CaniuseError, SupportIndex};

/// CSP level 1
pub const CSP1_FEATURE: &str = "contentsecuritypolicy";
/// CSP level 2
pub const CSP2_FEATURE: &str = "contentsecuritypolicy2";
/// CSP level 3 (`'strict-dynamic'` support)
pub const CSP3_FEATURE: &str = "contentsecuritypolicy3";

const BUNDLED: &[(&str, &str)] = &[
    (CSP1_FEATURE, include_str!("../data/contentsecuritypolicy.json")),
    (CSP2_FEATURE, include_str!("../data/contentsecuritypolicy2.json")),
    (CSP3_FEATURE, include_str!("../data/contentsecuritypolicy3.json")),
];

/// Support indexes keyed by feature id
#[derive(Debug, Clone, Default)]
pub struct CapabilityData {
    features: HashMap<String, SupportIndex>,
}

impl CapabilityData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables shipped with the crate for the three CSP levels
    pub fn bundled() -> Result<Self, CaniuseError> {
        let mut data = Self::new();
        for (feature, json) in BUNDLED {
            data.insert(feature, SupportIndex::from_json(json)?);
        }
        tracing::info!(features = data.features.len(), "indexed bundled capability data");
        Ok(data)
    }

    /// Load `<feature>.json` for each given feature from a directory.
    pub fn from_dir(dir: &Path, features: &[&str]) -> Result<Self, CaniuseError> {
        let mut data = Self::new();
        for feature in features {
            let path = dir.join(format!("{feature}.json"));
            data.insert(feature, SupportIndex::from_json_file(&path)?);
            tracing::info!(feature = %feature, path = %path.display(), "indexed capability data");
        }
        Ok(data)
    }

    pub fn insert(&mut self, feature: &str, index: SupportIndex) {
        self.features.insert(feature.to_string(), index);
    }

    pub fn with_feature(mut self, feature: &str, index: SupportIndex) -> Self {
        self.insert(feature, index);
        self
    }

    pub fn feature(&self, feature: &str) -> Option<&SupportIndex> {
        self.features.get(feature)
    }

    /// Tri-state support answer; `None` when the feature or browser is unknown.
    pub fn supported(
        &self,
        feature: &str,
        browser_id: &str,
        major: u32,
        minor: u32,
        patch: Option<u32>,
    ) -> Option<bool> {
        self.feature(feature)?.supported(browser_id, major, minor, patch)
    }
}
