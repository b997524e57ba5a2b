//! Rewrite Configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lcsp_policy::PolicyExtension;
use lcsp_resolver::{OverrideRule, OverrideTable};
use serde::Deserialize;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// One token or a list of tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenList {
    One(String),
    Many(Vec<String>),
}

impl TokenList {
    pub fn tokens(&self) -> &[String] {
        match self {
            TokenList::One(token) => std::slice::from_ref(token),
            TokenList::Many(tokens) => tokens,
        }
    }
}

/// Rewriter configuration options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Cache resolutions and downgraded policies
    pub memoize: bool,

    /// Resolution cache size (entries)
    pub resolution_cache_entries: usize,

    /// Downgraded policy cache size (entries)
    pub policy_cache_entries: usize,

    /// Tokens added to the policy before it is rewritten, per directive
    pub add: BTreeMap<String, TokenList>,

    /// Replacement for the built-in override table
    pub overrides: Option<Vec<OverrideRule>>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            resolution_cache_entries: 1024,
            policy_cache_entries: 4096,
            add: BTreeMap::new(),
            overrides: None,
        }
    }
}

impl RewriteConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Policy extension built from `add`
    pub fn extension(&self) -> PolicyExtension {
        self.add
            .iter()
            .fold(PolicyExtension::new(), |ext, (directive, tokens)| ext.add(directive, tokens.tokens()))
    }

    /// Override table: the configured rules, or the built-in ones
    pub fn override_table(&self) -> OverrideTable {
        match &self.overrides {
            Some(rules) => OverrideTable::from_rules(rules),
            None => OverrideTable::default(),
        }
    }
}
