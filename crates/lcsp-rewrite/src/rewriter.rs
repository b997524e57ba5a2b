//! CSP Rewriter
//!
//! Rewrites the CSP headers of one response for the level the requesting
//! browser understands.

use lcsp_caniuse::CaniuseError;
use lcsp_policy::{CspLevel, downgrade_policy_str, split_policy_list};
use lcsp_resolver::{BrowserFamily, CaniuseLookup, Resolution, Resolver, TargetLevel, UserAgent};

use crate::config::RewriteConfig;
use crate::headers::{CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY, Headers};
use crate::memo::{CacheStats, Memo, MemoCache, NoMemo};

/// Headers the rewriter looks at
pub const CSP_HEADERS: [&str; 2] = [CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY];

/// Per-response CSP header rewriter
pub struct CspRewriter {
    resolver: Resolver,
    resolutions: Box<dyn Memo<UserAgent, Resolution>>,
    policies: Box<dyn Memo<(String, CspLevel), String>>,
}

impl CspRewriter {
    /// Rewriter without caching
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            resolutions: Box::new(NoMemo),
            policies: Box::new(NoMemo),
        }
    }

    /// Rewriter with bounded caches in front of resolution and downgrade
    pub fn with_cache(resolver: Resolver, resolution_entries: usize, policy_entries: usize) -> Self {
        Self {
            resolver,
            resolutions: Box::new(MemoCache::new(resolution_entries)),
            policies: Box::new(MemoCache::new(policy_entries)),
        }
    }

    /// Rewriter over the bundled capability data
    pub fn from_config(config: &RewriteConfig) -> Result<Self, CaniuseError> {
        let resolver = Resolver::new(CaniuseLookup::bundled()?, config.override_table());
        let rewriter = if config.memoize {
            Self::with_cache(resolver, config.resolution_cache_entries, config.policy_cache_entries)
        } else {
            Self::new(resolver)
        };
        tracing::info!(
            memoize = config.memoize,
            overrides = rewriter.resolver.overrides().len(),
            "CSP rewriter ready"
        );
        Ok(rewriter)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve a raw `User-Agent` header.
    pub fn resolve(&self, user_agent: Option<&str>) -> Resolution {
        match user_agent.and_then(UserAgent::parse) {
            Some(agent) => self
                .resolutions
                .get_or_compute(agent, &|agent: &UserAgent| self.resolver.resolve(agent)),
            None => self.resolver.resolve_user_agent(user_agent),
        }
    }

    pub fn resolve_target_level(
        &self,
        family: BrowserFamily,
        major: u32,
        minor: u32,
        patch: Option<u32>,
    ) -> TargetLevel {
        let agent = UserAgent::new(family, major, minor, patch);
        self.resolutions
            .get_or_compute(agent, &|agent: &UserAgent| self.resolver.resolve(agent))
            .level
    }

    /// Downgrade every policy of a header value to `level`.
    ///
    /// Comma-separated policies are handled one by one and rejoined with
    /// `", "`. Values for levels that need no downgrade come back unchanged.
    pub fn downgrade_and_serialize(&self, value: &str, level: TargetLevel) -> String {
        let Some(target) = level.downgrade_level() else {
            return value.to_string();
        };
        self.policies
            .get_or_compute((value.to_string(), target), &|(value, target): &(String, CspLevel)| {
                split_policy_list(value)
                    .map(|policy| downgrade_policy_str(policy, *target))
                    .filter(|policy| !policy.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
    }

    /// Rewrite the CSP headers of a response for the given user agent.
    ///
    /// Returns the resolution used, or `None` when the response carries
    /// no CSP header.
    pub fn rewrite(&self, user_agent: Option<&str>, headers: &mut Headers) -> Option<Resolution> {
        if !CSP_HEADERS.iter().any(|name| headers.contains(name)) {
            return None;
        }
        let resolution = self.resolve(user_agent);
        self.apply(&resolution, headers);
        Some(resolution)
    }

    /// Rewrite the CSP headers for an already resolved level.
    pub fn apply(&self, resolution: &Resolution, headers: &mut Headers) {
        match resolution.level {
            TargetLevel::Unsupported => {
                for name in CSP_HEADERS {
                    headers.remove(name);
                }
                tracing::debug!("browser lacks CSP support, removed policy headers");
            }
            level if level.is_passthrough() => {
                tracing::debug!(level = %level, "policy passed through");
            }
            level => {
                for name in CSP_HEADERS {
                    let values = headers.remove(name);
                    if values.is_empty() {
                        continue;
                    }
                    let target = resolution.header_name(name);
                    for value in &values {
                        let downgraded = self.downgrade_and_serialize(value, level);
                        // values holding no policy at all are dropped, not emitted empty
                        if !downgraded.is_empty() {
                            headers.append(&target, &downgraded);
                        }
                    }
                    tracing::debug!(level = %level, from = name, to = %target, count = values.len(), "downgraded policy header");
                }
            }
        }
    }

    pub fn resolution_stats(&self) -> CacheStats {
        self.resolutions.stats()
    }

    pub fn policy_stats(&self) -> CacheStats {
        self.policies.stats()
    }
}

impl std::fmt::Debug for CspRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CspRewriter")
            .field("resolver", &self.resolver)
            .field("resolutions", &self.resolutions.stats())
            .field("policies", &self.policies.stats())
            .finish()
    }
}
