//! Level downgrades
//!
//! Each step rewrites a policy so that a browser implementing only the
//! lower CSP level enforces it without silently ignoring tokens it does not
//! understand. Where a capability has to be dropped, `'unsafe-inline'` is
//! added as the fallback those browsers need.

use std::collections::HashSet;
use std::fmt;

use crate::policy::ParsedPolicy;
use crate::token::{UNSAFE_INLINE, is_csp3_keyword, is_nonce_or_hash, strip_path};

/// CSP specification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CspLevel {
    Csp1 = 1,
    Csp2 = 2,
    Csp3 = 3,
}

impl CspLevel {
    /// All levels, highest first
    pub const DESCENDING: [CspLevel; 3] = [CspLevel::Csp3, CspLevel::Csp2, CspLevel::Csp1];

    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(CspLevel::Csp1),
            2 => Some(CspLevel::Csp2),
            3 => Some(CspLevel::Csp3),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CspLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CSP{}", self.number())
    }
}

/// CSP3 → CSP2
///
/// Removes `'strict-dynamic'` and `'unsafe-hashed-attributes'` from source
/// directives (adding `'unsafe-inline'` where something was removed) and
/// drops the directives that do not exist before level 3.
pub fn downgrade_csp3_to_csp2(mut policy: ParsedPolicy) -> ParsedPolicy {
    policy.retain(|d| !d.key.is_csp3_only());

    for directive in policy.iter_mut().filter(|d| d.key.is_source_directive()) {
        let before = directive.tokens.len();
        directive.tokens.retain(|token| !is_csp3_keyword(token));
        if directive.tokens.len() != before {
            directive.tokens.push(UNSAFE_INLINE.to_string());
        }
        dedupe(&mut directive.tokens);
    }

    policy
}

/// CSP2 → CSP1
///
/// Removes nonces and hashes (adding `'unsafe-inline'` where something was
/// removed) and strips the path of every host source, since CSP1 has no
/// path matching. Stripping commonly produces duplicates, which are removed.
pub fn downgrade_csp2_to_csp1(mut policy: ParsedPolicy) -> ParsedPolicy {
    for directive in policy.iter_mut().filter(|d| d.key.is_source_directive()) {
        let before = directive.tokens.len();
        directive.tokens.retain(|token| !is_nonce_or_hash(token));
        if directive.tokens.len() != before {
            directive.tokens.push(UNSAFE_INLINE.to_string());
        }

        directive.tokens = directive.tokens.iter().map(|t| strip_path(t)).collect();
        dedupe(&mut directive.tokens);
    }

    policy
}

/// Apply the downgrade chain needed to reach `target` from a level 3 policy.
pub fn downgrade(policy: ParsedPolicy, target: CspLevel) -> ParsedPolicy {
    match target {
        CspLevel::Csp3 => policy,
        CspLevel::Csp2 => downgrade_csp3_to_csp2(policy),
        CspLevel::Csp1 => downgrade_csp2_to_csp1(downgrade_csp3_to_csp2(policy)),
    }
}

/// Parse, downgrade to `target` and serialize a single policy.
pub fn downgrade_policy_str(policy: &str, target: CspLevel) -> String {
    let downgraded = downgrade(ParsedPolicy::parse(policy), target).serialize();
    tracing::trace!(%target, original = policy, downgraded = %downgraded, "downgraded policy");
    downgraded
}

// First occurrence wins
fn dedupe(tokens: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.retain(|token| seen.insert(token.clone()));
}
