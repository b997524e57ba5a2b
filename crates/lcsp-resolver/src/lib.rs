//! lcsp Resolver
//!
//! Works out which CSP level a browser understands.
//!
//! Features:
//! - User-agent detection (family + version)
//! - Data-driven family overrides
//! - Capability lookup over caniuse support tables
//!
//! # Example
//! ```rust
//! use lcsp_resolver::{Resolver, TargetLevel};
//!
//! let resolver = Resolver::bundled().unwrap();
//! let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_5) AppleWebKit/536.30.1 (KHTML, like Gecko) Version/6.0.5 Safari/536.30.1";
//! let resolution = resolver.resolve_user_agent(Some(ua));
//! assert_eq!(resolution.level, TargetLevel::from_number(1).unwrap());
//! assert_eq!(resolution.header_name("Content-Security-Policy"), "X-WebKit-CSP");
//! ```

pub mod user_agent;
pub mod overrides;
pub mod resolver;

pub use user_agent::{BrowserFamily, UserAgent};
pub use overrides::{CompiledRule, OverrideRule, OverrideTable, X_CONTENT_SECURITY_POLICY, X_WEBKIT_CSP};
pub use resolver::{
    CaniuseLookup, CapabilityLookup, FamilyMap, REPORT_ONLY_SUFFIX, Resolution, Resolver, TargetLevel,
};
