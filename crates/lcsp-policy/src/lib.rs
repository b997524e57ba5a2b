//! lcsp Policy
//!
//! Content-Security-Policy grammar engine.
//!
//! Features:
//! - Directive name codec (wire ↔ internal keys)
//! - Token normalization
//! - Parsing and serialization of policy strings
//! - CSP3 → CSP2 → CSP1 downgrades
//! - Extending an existing policy with extra sources
//!
//! # Example
//! ```rust
//! use lcsp_policy::{CspLevel, downgrade_policy_str};
//!
//! let csp1 = downgrade_policy_str("script-src 'nonce-abc' cdn.example.com/js/", CspLevel::Csp1);
//! assert_eq!(csp1, "script-src cdn.example.com 'unsafe-inline'");
//! ```

pub mod directive;
pub mod token;
pub mod policy;
pub mod downgrade;
pub mod extend;

pub use directive::{DirectiveKey, to_internal_key, to_wire_name};
pub use token::{HostSource, normalize_token};
pub use policy::{Directive, ParsedPolicy, split_policy_list};
pub use downgrade::{
    CspLevel, downgrade, downgrade_csp2_to_csp1, downgrade_csp3_to_csp2, downgrade_policy_str,
};
pub use extend::PolicyExtension;
