//! lcsp caniuse
//!
//! Browser capability lookup built from caniuse-style support tables.
//!
//! Tables map a browser id to version specifiers (`11`, `11.2`, `10.3-12.1`,
//! `all`) and support codes (`y…` means supported). Lookups answer
//! supported, unsupported or unknown.

mod error;
pub mod version;
pub mod index;
pub mod data;

pub use error::CaniuseError;
pub use version::{PartialVersion, Version, VersionRange, VersionSpec};
pub use index::{SupportIndex, SupportTable, is_supported_code};
pub use data::{CSP1_FEATURE, CSP2_FEATURE, CSP3_FEATURE, CapabilityData};
