//! lcsp Rewrite
//!
//! Response-side Content-Security-Policy rewriting for legacy browsers.
//!
//! Features:
//! - Per-request level resolution from the `User-Agent`
//! - Downgrade of every CSP header value (repeated and comma-separated)
//! - Renaming to `X-Content-Security-Policy` / `X-WebKit-CSP` where needed
//! - Optional caching of resolutions and downgraded policies
//! - Response hooks, including policy extension
//!
//! # Example
//! ```rust
//! use lcsp_rewrite::{HookChain, Request, Response, RewriteConfig};
//!
//! let chain = HookChain::from_config(&RewriteConfig::default()).unwrap();
//! let request = Request::get("/").with_user_agent("Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)");
//!
//! let mut exchange = chain.exchange(request);
//! exchange.set_response(Response::new(200).with_header("Content-Security-Policy", "script-src 'nonce-abc'"));
//! let response = exchange.finalize();
//!
//! assert_eq!(response.headers.get("X-Content-Security-Policy"), Some("script-src 'unsafe-inline'"));
//! ```

pub mod headers;
pub mod memo;
pub mod config;
pub mod rewriter;
pub mod hook;

pub use headers::{CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY, Headers, Request, Response};
pub use memo::{CacheStats, Memo, MemoCache, NoMemo};
pub use config::{ConfigError, RewriteConfig, TokenList};
pub use rewriter::{CSP_HEADERS, CspRewriter};
pub use hook::{Exchange, ExtendCspHook, HookChain, LegacyCspHook, ResponseHook};
