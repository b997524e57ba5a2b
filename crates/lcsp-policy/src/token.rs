//! Source-list tokens
//!
//! Token normalization and the classification predicates used by the
//! level downgrades.

use std::sync::LazyLock;

use regex::Regex;

/// CSP source keywords
pub const SELF: &str = "'self'";
pub const NONE: &str = "'none'";
pub const UNSAFE_INLINE: &str = "'unsafe-inline'";
pub const UNSAFE_EVAL: &str = "'unsafe-eval'";
pub const STRICT_DYNAMIC: &str = "'strict-dynamic'";
pub const UNSAFE_HASHED_ATTRIBUTES: &str = "'unsafe-hashed-attributes'";

static LOWERCASE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^'(?:unsafe-inline|unsafe-eval|unsafe-dynamic|unsafe-hash-attributes|self)'$")
        .expect("keyword pattern is valid")
});

static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9.+-]+:").expect("scheme pattern is valid"));

static HASH_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^'sha\d+-").expect("hash pattern is valid"));

static NONCE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^'nonce-").expect("nonce pattern is valid"));

static NONCE_OR_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^'(?:nonce-|sha\d+-)").expect("nonce/hash pattern is valid"));

static CSP3_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^'(?:unsafe-hashed-attributes|strict-dynamic)'$")
        .expect("csp3 keyword pattern is valid")
});

static ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:([a-z][a-z0-9+.-]+)://)?(\*|(?:\*\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*)(?::(\d+|\*))?(/.*)?$",
    )
    .expect("origin pattern is valid")
});

/// Canonicalize the case-insensitive parts of a token.
///
/// Fixed keywords are lower-cased entirely. Otherwise a leading scheme, a
/// `'shaNNN-` prefix and a `'nonce-` prefix are lower-cased while the rest
/// (hash and nonce payloads in particular) is left untouched.
pub fn normalize_token(token: &str) -> String {
    if LOWERCASE_KEYWORD.is_match(token) {
        return token.to_ascii_lowercase();
    }

    let token = lowercase_prefix(&SCHEME_PREFIX, token);
    let token = lowercase_prefix(&HASH_PREFIX, &token);
    lowercase_prefix(&NONCE_PREFIX, &token)
}

fn lowercase_prefix(pattern: &Regex, token: &str) -> String {
    match pattern.find(token) {
        Some(m) => {
            let mut out = token[..m.end()].to_ascii_lowercase();
            out.push_str(&token[m.end()..]);
            out
        }
        None => token.to_string(),
    }
}

/// `'nonce-…'` and `'shaNNN-…'` tokens (CSP level 2)
pub fn is_nonce_or_hash(token: &str) -> bool {
    NONCE_OR_HASH.is_match(token)
}

/// `'strict-dynamic'` and `'unsafe-hashed-attributes'` (CSP level 3)
pub fn is_csp3_keyword(token: &str) -> bool {
    CSP3_KEYWORD.is_match(token)
}

/// Host source expression: `[scheme://]host[:port][/path]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSource<'a> {
    pub scheme: Option<&'a str>,
    pub host: &'a str,
    pub port: Option<&'a str>,
    pub path: Option<&'a str>,
}

impl<'a> HostSource<'a> {
    /// Match a token against the host-source grammar.
    pub fn parse(token: &'a str) -> Option<Self> {
        let caps = ORIGIN.captures(token)?;
        Some(Self {
            scheme: caps.get(1).map(|m| m.as_str()),
            host: caps.get(2)?.as_str(),
            port: caps.get(3).map(|m| m.as_str()),
            path: caps.get(4).map(|m| m.as_str()),
        })
    }

    /// Serialize without the path component.
    pub fn without_path(&self) -> String {
        let mut out = String::new();
        if let Some(scheme) = self.scheme {
            out.push_str(scheme);
            out.push_str("://");
        }
        out.push_str(self.host);
        if let Some(port) = self.port {
            out.push(':');
            out.push_str(port);
        }
        out
    }
}

/// Drop the path of a host-source token; other tokens are returned unchanged.
pub fn strip_path(token: &str) -> String {
    match HostSource::parse(token) {
        Some(source) => source.without_path(),
        None => token.to_string(),
    }
}
