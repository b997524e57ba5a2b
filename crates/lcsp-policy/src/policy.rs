//! Parsed policies
//!
//! A policy is a mapping from directive key to an ordered token list.
//! Directive order follows first appearance; a repeated directive replaces the
//! tokens of the earlier one in place.

use std::fmt;

use crate::directive::DirectiveKey;
use crate::token::normalize_token;

/// Single directive of a parsed policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: DirectiveKey,
    pub tokens: Vec<String>,
}

/// Parsed Content-Security-Policy
///
/// A key that is present always has a token list, possibly empty; an absent
/// key means the directive was not given at all.
#[derive(Debug, Clone, Default)]
pub struct ParsedPolicy {
    directives: Vec<Directive>,
}

impl ParsedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a policy string.
    ///
    /// Never fails: blank segments are skipped and unknown tokens are kept
    /// verbatim (after normalization).
    pub fn parse(policy: &str) -> Self {
        let mut parsed = Self::new();

        for segment in policy.split(';') {
            let mut fragments = segment.split_whitespace();
            let Some(name) = fragments.next() else {
                continue;
            };

            let key = DirectiveKey::new(&name.to_lowercase());
            let tokens = fragments.map(normalize_token).collect();
            parsed.insert(key, tokens);
        }

        parsed
    }

    /// Serialize back to wire format.
    pub fn serialize(&self) -> String {
        let mut text = String::new();
        for directive in &self.directives {
            if !text.is_empty() {
                text.push_str("; ");
            }
            text.push_str(&directive.key.wire_name());
            if !directive.tokens.is_empty() {
                text.push(' ');
                text.push_str(&directive.tokens.join(" "));
            }
        }
        text
    }

    /// Set the tokens of a directive, keeping its position if already present.
    pub fn insert(&mut self, key: DirectiveKey, tokens: Vec<String>) {
        match self.directives.iter_mut().find(|d| d.key == key) {
            Some(existing) => existing.tokens = tokens,
            None => self.directives.push(Directive { key, tokens }),
        }
    }

    pub fn get(&self, key: &DirectiveKey) -> Option<&Vec<String>> {
        self.directives.iter().find(|d| &d.key == key).map(|d| &d.tokens)
    }

    pub fn get_mut(&mut self, key: &DirectiveKey) -> Option<&mut Vec<String>> {
        self.directives.iter_mut().find(|d| &d.key == key).map(|d| &mut d.tokens)
    }

    pub fn contains(&self, key: &DirectiveKey) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &DirectiveKey) -> Option<Vec<String>> {
        let index = self.directives.iter().position(|d| &d.key == key)?;
        Some(self.directives.remove(index).tokens)
    }

    /// Keep only the directives matching the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&Directive) -> bool) {
        self.directives.retain(|d| keep(d));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Directive> {
        self.directives.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DirectiveKey> {
        self.directives.iter().map(|d| &d.key)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

// Structural equality: same directives with the same token sequences,
// regardless of directive order.
impl PartialEq for ParsedPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .directives
                .iter()
                .all(|d| other.get(&d.key) == Some(&d.tokens))
    }
}

impl Eq for ParsedPolicy {}

impl fmt::Display for ParsedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl From<&str> for ParsedPolicy {
    fn from(policy: &str) -> Self {
        Self::parse(policy)
    }
}

impl FromIterator<(DirectiveKey, Vec<String>)> for ParsedPolicy {
    fn from_iter<I: IntoIterator<Item = (DirectiveKey, Vec<String>)>>(iter: I) -> Self {
        let mut policy = Self::new();
        for (key, tokens) in iter {
            policy.insert(key, tokens);
        }
        policy
    }
}

/// Split a header value holding several comma-separated policies.
///
/// Blank entries are dropped.
pub fn split_policy_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> DirectiveKey {
        DirectiveKey::new(name)
    }

    #[test]
    fn test_parse_basic() {
        let policy = ParsedPolicy::parse("default-src 'self'; script-src 'self' https://cdn.example.com");

        assert_eq!(policy.len(), 2);
        assert_eq!(policy.get(&key("default-src")).unwrap(), &vec!["'self'".to_string()]);
        assert_eq!(policy.get(&key("scriptSrc")).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_tolerates_stray_semicolons() {
        let policy = ParsedPolicy::parse(" ;; script-src * ;  ; ");
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.serialize(), "script-src *");
    }

    #[test]
    fn test_parse_lowercases_directive_name() {
        let policy = ParsedPolicy::parse("Script-SRC 'self'");
        assert!(policy.contains(&key("script-src")));
    }

    #[test]
    fn test_empty_directive_is_present() {
        let policy = ParsedPolicy::parse("upgrade-insecure-requests; script-src");
        assert_eq!(policy.get(&key("upgrade-insecure-requests")), Some(&vec![]));
        assert_eq!(policy.serialize(), "upgrade-insecure-requests; script-src");
    }

    #[test]
    fn test_last_directive_wins_in_place() {
        let policy = ParsedPolicy::parse("script-src a.com; img-src *; script-src b.com");
        assert_eq!(policy.serialize(), "script-src b.com; img-src *");
    }

    #[test]
    fn test_parse_empty() {
        assert!(ParsedPolicy::parse("").is_empty());
        assert!(ParsedPolicy::parse("   ").is_empty());
        assert_eq!(ParsedPolicy::new().serialize(), "");
    }

    #[test]
    fn test_serialize_normalizes_whitespace() {
        let policy = ParsedPolicy::parse("default-src\t'SELF'   data:;report-uri /r");
        assert_eq!(policy.to_string(), "default-src 'self' data:; report-uri /r");
    }

    #[test]
    fn test_equality_ignores_directive_order() {
        let a = ParsedPolicy::parse("img-src *; script-src 'self'");
        let b = ParsedPolicy::parse("script-src 'self'; img-src *");
        assert_eq!(a, b);
        assert_ne!(a, ParsedPolicy::parse("script-src 'self'"));
    }

    #[test]
    fn test_remove_and_retain() {
        let mut policy = ParsedPolicy::parse("img-src *; worker-src 'self'; report-uri /r");
        assert_eq!(policy.remove(&key("img-src")), Some(vec!["*".to_string()]));
        policy.retain(|d| d.key.is_source_directive());
        assert_eq!(policy.serialize(), "worker-src 'self'");
    }

    #[test]
    fn test_split_policy_list() {
        let parts: Vec<_> = split_policy_list("script-src a, img-src b ,, ").collect();
        assert_eq!(parts, vec!["script-src a", "img-src b"]);
    }
}
