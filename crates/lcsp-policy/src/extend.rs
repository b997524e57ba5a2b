//! Policy extension
//!
//! Adds tokens to directives of an existing policy while respecting
//! `'none'` and `default-src` fallback.

use crate::directive::{DEFAULT_SRC, DirectiveKey};
use crate::policy::ParsedPolicy;
use crate::token::{NONE, normalize_token};

/// Tokens to add, per directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyExtension {
    additions: Vec<(DirectiveKey, Vec<String>)>,
}

impl PolicyExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add tokens to a directive given by wire name (`style-src`) or
    /// internal key (`styleSrc`).
    pub fn add<I, T>(mut self, directive: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let key = DirectiveKey::new(directive);
        let tokens: Vec<String> = tokens.into_iter().map(|t| normalize_token(t.as_ref())).collect();

        match self.additions.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(tokens),
            None => self.additions.push((key, tokens)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }

    /// Apply the additions to a policy.
    ///
    /// - a directive holding only `'none'` is replaced by the added tokens
    /// - an existing directive gets the tokens appended
    /// - a missing directive that falls back to a non-`'none'` `default-src`
    ///   starts from a copy of `default-src`
    /// - any other missing directive is created with just the added tokens
    pub fn apply(&self, policy: &mut ParsedPolicy) {
        let default_src = DirectiveKey::new(DEFAULT_SRC);

        for (key, added) in &self.additions {
            if let Some(tokens) = policy.get_mut(key) {
                if is_only_none(tokens) {
                    *tokens = added.clone();
                } else {
                    tokens.extend(added.iter().cloned());
                }
                continue;
            }

            let mut tokens = match policy.get(&default_src) {
                Some(fallback) if key.falls_back_to_default_src() && !is_only_none(fallback) => {
                    fallback.clone()
                }
                _ => Vec::new(),
            };
            tokens.extend(added.iter().cloned());
            policy.insert(key.clone(), tokens);
        }
    }

    /// Parse, extend and serialize a policy string.
    pub fn extend_str(&self, policy: &str) -> String {
        let mut parsed = ParsedPolicy::parse(policy);
        self.apply(&mut parsed);
        parsed.serialize()
    }
}

fn is_only_none(tokens: &[String]) -> bool {
    matches!(tokens, [only] if only.eq_ignore_ascii_case(NONE))
}
