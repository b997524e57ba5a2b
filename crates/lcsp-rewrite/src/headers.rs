//! HTTP Messages
//!
//! Minimal request/response types for the header rewrite. Header names
//! compare case-insensitively and a name may repeat.

/// `Content-Security-Policy`
pub const CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
/// `Content-Security-Policy-Report-Only`
pub const CONTENT_SECURITY_POLICY_REPORT_ONLY: &str = "Content-Security-Policy-Report-Only";
/// `User-Agent`
pub const USER_AGENT: &str = "User-Agent";

/// Ordered header multi-map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Add a value, keeping existing ones.
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Replace all values of `name` with one value.
    ///
    /// The new entry takes the position of the first existing one.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(pos) => {
                self.entries[pos] = (name.to_string(), value.to_string());
                let mut index = 0;
                self.entries.retain(|(k, _)| {
                    let keep = index <= pos || !k.eq_ignore_ascii_case(name);
                    index += 1;
                    keep
                });
            }
            None => self.append(name, value),
        }
    }

    /// Remove every value of `name`, returning them.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                removed.push(v.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        Self { entries }
    }
}

/// Incoming request as seen by response hooks
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Headers,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the `User-Agent`, replacing any earlier one.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.headers.set(USER_AGENT, user_agent);
        self
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT)
    }
}

/// Outgoing response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}
