//! User-Agent detection
//!
//! Just enough user-agent parsing to pick a browser family and version.
//! Patterns are tried most specific first: browsers built on Chromium or
//! WebKit also carry `Chrome/` and `Safari/` tokens.

use std::fmt;
use std::sync::LazyLock;

use lcsp_caniuse::Version;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Browser family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserFamily {
    #[serde(rename = "IE")]
    Ie,
    Edge,
    Firefox,
    #[serde(rename = "Firefox Mobile")]
    FirefoxMobile,
    Chrome,
    #[serde(rename = "Chrome Mobile")]
    ChromeMobile,
    Safari,
    #[serde(rename = "Mobile Safari")]
    MobileSafari,
    Opera,
    #[serde(rename = "Android")]
    AndroidBrowser,
    #[serde(rename = "Samsung Internet")]
    SamsungInternet,
}

impl BrowserFamily {
    pub const ALL: [BrowserFamily; 11] = [
        BrowserFamily::Ie,
        BrowserFamily::Edge,
        BrowserFamily::Firefox,
        BrowserFamily::FirefoxMobile,
        BrowserFamily::Chrome,
        BrowserFamily::ChromeMobile,
        BrowserFamily::Safari,
        BrowserFamily::MobileSafari,
        BrowserFamily::Opera,
        BrowserFamily::AndroidBrowser,
        BrowserFamily::SamsungInternet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BrowserFamily::Ie => "IE",
            BrowserFamily::Edge => "Edge",
            BrowserFamily::Firefox => "Firefox",
            BrowserFamily::FirefoxMobile => "Firefox Mobile",
            BrowserFamily::Chrome => "Chrome",
            BrowserFamily::ChromeMobile => "Chrome Mobile",
            BrowserFamily::Safari => "Safari",
            BrowserFamily::MobileSafari => "Mobile Safari",
            BrowserFamily::Opera => "Opera",
            BrowserFamily::AndroidBrowser => "Android",
            BrowserFamily::SamsungInternet => "Samsung Internet",
        }
    }

    /// Browser id used by caniuse support tables
    pub fn caniuse_id(&self) -> &'static str {
        match self {
            BrowserFamily::Ie => "ie",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::FirefoxMobile => "and_ff",
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::ChromeMobile => "and_chr",
            BrowserFamily::Safari => "safari",
            BrowserFamily::MobileSafari => "ios_saf",
            BrowserFamily::Opera => "opera",
            BrowserFamily::AndroidBrowser => "android",
            BrowserFamily::SamsungInternet => "samsung",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detected browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserAgent {
    pub family: BrowserFamily,
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

// (family, pattern) in match order; groups 1-3 are major, minor, patch
const PATTERNS: &[(BrowserFamily, &str)] = &[
    (BrowserFamily::Edge, r"\bEdge/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Edge, r"\bEdg(?:A|iOS)?/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::SamsungInternet, r"\bSamsungBrowser/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Opera, r"\bOPR/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Opera, r"\bOpera\b.*\bVersion/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Opera, r"\bOpera[/ ](\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Ie, r"\bMSIE (\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Ie, r"\bTrident/\d+.*\brv:(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::FirefoxMobile, r"\b(?:Mobile|Tablet);.*\bFirefox/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::Firefox, r"\bFirefox/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::ChromeMobile, r"\bAndroid\b.*\bChrome/(\d+)(?:\.(\d+))?(?:\.(\d+))?.*\bMobile\b"),
    (BrowserFamily::Chrome, r"\bChrom(?:e|ium)/(\d+)(?:\.(\d+))?(?:\.(\d+))?"),
    (BrowserFamily::AndroidBrowser, r"\bAndroid (\d+)(?:\.(\d+))?(?:\.(\d+))?;.*\bVersion/[\d.]+ (?:Mobile )?Safari/"),
    (BrowserFamily::MobileSafari, r"\b(?:iPhone|iPad|iPod)\b.*\bVersion/(\d+)(?:\.(\d+))?(?:\.(\d+))?.*\bSafari/"),
    (BrowserFamily::Safari, r"\bVersion/(\d+)(?:\.(\d+))?(?:\.(\d+))?.*\bSafari/"),
];

static MATCHERS: LazyLock<Vec<(BrowserFamily, Regex)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .map(|(family, pattern)| (*family, Regex::new(pattern).expect("user-agent pattern is valid")))
        .collect()
});

impl UserAgent {
    pub fn new(family: BrowserFamily, major: u32, minor: u32, patch: Option<u32>) -> Self {
        Self { family, major, minor, patch }
    }

    /// Detect the browser from a `User-Agent` header value.
    pub fn parse(header: &str) -> Option<Self> {
        MATCHERS.iter().find_map(|(family, re)| {
            let caps = re.captures(header)?;
            Self::from_captures(*family, &caps)
        })
    }

    fn from_captures(family: BrowserFamily, caps: &Captures<'_>) -> Option<Self> {
        let component = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        Some(Self {
            family,
            major: component(1)?,
            minor: component(2).unwrap_or(0),
            patch: component(3),
        })
    }

    /// Version with a missing patch counted as 0
    pub fn version(&self) -> Version {
        Version::new(self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.family, self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}
