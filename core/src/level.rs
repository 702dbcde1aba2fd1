//! Diagnostic categories and how a caller selects them.
//!
//! # Design
//! Each [`DebugLevel`] is an independent flag; a [`DebugLevels`] set is built
//! once and never changes. [`DebugConfig`] is the serde-facing form so the
//! selection can live in a caller's own configuration file; nothing here
//! reads environment variables or other process-wide state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One category of diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLevel {
    /// `<METHOD> <URL>` before the call.
    JustUrl,
    /// `<METHOD> <URL> <STATUS> in <N> milliseconds` after the call.
    UrlTiming,
    /// A replayable `curl` invocation before the call.
    CurlCommand,
    RequestHeaders,
    ResponseStatus,
    ResponseHeaders,
}

impl DebugLevel {
    pub const ALL: [DebugLevel; 6] = [
        DebugLevel::JustUrl,
        DebugLevel::UrlTiming,
        DebugLevel::CurlCommand,
        DebugLevel::RequestHeaders,
        DebugLevel::ResponseStatus,
        DebugLevel::ResponseHeaders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebugLevel::JustUrl => "just_url",
            DebugLevel::UrlTiming => "url_timing",
            DebugLevel::CurlCommand => "curl_command",
            DebugLevel::RequestHeaders => "request_headers",
            DebugLevel::ResponseStatus => "response_status",
            DebugLevel::ResponseHeaders => "response_headers",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown debug level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for DebugLevel {
    type Err = UnknownLevel;

    /// Accepts the snake_case names as well as the CamelCase constant names
    /// (`JustURL`, `URLTiming`, ...), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "justurl" => Ok(DebugLevel::JustUrl),
            "urltiming" => Ok(DebugLevel::UrlTiming),
            "curlcommand" => Ok(DebugLevel::CurlCommand),
            "requestheaders" => Ok(DebugLevel::RequestHeaders),
            "responsestatus" => Ok(DebugLevel::ResponseStatus),
            "responseheaders" => Ok(DebugLevel::ResponseHeaders),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// An immutable set of enabled [`DebugLevel`]s. Levels not in the set are
/// disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugLevels(u8);

impl DebugLevels {
    pub const fn none() -> Self {
        DebugLevels(0)
    }

    pub fn all() -> Self {
        DebugLevel::ALL.into_iter().collect()
    }

    pub fn contains(&self, level: DebugLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: DebugLevels) -> Self {
        DebugLevels(self.0 | other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = DebugLevel> + '_ {
        DebugLevel::ALL.into_iter().filter(|level| self.contains(*level))
    }

    /// The levels enabled at a klog-style verbosity.
    ///
    /// | verbosity | levels |
    /// |-----------|--------|
    /// | 9+ | `CurlCommand`, `UrlTiming`, `ResponseHeaders` |
    /// | 8  | `JustUrl`, `RequestHeaders`, `ResponseStatus`, `ResponseHeaders` |
    /// | 7  | `JustUrl`, `RequestHeaders`, `ResponseStatus` |
    /// | 6  | `UrlTiming` |
    /// | <6 | none |
    pub fn for_verbosity(verbosity: u8) -> Self {
        use DebugLevel::*;
        let levels: &[DebugLevel] = match verbosity {
            9..=u8::MAX => &[CurlCommand, UrlTiming, ResponseHeaders],
            8 => &[JustUrl, RequestHeaders, ResponseStatus, ResponseHeaders],
            7 => &[JustUrl, RequestHeaders, ResponseStatus],
            6 => &[UrlTiming],
            _ => &[],
        };
        levels.iter().copied().collect()
    }
}

impl FromIterator<DebugLevel> for DebugLevels {
    fn from_iter<I: IntoIterator<Item = DebugLevel>>(iter: I) -> Self {
        DebugLevels(iter.into_iter().fold(0, |bits, level| bits | level.bit()))
    }
}

impl<const N: usize> From<[DebugLevel; N]> for DebugLevels {
    fn from(levels: [DebugLevel; N]) -> Self {
        levels.into_iter().collect()
    }
}

impl FromStr for DebugLevels {
    type Err = UnknownLevel;

    /// Parses a comma-separated list such as `"just_url, url_timing"`. Empty
    /// entries are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(DebugLevel::from_str)
            .collect()
    }
}

/// Serializable selection of debug levels.
///
/// The effective set is the union of the explicit `levels` and whatever
/// `verbosity` maps to through [`DebugLevels::for_verbosity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    #[serde(default)]
    pub levels: Vec<DebugLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,
}

impl DebugConfig {
    pub fn levels(&self) -> DebugLevels {
        let explicit: DebugLevels = self.levels.iter().copied().collect();
        match self.verbosity {
            Some(v) => explicit.union(DebugLevels::for_verbosity(v)),
            None => explicit,
        }
    }
}
