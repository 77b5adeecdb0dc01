// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Severity levels.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

pub(crate) const UNKNOWN: &str = "UNKNOWN";

/// An enum representing the available verbosity levels of the logger.
///
/// From least to most verbose, the levels are:
///
/// - `Error`
/// - `Warn`
/// - `Info`
/// - `Debug`
///
/// `Unknown` is not a real level. It is what [`Level::parse`] returns for unrecognized input and
/// orders below every real level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Not a level; the result of parsing an unrecognized string.
    #[default]
    Unknown,
    /// Designates very serious errors.
    Error,
    /// Designates hazardous situations.
    Warn,
    /// Designates useful information.
    Info,
    /// Designates lower priority information.
    Debug,
}

impl Level {
    /// All real levels, from least to most verbose.
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    /// Parse a level from its name, ignoring ASCII case.
    ///
    /// Unrecognized input yields [`Level::Unknown`] rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::Level;
    ///
    /// assert_eq!(Level::parse("warn"), Level::Warn);
    /// assert_eq!(Level::parse("verbose"), Level::Unknown);
    /// ```
    pub fn parse(s: &str) -> Level {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return level;
            }
        }
        Level::Unknown
    }

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Unknown => UNKNOWN,
            Level::Error => "ERR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Whether this is a real level rather than the `Unknown` sentinel.
    pub fn is_valid(&self) -> bool {
        *self != Level::Unknown
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Level::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::parse(level.as_str()), level);
            assert_eq!(Level::parse(&level.as_str().to_lowercase()), level);
        }
        assert_eq!(Level::parse("Debug"), Level::Debug);
    }

    #[test]
    fn test_unknown_sentinel() {
        let level = Level::parse("this level is not known");
        assert_eq!(level, Level::Unknown);
        assert!(!level.is_valid());
        assert_eq!(level.to_string(), "UNKNOWN");

        assert_eq!(Level::parse(""), Level::Unknown);
        // the sentinel's own name is not a level either
        assert_eq!(Level::parse("unknown"), Level::Unknown);
        // only the canonical names are accepted
        assert_eq!(Level::parse("error"), Level::Unknown);
    }

    #[test]
    fn test_ordering() {
        assert!(Level::Unknown < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_serde() {
        let levels: Vec<Level> = serde_json::from_str(r#"["err","Warn","INFO","loud"]"#).unwrap();
        assert_eq!(
            levels,
            [Level::Error, Level::Warn, Level::Info, Level::Unknown]
        );
        assert_eq!(serde_json::to_string(&Level::Debug).unwrap(), r#""DEBUG""#);
        assert_eq!(format!("[{:>5}]", Level::Info), "[ INFO]");
    }
}
