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

//! Backends that render and ship log lines.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::Error;
use crate::Level;
use crate::level::UNKNOWN;

mod devnull;
mod json;
pub mod syslog;
mod text;

pub use self::devnull::DevNull;
pub use self::json::Json;
pub use self::syslog::Syslog;
pub use self::text::Text;

/// The capability every backend provides.
///
/// Only [`log`](Backend::log) and [`close`](Backend::close) are required; the per-level methods
/// forward to `log` unless a backend overrides them.
///
/// A [`Logger`](crate::Logger) serializes all calls into its backend, hence the `&mut self`
/// receivers.
pub trait Backend: fmt::Debug + Send + 'static {
    /// Render and ship a message at the given level.
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>);

    /// Release any resource held by the backend.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`](crate::ErrorKind::Io) error if the resource cannot be released.
    fn close(&mut self) -> Result<(), Error>;

    /// Flush any buffered output.
    ///
    /// Default to doing nothing, for backends that do not buffer.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`](crate::ErrorKind::Io) error if the output cannot be flushed.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Log a message at the debug level.
    fn debug(&mut self, msg: &str) {
        self.log(Level::Debug, format_args!("{msg}"));
    }

    /// Log a formatted message at the debug level.
    fn debug_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    /// Log a message at the info level.
    fn info(&mut self, msg: &str) {
        self.log(Level::Info, format_args!("{msg}"));
    }

    /// Log a formatted message at the info level.
    fn info_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Log a message at the warn level.
    fn warn(&mut self, msg: &str) {
        self.log(Level::Warn, format_args!("{msg}"));
    }

    /// Log a formatted message at the warn level.
    fn warn_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    /// Log a message at the error level.
    fn error(&mut self, msg: &str) {
        self.log(Level::Error, format_args!("{msg}"));
    }

    /// Log a formatted message at the error level.
    fn error_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }
}

/// The backend implementations that can be selected by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Not a backend; the result of parsing an unrecognized identifier.
    #[default]
    Unknown,
    /// Messages go nowhere. See [`DevNull`].
    DevNull,
    /// Messages are written to the terminal. See [`Text`].
    Console,
    /// Messages are encoded as JSON lines. See [`Json`].
    Json,
    /// Messages are sent to the system log daemon. See [`Syslog`].
    Syslog,
}

impl BackendKind {
    /// All real backend kinds.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::DevNull,
        BackendKind::Console,
        BackendKind::Json,
        BackendKind::Syslog,
    ];

    /// Parse a backend identifier, ignoring ASCII case.
    ///
    /// Unrecognized input yields [`BackendKind::Unknown`] rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::backend::BackendKind;
    ///
    /// assert_eq!(BackendKind::parse("json"), BackendKind::Json);
    /// assert_eq!(BackendKind::parse("kafka"), BackendKind::Unknown);
    /// ```
    pub fn parse(s: &str) -> BackendKind {
        for kind in BackendKind::ALL {
            if s.eq_ignore_ascii_case(kind.as_str()) {
                return kind;
            }
        }
        BackendKind::Unknown
    }

    /// Return the identifier of the `BackendKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Unknown => UNKNOWN,
            BackendKind::DevNull => "DEVNULL",
            BackendKind::Console => "CONSOLE",
            BackendKind::Json => "JSON",
            BackendKind::Syslog => "SYSLOG",
        }
    }

    /// Whether this is a real backend kind rather than the `Unknown` sentinel.
    pub fn is_valid(&self) -> bool {
        *self != BackendKind::Unknown
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for BackendKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(BackendKind::parse(&s))
    }
}

/// The backend a [`Logger`](crate::Logger) dispatches to.
///
/// Built-in backends are known variants; anything else implementing [`Backend`] goes through
/// [`BackendImpl::Custom`].
#[derive(Debug)]
pub enum BackendImpl {
    /// A backend that discards everything.
    DevNull(DevNull),
    /// A terminal backend.
    Text(Text),
    /// A JSON lines backend.
    Json(Json),
    /// A system log backend.
    Syslog(Syslog),
    /// A user-supplied backend.
    Custom(Box<dyn Backend>),
}

impl BackendImpl {
    /// Wrap a user-supplied backend.
    pub fn custom(backend: impl Backend) -> Self {
        BackendImpl::Custom(Box::new(backend))
    }

    /// Construct the default backend for a kind.
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::Config`](crate::ErrorKind::Config) error for
    /// [`BackendKind::Unknown`], or an [`ErrorKind::Io`](crate::ErrorKind::Io) error if the
    /// syslog connection cannot be opened.
    pub fn from_kind(kind: BackendKind) -> Result<Self, Error> {
        match kind {
            BackendKind::DevNull => Ok(DevNull.into()),
            BackendKind::Console => Ok(Text::default().into()),
            BackendKind::Json => Ok(Json::default().into()),
            BackendKind::Syslog => syslog::SyslogBuilder::default().connect().map(Into::into),
            BackendKind::Unknown => Err(Error::config("unknown backend kind")),
        }
    }

    fn as_backend(&mut self) -> &mut dyn Backend {
        match self {
            BackendImpl::DevNull(backend) => backend,
            BackendImpl::Text(backend) => backend,
            BackendImpl::Json(backend) => backend,
            BackendImpl::Syslog(backend) => backend,
            BackendImpl::Custom(backend) => backend.as_mut(),
        }
    }
}

impl Backend for BackendImpl {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        self.as_backend().log(level, args);
    }

    fn close(&mut self) -> Result<(), Error> {
        self.as_backend().close()
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.as_backend().flush()
    }

    fn debug(&mut self, msg: &str) {
        self.as_backend().debug(msg);
    }

    fn debug_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.as_backend().debug_fmt(args);
    }

    fn info(&mut self, msg: &str) {
        self.as_backend().info(msg);
    }

    fn info_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.as_backend().info_fmt(args);
    }

    fn warn(&mut self, msg: &str) {
        self.as_backend().warn(msg);
    }

    fn warn_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.as_backend().warn_fmt(args);
    }

    fn error(&mut self, msg: &str) {
        self.as_backend().error(msg);
    }

    fn error_fmt(&mut self, args: fmt::Arguments<'_>) {
        self.as_backend().error_fmt(args);
    }
}

impl From<DevNull> for BackendImpl {
    fn from(backend: DevNull) -> Self {
        BackendImpl::DevNull(backend)
    }
}

impl From<Text> for BackendImpl {
    fn from(backend: Text) -> Self {
        BackendImpl::Text(backend)
    }
}

impl From<Json> for BackendImpl {
    fn from(backend: Json) -> Self {
        BackendImpl::Json(backend)
    }
}

impl From<Syslog> for BackendImpl {
    fn from(backend: Syslog) -> Self {
        BackendImpl::Syslog(backend)
    }
}

impl From<Box<dyn Backend>> for BackendImpl {
    fn from(backend: Box<dyn Backend>) -> Self {
        BackendImpl::Custom(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in BackendKind::ALL {
            assert!(kind.is_valid());
            assert_eq!(BackendKind::parse(kind.as_str()), kind);
            assert_eq!(BackendKind::parse(&kind.as_str().to_lowercase()), kind);
        }
        assert_eq!(BackendKind::Console.to_string(), "CONSOLE");
    }

    #[test]
    fn test_kind_unknown() {
        let kind = BackendKind::parse("this logger is not supported");
        assert_eq!(kind, BackendKind::Unknown);
        assert_eq!(kind.to_string(), "UNKNOWN");
        assert_eq!(BackendKind::parse(""), BackendKind::Unknown);

        let err = BackendImpl::from_kind(kind).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_kind_serde() {
        let kinds: Vec<BackendKind> =
            serde_json::from_str(r#"["devnull","Console","JSON","syslog","kafka"]"#).unwrap();
        assert_eq!(
            kinds,
            [
                BackendKind::DevNull,
                BackendKind::Console,
                BackendKind::Json,
                BackendKind::Syslog,
                BackendKind::Unknown
            ]
        );
        assert_eq!(
            serde_json::to_string(&BackendKind::DevNull).unwrap(),
            r#""DEVNULL""#
        );
    }

    #[derive(Debug, Default)]
    struct Shouting {
        lines: Vec<String>,
    }

    impl Backend for Shouting {
        fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
            self.lines.push(format!("{level} {args}"));
        }

        fn close(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn error(&mut self, msg: &str) {
            self.lines.push(msg.to_uppercase());
        }
    }

    #[test]
    fn test_custom_overrides_are_honored() {
        let mut backend = BackendImpl::custom(Shouting::default());
        backend.error("disk full");
        backend.error_fmt(format_args!("disk {}", "full"));
        backend.info("fine");

        let BackendImpl::Custom(custom) = &backend else {
            panic!("expected a custom backend");
        };
        let rendered = format!("{custom:?}");
        assert!(rendered.contains(r#""DISK FULL""#), "{rendered}");
        assert!(rendered.contains(r#""ERR disk full""#), "{rendered}");
        assert!(rendered.contains(r#""INFO fine""#), "{rendered}");
    }
}
