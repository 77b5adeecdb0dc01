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

use std::fmt;
use std::io;
use std::io::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::Colorize;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Level;
use crate::backend::Backend;

/// A backend that writes human-readable lines to the terminal.
///
/// Output format:
///
/// ```text
/// [ ERR] Sun Aug 11 22:44:57 2024 Hello error!
/// [WARN] Sun Aug 11 22:44:57 2024 Hello warn!
/// [INFO] Sun Aug 11 22:44:57 2024 Hello info!
/// [DEBG] Sun Aug 11 22:44:57 2024 Hello debug!
/// ```
///
/// Info and debug lines go to stdout; warn and error lines go to stderr. Use
/// [`output_routing`](Text::output_routing) to send them elsewhere.
///
/// With the `colored` feature (on by default), level tags are bold and colored. Call
/// [`no_color`](Text::no_color) to disable this.
///
/// # Examples
///
/// ```
/// use logplug::backend::Text;
///
/// let backend = Text::default().no_color();
/// ```
pub struct Text {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    #[cfg(feature = "colored")]
    colors: LevelColor,
    no_color: bool,
    timezone: TimeZone,
    timestamp_format: Option<fn(Timestamp, &TimeZone) -> String>,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            #[cfg(feature = "colored")]
            colors: LevelColor::default(),
            no_color: false,
            timezone: TimeZone::system(),
            timestamp_format: None,
        }
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("no_color", &self.no_color)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl Text {
    /// Set the destinations for informational (info, debug) and error (warn, error) lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::backend::Text;
    ///
    /// let backend = Text::default().output_routing(std::io::stderr(), std::io::stderr());
    /// ```
    pub fn output_routing(
        mut self,
        info: impl Write + Send + 'static,
        error: impl Write + Send + 'static,
    ) -> Self {
        self.out = Box::new(info);
        self.err = Box::new(error);
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Customize the color of the error tag. Default to red.
    #[cfg(feature = "colored")]
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warn tag. Default to yellow.
    #[cfg(feature = "colored")]
    pub fn warn_color(mut self, color: Color) -> Self {
        self.colors.warn = color;
        self
    }

    /// Customize the color of the info tag. Default to white.
    #[cfg(feature = "colored")]
    pub fn info_color(mut self, color: Color) -> Self {
        self.colors.info = color;
        self
    }

    /// Customize the color of the debug tag. Default to green.
    #[cfg(feature = "colored")]
    pub fn debug_color(mut self, color: Color) -> Self {
        self.colors.debug = color;
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Set a user-defined timestamp format function.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::backend::Text;
    ///
    /// let backend = Text::default().timestamp_format(|ts, tz| ts.to_zoned(tz.clone()).to_string());
    /// ```
    pub fn timestamp_format(mut self, format: fn(Timestamp, &TimeZone) -> String) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    fn format_tag(&self, level: Level) -> String {
        let tag = match level {
            Level::Error => "[ ERR]",
            Level::Warn => "[WARN]",
            Level::Info => "[INFO]",
            Level::Debug => "[DEBG]",
            Level::Unknown => "[UNKN]",
        };

        #[cfg(feature = "colored")]
        if !self.no_color {
            return self.colors.colorize(level, tag);
        }

        tag.to_string()
    }
}

fn default_timestamp_format(ts: Timestamp, tz: &TimeZone) -> String {
    ts.to_zoned(tz.clone())
        .strftime("%a %b %-d %H:%M:%S %Y")
        .to_string()
}

impl Backend for Text {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        let ts = Timestamp::now();
        let time = match self.timestamp_format {
            Some(format) => format(ts, &self.timezone),
            None => default_timestamp_format(ts, &self.timezone),
        };
        let tag = self.format_tag(level);
        let line = format!("{tag} {time} {args}\n");

        let writer = match level {
            Level::Error | Level::Warn => &mut self.err,
            Level::Info | Level::Debug | Level::Unknown => &mut self.out,
        };
        let _ = writer.write_all(line.as_bytes());
    }

    fn close(&mut self) -> Result<(), Error> {
        Backend::flush(self)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.out.flush().map_err(Error::from_io_error)?;
        self.err.flush().map_err(Error::from_io_error)?;
        Ok(())
    }
}

/// Colors for the level tags.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct LevelColor {
    error: Color,
    warn: Color,
    info: Color,
    debug: Color,
}

#[cfg(feature = "colored")]
impl Default for LevelColor {
    fn default() -> Self {
        Self {
            error: Color::Red,
            warn: Color::Yellow,
            info: Color::White,
            debug: Color::Green,
        }
    }
}

#[cfg(feature = "colored")]
impl LevelColor {
    fn colorize(&self, level: Level, tag: &str) -> String {
        let color = match level {
            Level::Error => self.error,
            Level::Warn => self.warn,
            Level::Info => self.info,
            Level::Debug => self.debug,
            Level::Unknown => return tag.to_string(),
        };
        tag.color(color).bold().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_routing_and_format() {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let mut backend = Text::default()
            .no_color()
            .timestamp_format(|_, _| "Mon Jan 2 15:04:05 2006".to_string())
            .output_routing(out.clone(), err.clone());

        backend.debug("Hello debug world");
        backend.info_fmt(format_args!("Hello {} infof world", 2));
        backend.warn("Hello warn world");
        backend.error_fmt(format_args!("Hello {} errorf world", 4));
        backend.close().unwrap();

        insta::assert_snapshot!(out.contents().trim_end(), @r"
        [DEBG] Mon Jan 2 15:04:05 2006 Hello debug world
        [INFO] Mon Jan 2 15:04:05 2006 Hello 2 infof world
        ");
        insta::assert_snapshot!(err.contents().trim_end(), @r"
        [WARN] Mon Jan 2 15:04:05 2006 Hello warn world
        [ ERR] Mon Jan 2 15:04:05 2006 Hello 4 errorf world
        ");
    }

    #[test]
    fn test_default_timestamp_format() {
        let ts: Timestamp = "2006-01-02T15:04:05Z".parse().unwrap();
        assert_eq!(
            default_timestamp_format(ts, &TimeZone::UTC),
            "Mon Jan 2 15:04:05 2006"
        );
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.log");
        let file = std::fs::File::create(&path).unwrap();
        let mut backend = Text::default()
            .no_color()
            .output_routing(file.try_clone().unwrap(), file);

        backend.info("to the file");
        backend.error("also to the file");
        backend.close().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines = written.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[INFO] ") && lines[0].ends_with(" to the file"));
        assert!(lines[1].starts_with("[ ERR] ") && lines[1].ends_with(" also to the file"));
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_colored_tag_keeps_text() {
        colored::control::set_override(true);
        let backend = Text::default();
        let tag = backend.format_tag(Level::Warn);
        assert!(tag.contains("[WARN]"));
        assert_ne!(tag, "[WARN]");
        colored::control::unset_override();
    }
}
