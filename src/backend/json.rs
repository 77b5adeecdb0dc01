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

use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::Error;
use crate::Level;
use crate::backend::Backend;

/// A backend that encodes each message as one JSON object per line.
///
/// Output format:
///
/// ```json
/// {"time":"2024-08-11T22:44:57.172051+08:00","level":"ERR","msg":"Hello error!"}
/// {"time":"2024-08-11T22:44:57.172187+08:00","level":"WARN","msg":"Hello warn!"}
/// {"time":"2024-08-11T22:44:57.172246+08:00","level":"INFO","msg":"Hello info!"}
/// {"time":"2024-08-11T22:44:57.172300+08:00","level":"DEBUG","msg":"Hello debug!"}
/// ```
///
/// Lines are written to stdout unless redirected with [`output`](Json::output).
///
/// # Examples
///
/// ```
/// use logplug::backend::Json;
///
/// let backend = Json::default().output(std::io::stderr());
/// ```
pub struct Json {
    out: Box<dyn Write + Send>,
    tz: TimeZone,
    timestamp_format: Option<fn(Timestamp, &TimeZone) -> String>,
}

impl Default for Json {
    fn default() -> Self {
        Self {
            out: Box::new(io::stdout()),
            tz: TimeZone::system(),
            timestamp_format: None,
        }
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Json")
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}

impl Json {
    /// Set the destination for the encoded lines.
    pub fn output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logplug::backend::Json;
    ///
    /// let backend = Json::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = tz;
        self
    }

    /// Set a user-defined timestamp format function.
    ///
    /// Default to formatting the timestamp with offset as ISO 8601.
    pub fn timestamp_format(mut self, format: fn(Timestamp, &TimeZone) -> String) -> Self {
        self.timestamp_format = Some(format);
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    time: String,
    level: Level,
    #[serde(serialize_with = "serialize_args")]
    msg: &'a fmt::Arguments<'a>,
}

fn serialize_args<S>(args: &fmt::Arguments, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(args)
}

fn default_timestamp_format(ts: Timestamp, tz: &TimeZone) -> String {
    let offset = tz.to_offset(ts);
    format!("{:.6}", ts.display_with_offset(offset))
}

impl Backend for Json {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        let ts = Timestamp::now();
        let time = match self.timestamp_format {
            Some(format) => format(ts, &self.tz),
            None => default_timestamp_format(ts, &self.tz),
        };

        let record_line = RecordLine {
            time,
            level,
            msg: &args,
        };

        let Ok(mut bytes) = serde_json::to_vec(&record_line) else {
            return;
        };
        bytes.push(b'\n');
        let _ = self.out.write_all(&bytes);
    }

    fn close(&mut self) -> Result<(), Error> {
        Backend::flush(self)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.out.flush().map_err(Error::from_io_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines() {
        let buf = SharedBuf::default();
        let mut backend = Json::default()
            .timestamp_format(|_, _| "2024-08-11T22:44:57.172051+08:00".to_string())
            .output(buf.clone());

        backend.debug("Hello debug world");
        backend.warn_fmt(format_args!("Hello {} \"quoted\" warn world", 3));
        backend.close().unwrap();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        insta::assert_snapshot!(written.trim_end(), @r#"
        {"time":"2024-08-11T22:44:57.172051+08:00","level":"DEBUG","msg":"Hello debug world"}
        {"time":"2024-08-11T22:44:57.172051+08:00","level":"WARN","msg":"Hello 3 \"quoted\" warn world"}
        "#);
    }

    #[test]
    fn test_configured_timezone_is_used() {
        let buf = SharedBuf::default();
        let mut backend = Json::default()
            .timezone(TimeZone::UTC)
            .output(buf.clone());

        backend.info("Hello info world");
        backend.flush().unwrap();

        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let value: serde_json::Value = serde_json::from_str(written.trim_end()).unwrap();
        let time = value["time"].as_str().unwrap();
        assert!(time.ends_with("+00:00"), "{time}");
        assert_eq!(value["level"], "INFO");
    }

    #[test]
    fn test_default_timestamp_is_iso8601() {
        let ts: Timestamp = "2024-08-11T14:44:57.172051Z".parse().unwrap();
        assert_eq!(
            default_timestamp_format(ts, &TimeZone::UTC),
            "2024-08-11T14:44:57.172051+00:00"
        );
    }
}
