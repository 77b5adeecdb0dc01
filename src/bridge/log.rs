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

use crate::Level;
use crate::Logger;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl Level {
    /// The most verbose [`log::LevelFilter`] that this level lets through.
    ///
    /// [`Level::Unknown`] maps to [`log::LevelFilter::Off`].
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Level::Unknown => log::LevelFilter::Off,
            Level::Error => log::LevelFilter::Error,
            Level::Warn => log::LevelFilter::Warn,
            Level::Info => log::LevelFilter::Info,
            Level::Debug => log::LevelFilter::Debug,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        Logger::log(self, record.level().into(), *record.args());
    }

    fn flush(&self) {
        let _ = Logger::flush(self);
    }
}

impl Logger {
    /// Install this logger as the global logger of the `log` crate.
    ///
    /// The `log` crate max level is set from the current threshold.
    ///
    /// # Errors
    ///
    /// Return an error if the `log` crate global logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::Level;
    ///
    /// let logger = logplug::builder().level(Level::Debug).build().unwrap();
    /// if logger.try_apply().is_ok() {
    ///     log::debug!("routed through logplug");
    /// }
    /// ```
    pub fn try_apply(self) -> Result<(), log::SetLoggerError> {
        let filter = self.level().to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    /// Install this logger as the global logger of the `log` crate.
    ///
    /// # Panics
    ///
    /// Panic if the `log` crate global logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("Logger::apply must be called before the global logger is initialized");
    }
}
