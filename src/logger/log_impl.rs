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
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Backend;
use crate::Error;
use crate::Level;
use crate::backend::BackendImpl;

/// A logger facade that filters messages by level and forwards them to one backend.
///
/// All operations take the same lock, held across the level check and the backend call. A
/// `Logger` can thus be shared between threads, and messages sent through it never interleave.
///
/// Build one with [`builder`](crate::builder) or [`builder_from_id`](crate::builder_from_id).
///
/// # Examples
///
/// ```
/// use logplug::Level;
///
/// let logger = logplug::builder_from_id("devnull")
///     .level(Level::Debug)
///     .build()
///     .unwrap();
///
/// logger.debug("Hello debug world");
/// logplug::info!(logger, "Hello {} infof world", 2);
/// logger.close().unwrap();
/// ```
#[derive(Debug)]
pub struct Logger {
    state: Mutex<State>,
}

#[derive(Debug)]
pub(super) struct State {
    pub(super) backend: BackendImpl,
    pub(super) level: Level,
}

impl State {
    fn enabled(&self, level: Level) -> bool {
        level.is_valid() && level <= self.level
    }
}

impl Logger {
    pub(super) fn new(state: State) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // the guard lives until `forward` returns, including when the level check fails
    fn dispatch<F>(&self, level: Level, forward: F)
    where
        F: FnOnce(&mut BackendImpl),
    {
        let mut state = self.state();
        if !state.enabled(level) {
            return;
        }
        forward(&mut state.backend);
    }

    /// The current level threshold.
    pub fn level(&self) -> Level {
        self.state().level
    }

    /// Whether a message at `level` would be forwarded to the backend.
    pub fn enabled(&self, level: Level) -> bool {
        self.state().enabled(level)
    }

    /// Replace the active backend, returning the previous one.
    ///
    /// The previous backend is not closed. Call [`Backend::close`] on it if it holds resources.
    ///
    /// # Examples
    ///
    /// ```
    /// use logplug::Backend;
    /// use logplug::backend::DevNull;
    /// use logplug::backend::Json;
    ///
    /// let logger = logplug::builder().backend(DevNull).build().unwrap();
    /// let mut previous = logger.replace_backend(Json::default());
    /// previous.close().unwrap();
    /// ```
    pub fn replace_backend(&self, backend: impl Into<BackendImpl>) -> BackendImpl {
        let mut state = self.state();
        std::mem::replace(&mut state.backend, backend.into())
    }

    /// Log a message at `level`.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.dispatch(level, |backend| backend.log(level, args));
    }

    /// Log a message at the debug level.
    pub fn debug(&self, msg: &str) {
        self.dispatch(Level::Debug, |backend| backend.debug(msg));
    }

    /// Log a formatted message at the debug level. See also [`debug!`](crate::debug!).
    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Debug, |backend| backend.debug_fmt(args));
    }

    /// Log a message at the info level.
    pub fn info(&self, msg: &str) {
        self.dispatch(Level::Info, |backend| backend.info(msg));
    }

    /// Log a formatted message at the info level. See also [`info!`](crate::info!).
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Info, |backend| backend.info_fmt(args));
    }

    /// Log a message at the warn level.
    pub fn warn(&self, msg: &str) {
        self.dispatch(Level::Warn, |backend| backend.warn(msg));
    }

    /// Log a formatted message at the warn level. See also [`warn!`](crate::warn!).
    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Warn, |backend| backend.warn_fmt(args));
    }

    /// Log a message at the error level.
    pub fn error(&self, msg: &str) {
        self.dispatch(Level::Error, |backend| backend.error(msg));
    }

    /// Log a formatted message at the error level. See also [`error!`](crate::error!).
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.dispatch(Level::Error, |backend| backend.error_fmt(args));
    }

    /// Close the backend, releasing the resources it holds.
    ///
    /// # Errors
    ///
    /// Return whatever error the backend reports, unchanged.
    pub fn close(&self) -> Result<(), Error> {
        self.state().backend.close()
    }

    /// Flush any output buffered by the backend.
    ///
    /// # Errors
    ///
    /// Return whatever error the backend reports, unchanged.
    pub fn flush(&self) -> Result<(), Error> {
        self.state().backend.flush()
    }
}

// lets a logger be nested as the backend of another logger
impl Backend for Logger {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        Logger::log(self, level, args);
    }

    fn close(&mut self) -> Result<(), Error> {
        Logger::close(self)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Logger::flush(self)
    }

    fn debug(&mut self, msg: &str) {
        Logger::debug(self, msg);
    }

    fn debug_fmt(&mut self, args: fmt::Arguments<'_>) {
        Logger::debug_fmt(self, args);
    }

    fn info(&mut self, msg: &str) {
        Logger::info(self, msg);
    }

    fn info_fmt(&mut self, args: fmt::Arguments<'_>) {
        Logger::info_fmt(self, args);
    }

    fn warn(&mut self, msg: &str) {
        Logger::warn(self, msg);
    }

    fn warn_fmt(&mut self, args: fmt::Arguments<'_>) {
        Logger::warn_fmt(self, args);
    }

    fn error(&mut self, msg: &str) {
        Logger::error(self, msg);
    }

    fn error_fmt(&mut self, args: fmt::Arguments<'_>) {
        Logger::error_fmt(self, args);
    }
}
