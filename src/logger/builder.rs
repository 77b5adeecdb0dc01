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

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::backend::BackendImpl;
use crate::backend::BackendKind;
use crate::backend::Text;
use crate::logger::log_impl::State;

/// Create a new [`LoggerBuilder`] writing to the terminal at [`Level::Info`].
///
/// # Examples
///
/// ```
/// use logplug::Level;
///
/// let logger = logplug::builder().level(Level::Warn).build().unwrap();
/// logger.info("filtered out");
/// logger.warn("printed to stderr");
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}

/// Create a new [`LoggerBuilder`] whose backend is selected by identifier.
///
/// The identifier is one of `devnull`, `console`, `json` or `syslog`, in any case. It is resolved
/// when the logger is [built](LoggerBuilder::build).
///
/// # Examples
///
/// ```
/// let logger = logplug::builder_from_id("json").build().unwrap();
/// logger.info("Hello info world");
///
/// let err = logplug::builder_from_id("not_a_real_backend").build().unwrap_err();
/// assert_eq!(err.kind(), logplug::ErrorKind::Config);
/// ```
pub fn builder_from_id(id: impl Into<String>) -> LoggerBuilder {
    LoggerBuilder::from_id(id)
}

/// One configuration step applied while building a [`Logger`].
#[derive(Debug)]
pub enum Config {
    /// Set the level threshold. Fails if the level is [`Level::Unknown`].
    Level(Level),
    /// Replace the backend.
    Backend(BackendImpl),
    /// Use another logger as the backend and adopt its current level threshold.
    InheritFrom(Logger),
}

impl Config {
    fn apply(self, state: &mut State) -> Result<(), Error> {
        match self {
            Config::Level(level) => {
                if !level.is_valid() {
                    return Err(Error::config("unknown log level provided")
                        .with_context("level", level));
                }
                state.level = level;
            }
            Config::Backend(backend) => {
                state.backend = backend;
            }
            Config::InheritFrom(logger) => {
                state.level = logger.level();
                state.backend = BackendImpl::custom(logger);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Base {
    Default,
    Id(String),
}

impl Base {
    fn resolve(self) -> Result<BackendImpl, Error> {
        match self {
            Base::Default => Ok(Text::default().into()),
            Base::Id(id) => {
                let kind = BackendKind::parse(&id);
                if !kind.is_valid() {
                    return Err(Error::config("unable to find backend implementation")
                        .with_context("id", id));
                }
                BackendImpl::from_kind(kind).map_err(|err| err.with_context("id", id))
            }
        }
    }
}

/// A builder for configuring a [`Logger`].
///
/// Configuration steps are applied in the order they are added. The first failing step aborts
/// the build.
///
/// # Examples
///
/// ```
/// use logplug::Level;
/// use logplug::backend::DevNull;
///
/// let inner = logplug::builder().level(Level::Debug).build().unwrap();
/// let outer = logplug::builder().inherit_from(inner).build().unwrap();
/// assert_eq!(outer.level(), Level::Debug);
///
/// let logger = logplug::builder()
///     .backend(DevNull)
///     .level(Level::Error)
///     .build()
///     .unwrap();
/// assert_eq!(logger.level(), Level::Error);
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    base: Base,
    configs: Vec<Config>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new builder with the terminal backend. See [`builder`].
    pub fn new() -> Self {
        Self {
            base: Base::Default,
            configs: vec![],
        }
    }

    /// Create a new builder with the backend named by `id`. See [`builder_from_id`].
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            base: Base::Id(id.into()),
            configs: vec![],
        }
    }

    /// Add a configuration step.
    pub fn config(mut self, config: Config) -> Self {
        self.configs.push(config);
        self
    }

    /// Add all the configuration steps, in order.
    pub fn configs(mut self, configs: impl IntoIterator<Item = Config>) -> Self {
        self.configs.extend(configs);
        self
    }

    /// Set the level threshold. Default to [`Level::Info`].
    pub fn level(self, level: Level) -> Self {
        self.config(Config::Level(level))
    }

    /// Replace the backend.
    ///
    /// The backend is installed as is, even if it wraps another [`Logger`]; use
    /// [`inherit_from`](LoggerBuilder::inherit_from) to also adopt that logger's level.
    pub fn backend(self, backend: impl Into<BackendImpl>) -> Self {
        self.config(Config::Backend(backend.into()))
    }

    /// Use `logger` as the backend and adopt its current level threshold.
    pub fn inherit_from(self, logger: Logger) -> Self {
        self.config(Config::InheritFrom(logger))
    }

    /// Build the [`Logger`].
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Config`](crate::ErrorKind::Config) error if the backend identifier
    /// is unknown or a configuration step fails, or an [`ErrorKind::Io`](crate::ErrorKind::Io)
    /// error if the selected backend cannot be opened.
    pub fn build(self) -> Result<Logger, Error> {
        let mut state = State {
            backend: self.base.resolve()?,
            level: Level::Info,
        };

        self.configs
            .into_iter()
            .try_for_each(|config| config.apply(&mut state))?;

        Ok(Logger::new(state))
    }
}
