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

//! Logplug is a small logging facade with swappable backends.
//!
//! # Overview
//!
//! A [`Logger`] filters messages by [`Level`] and forwards the rest to exactly one [`Backend`]:
//! nowhere ([`DevNull`](backend::DevNull)), the terminal ([`Text`](backend::Text)), JSON lines
//! ([`Json`](backend::Json)) or the system log ([`Syslog`](backend::Syslog)). Any type
//! implementing [`Backend`] can be plugged in as well, including another [`Logger`].
//!
//! Loggers are safe to share between threads; each message reaches the backend whole.
//!
//! # Examples
//!
//! Terminal output at the default info level:
//!
//! ```
//! let logger = logplug::builder().build().unwrap();
//!
//! logger.info("Hello info world");
//! logplug::warn!(logger, "Hello {} warnf world", 3);
//! logger.debug("filtered out");
//! ```
//!
//! Select the backend by identifier, for example from a configuration file:
//!
//! ```
//! use logplug::Level;
//!
//! let logger = logplug::builder_from_id("json")
//!     .level(Level::Debug)
//!     .build()
//!     .unwrap();
//!
//! logger.debug("Hello debug world");
//! logger.close().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod backend;
pub use backend::Backend;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod level;
pub use level::Level;

mod logger;
pub use logger::*;

mod macros;

#[cfg(feature = "bridge-log")]
mod bridge;
