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

use std::fmt::Arguments;

use crate::Error;
use crate::Level;
use crate::backend::Backend;

/// A backend that discards every message.
///
/// Useful to silence output entirely without touching call sites.
///
/// # Examples
///
/// ```
/// use logplug::backend::DevNull;
///
/// let logger = logplug::builder().backend(DevNull).build().unwrap();
/// logger.error("nobody will ever read this");
/// logger.close().unwrap();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DevNull;

impl Backend for DevNull {
    fn log(&mut self, _: Level, _: Arguments<'_>) {}

    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
