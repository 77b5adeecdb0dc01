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

//! Backend for writing log messages to syslog.
//!
//! # Examples
//!
//!```rust, no_run
//! use logplug::backend::syslog::SyslogBuilder;
//! use logplug::backend::syslog::SyslogTransport;
//!
//! let syslog = SyslogBuilder::new(SyslogTransport::udp_well_known())
//!     .tag("my-daemon")
//!     .connect()
//!     .unwrap();
//!
//! let logger = logplug::builder().backend(syslog).build().unwrap();
//! logger.info("This log will be written to syslog.");
//! logger.close().unwrap();
//! ```

use std::fmt;
use std::io;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;

use fasyslog::SDElement;
use fasyslog::sender::SyslogSender;

use crate::Error;
use crate::ErrorKind;
use crate::Level;
use crate::backend::Backend;

// re-exports to avoid version conflicts
mod exported {
    pub use fasyslog::Facility;
    pub use fasyslog::format::SyslogContext;
}
pub use exported::*;

/// The format of the syslog message.
#[derive(Debug, Copy, Clone, Default)]
pub enum SyslogFormat {
    /// [RFC 3164] (BSD syslog Protocol)
    ///
    /// [RFC 3164]: https://datatracker.ietf.org/doc/html/rfc3164
    #[default]
    RFC3164,
    /// [RFC 5424] (The Syslog Protocol)
    ///
    /// [RFC 5424]: https://datatracker.ietf.org/doc/html/rfc5424
    RFC5424,
}

/// Where the syslog messages are sent.
///
/// The transport is kept by the [`Syslog`] backend so that it can reconnect after a failed write.
#[derive(Debug, Clone)]
pub enum SyslogTransport {
    /// The local syslog daemon socket, probing `/dev/log`, `/var/run/syslog` and `/var/run/log`.
    #[cfg(unix)]
    Local,
    /// A unix socket at the given path.
    #[cfg(unix)]
    Unix(PathBuf),
    /// A TCP connection to the given address.
    Tcp(SocketAddr),
    /// A UDP socket bound to `local` and connected to `remote`.
    Udp {
        /// The local address to bind.
        local: SocketAddr,
        /// The address of the syslog server.
        remote: SocketAddr,
    },
}

#[cfg(unix)]
const LOCAL_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

impl SyslogTransport {
    /// Send messages to the well-known TCP port (514) on localhost.
    pub fn tcp_well_known() -> Self {
        SyslogTransport::Tcp(SocketAddr::from(([127, 0, 0, 1], 514)))
    }

    /// Send messages to the well-known UDP port (514) on localhost.
    pub fn udp_well_known() -> Self {
        SyslogTransport::Udp {
            local: SocketAddr::from(([0, 0, 0, 0], 0)),
            remote: SocketAddr::from(([127, 0, 0, 1], 514)),
        }
    }

    fn connect(&self) -> io::Result<SyslogSender> {
        match self {
            #[cfg(unix)]
            SyslogTransport::Local => {
                let mut last_error = None;
                for path in LOCAL_SOCKETS {
                    match fasyslog::sender::unix(path) {
                        Ok(sender) => return Ok(sender),
                        Err(err) => last_error = Some(err),
                    }
                }
                Err(last_error.unwrap_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "no local syslog socket")
                }))
            }
            #[cfg(unix)]
            SyslogTransport::Unix(path) => fasyslog::sender::unix(path),
            SyslogTransport::Tcp(addr) => fasyslog::sender::tcp(addr).map(SyslogSender::Tcp),
            SyslogTransport::Udp { local, remote } => {
                fasyslog::sender::udp(local, remote).map(SyslogSender::Udp)
            }
        }
    }
}

impl Default for SyslogTransport {
    #[cfg(unix)]
    fn default() -> Self {
        SyslogTransport::Local
    }

    #[cfg(not(unix))]
    fn default() -> Self {
        SyslogTransport::udp_well_known()
    }
}

/// A builder for the [`Syslog`] backend.
///
/// Defaults to the local syslog daemon, the `USER` facility, RFC 3164 formatting, and the
/// executable name as tag.
#[derive(Debug, Default)]
pub struct SyslogBuilder {
    transport: SyslogTransport,
    format: SyslogFormat,
    context: SyslogContext,
}

impl SyslogBuilder {
    /// Create a new builder sending to `transport`.
    pub fn new(transport: SyslogTransport) -> Self {
        Self {
            transport,
            format: SyslogFormat::default(),
            context: SyslogContext::default(),
        }
    }

    /// Set the program identifier attached to each message.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.context.appname(tag);
        self
    }

    /// Set the facility of the messages.
    pub fn facility(mut self, facility: Facility) -> Self {
        self.context.facility(facility);
        self
    }

    /// Set the format of the messages.
    pub fn format(mut self, format: SyslogFormat) -> Self {
        self.format = format;
        self
    }

    /// Open the connection and build the backend.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`] error if the connection cannot be opened.
    pub fn connect(self) -> Result<Syslog, Error> {
        let sender = self.transport.connect().map_err(|err| {
            Error::from_io_error(err).with_context("transport", format!("{:?}", self.transport))
        })?;

        Ok(Syslog {
            transport: self.transport,
            format: self.format,
            context: self.context,
            connection: Connection::Connected(sender),
        })
    }
}

#[derive(Debug)]
enum Connection {
    Connected(SyslogSender),
    // the last write failed and so did the reconnect
    Broken(io::Error),
    Closed,
}

/// A backend that writes log messages to syslog.
///
/// A failed write triggers one reconnect attempt. If that fails too, the message is dropped and
/// the next write tries to reconnect again. Log calls never report errors; only
/// [`close`](Backend::close) does.
#[derive(Debug)]
pub struct Syslog {
    transport: SyslogTransport,
    format: SyslogFormat,
    context: SyslogContext,
    connection: Connection,
}

impl Syslog {
    /// Connect to the local syslog daemon with default settings.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`] error if the connection cannot be opened.
    pub fn local() -> Result<Syslog, Error> {
        SyslogBuilder::default().connect()
    }

    fn format_message(&self, level: Level, args: fmt::Arguments<'_>) -> String {
        let severity = level_to_severity(level);
        match self.format {
            SyslogFormat::RFC3164 => {
                format!("{}", self.context.format_rfc3164(severity, Some(args)))
            }
            SyslogFormat::RFC5424 => {
                const EMPTY_MSGID: Option<&str> = None;
                const EMPTY_STRUCTURED_DATA: Vec<SDElement> = Vec::new();

                format!(
                    "{}",
                    self.context.format_rfc5424(
                        severity,
                        EMPTY_MSGID,
                        EMPTY_STRUCTURED_DATA,
                        Some(args)
                    )
                )
            }
        }
    }

    fn reconnect(&mut self) {
        self.connection = match self.transport.connect() {
            Ok(sender) => Connection::Connected(sender),
            Err(err) => Connection::Broken(err),
        };
    }
}

fn level_to_severity(level: Level) -> fasyslog::Severity {
    match level {
        Level::Error => fasyslog::Severity::ERROR,
        Level::Warn => fasyslog::Severity::WARNING,
        Level::Info => fasyslog::Severity::INFORMATIONAL,
        Level::Debug | Level::Unknown => fasyslog::Severity::DEBUG,
    }
}

impl Backend for Syslog {
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if matches!(self.connection, Connection::Closed) {
            return;
        }
        if matches!(self.connection, Connection::Broken(_)) {
            self.reconnect();
        }

        let message = self.format_message(level, args);
        let Connection::Connected(sender) = &mut self.connection else {
            return;
        };
        if sender.send_formatted(message.as_bytes()).is_err() {
            self.reconnect();
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        match std::mem::replace(&mut self.connection, Connection::Closed) {
            Connection::Connected(mut sender) => sender.flush().map_err(Error::from_io_error),
            Connection::Broken(err) => {
                Err(Error::new(ErrorKind::Io, "syslog connection is broken").with_source(err))
            }
            Connection::Closed => Err(Error::new(
                ErrorKind::Io,
                "syslog connection is already closed",
            )),
        }
    }

    fn flush(&mut self) -> Result<(), Error> {
        match &mut self.connection {
            Connection::Connected(sender) => sender.flush().map_err(Error::from_io_error),
            Connection::Broken(_) | Connection::Closed => Ok(()),
        }
    }
}
