//! TCP transport and token-based remote log sink
//!
//! Lines are written over a plain TCP connection, one event per line,
//! prefixed with the account token. The connection is opened on first use
//! and reopened once if a write fails.

use crate::core::{ChainError, LogSink, Meta, Result, Severity};
use parking_lot::Mutex;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

/// Default ingestion endpoint for token-based TCP logging
pub const DEFAULT_LOGS_ENDPOINT: &str = "data.logentries.com:80";

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Lazily connected TCP stream
pub struct TcpTransport {
    address: String,
    stream: Mutex<Option<TcpStream>>,
    reconnect_on_error: bool,
}

impl TcpTransport {
    /// No connection is attempted until the first write
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stream: Mutex::new(None),
            reconnect_on_error: true,
        }
    }

    /// Enable or disable one reconnect attempt after a failed write
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect(&self) -> Result<TcpStream> {
        let stream = TcpStream::connect(&self.address)?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Write the whole buffer, connecting first if needed
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.stream.lock();

        if guard.is_none() {
            *guard = Some(self.connect()?);
        }

        let result = match guard.as_mut() {
            Some(stream) => stream.write_all(bytes).and_then(|()| stream.flush()),
            None => return Err(ChainError::sink(&self.address, "stream not connected")),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection lost
                *guard = None;

                if !self.reconnect_on_error {
                    return Err(e.into());
                }
                match self.connect() {
                    Ok(mut stream) => {
                        stream.write_all(bytes)?;
                        *guard = Some(stream);
                        Ok(())
                    }
                    Err(reconnect_err) => Err(ChainError::sink(
                        &self.address,
                        format!("write failed: {} (reconnect: {})", e, reconnect_err),
                    )),
                }
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.lock().is_some()
    }
}

/// Ships `<token> <json>` lines to a remote collector
pub struct TcpLogSink {
    token: String,
    transport: TcpTransport,
}

impl TcpLogSink {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            transport: TcpTransport::new(address),
        }
    }

    pub fn with_transport(transport: TcpTransport, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            transport,
        }
    }

    pub fn transport(&self) -> &TcpTransport {
        &self.transport
    }

    /// The wire line, newline included
    pub fn format_line(&self, level: Severity, text: &str, meta: &Meta) -> Result<String> {
        let mut body = serde_json::Map::new();
        body.insert("level".to_string(), serde_json::Value::String(level.to_string()));
        body.insert("message".to_string(), serde_json::Value::String(text.to_string()));
        for (key, value) in meta.fields() {
            body.insert(key.clone(), serde_json::to_value(value)?);
        }
        let json = serde_json::to_string(&serde_json::Value::Object(body))?;
        Ok(format!("{} {}\n", self.token, json))
    }
}

impl LogSink for TcpLogSink {
    fn deliver(&self, level: Severity, text: &str, meta: &Meta) -> Result<()> {
        let line = self.format_line(level, text, meta)?;
        self.transport.send(line.as_bytes())
    }

    fn name(&self) -> &str {
        "tcp"
    }
}
