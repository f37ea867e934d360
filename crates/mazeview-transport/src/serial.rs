use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::error::{Result, TransportError};
use crate::reader::{Fill, LineReader};
use crate::traits::{LineEvent, LineSource};

/// Baud rate of the controller's debug UART.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial port settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port identifier (e.g. `/dev/ttyUSB0`, `COM4`).
    pub path: String,
    pub baud_rate: u32,
    /// Upper bound on a single blocking read.
    pub read_timeout: Duration,
}

impl SerialConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// Line source backed by a serial port (8N1, no flow control).
///
/// Only reads when the driver reports waiting bytes, so a poll never sits
/// in the read timeout while the controller is quiet. The port is closed
/// when the source is dropped.
pub struct SerialLineSource {
    reader: LineReader<Box<dyn SerialPort>>,
    path: String,
}

impl SerialLineSource {
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: config.path.clone(),
                source,
            })?;

        tracing::info!(
            path = %config.path,
            baud = config.baud_rate,
            "opened serial port"
        );

        Ok(Self {
            reader: LineReader::new(port),
            path: config.path.clone(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl LineSource for SerialLineSource {
    fn poll_line(&mut self) -> Result<LineEvent> {
        if let Some(line) = self.reader.next_buffered_line() {
            return Ok(LineEvent::Line(line));
        }

        if self.reader.get_ref().bytes_to_read()? == 0 {
            return Ok(LineEvent::Idle);
        }

        // A zero-byte read on a tty is a quiet line, not end of input.
        match self.reader.fill()? {
            Fill::Data(_) => Ok(self
                .reader
                .next_buffered_line()
                .map_or(LineEvent::Idle, LineEvent::Line)),
            Fill::Pending | Fill::Eof => Ok(LineEvent::Idle),
        }
    }
}

impl Drop for SerialLineSource {
    fn drop(&mut self) {
        tracing::info!(path = %self.path, "serial port closed");
    }
}

impl std::fmt::Debug for SerialLineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLineSource")
            .field("path", &self.path)
            .field("buffered", &self.reader.buffered_len())
            .finish()
    }
}
