//! Line-oriented transport for maze telemetry.
//!
//! The micromouse controller prints its maze map as plain text lines over a
//! UART. This crate turns a byte stream into decoded, trimmed text lines:
//! - [`LineReader`] buffers any `Read` stream and splits it on `\n`
//! - [`SerialLineSource`] opens a serial port and polls it without blocking
//!
//! Everything above this layer only sees the [`LineSource`] trait.

pub mod error;
pub mod reader;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use reader::LineReader;
pub use serial::{SerialConfig, SerialLineSource, DEFAULT_BAUD_RATE};
pub use traits::{LineEvent, LineSource};
