use crate::error::Result;

/// Outcome of a single poll on a [`LineSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete, trimmed line (may be empty).
    Line(String),
    /// No complete line is buffered yet.
    Idle,
    /// The source reached end of input and will not produce more lines.
    Closed,
}

/// A polled source of decoded text lines.
///
/// Implementations never block longer than their configured read timeout.
/// An `Err` means the transport was lost; callers decide whether to reopen.
pub trait LineSource {
    fn poll_line(&mut self) -> Result<LineEvent>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn poll_line(&mut self) -> Result<LineEvent> {
        (**self).poll_line()
    }
}
