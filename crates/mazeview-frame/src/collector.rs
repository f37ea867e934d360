use crate::format::HEADER_MARKER;

/// Role of one incoming line in the framing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Contains the header marker; opens a frame.
    Header,
    /// Contains `[` and `]:`; carries cell tokens.
    Data,
    /// Anything else, including an empty line; closes an open frame.
    Terminator,
}

/// Classify a line. The header check wins over the data check.
pub fn classify(line: &str) -> LineKind {
    if line.contains(HEADER_MARKER) {
        LineKind::Header
    } else if line.contains('[') && line.contains("]:") {
        LineKind::Data
    } else {
        LineKind::Terminator
    }
}

/// Collector state: either waiting for a header or buffering a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollectorState {
    #[default]
    Idle,
    Collecting(Vec<String>),
}

/// Transitions reported by [`FrameCollector::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A header opened a new frame.
    Started,
    /// A header arrived mid-frame; the partial frame was dropped.
    Restarted { discarded: usize },
    /// A frame closed with at least one data line.
    Complete(Vec<String>),
    /// A frame closed without any data lines.
    Empty,
}

/// Groups lines into frames.
///
/// ```text
/// Idle --header--> Collecting([])
/// Collecting(buf) --data--> Collecting(buf + line)
/// Collecting(buf) --header--> Collecting([])        (Restarted)
/// Collecting(buf) --terminator--> Idle              (Complete / Empty)
/// Idle --data | terminator--> Idle                  (ignored)
/// ```
#[derive(Debug, Default)]
pub struct FrameCollector {
    state: CollectorState,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CollectorState {
        &self.state
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, CollectorState::Collecting(_))
    }

    /// Feed one trimmed line.
    pub fn push(&mut self, line: &str) -> Option<FrameEvent> {
        let line = line.trim();
        let kind = classify(line);

        match (std::mem::take(&mut self.state), kind) {
            (CollectorState::Idle, LineKind::Header) => {
                self.state = CollectorState::Collecting(Vec::new());
                Some(FrameEvent::Started)
            }
            (CollectorState::Collecting(buffer), LineKind::Header) => {
                self.state = CollectorState::Collecting(Vec::new());
                if buffer.is_empty() {
                    Some(FrameEvent::Started)
                } else {
                    Some(FrameEvent::Restarted {
                        discarded: buffer.len(),
                    })
                }
            }
            (CollectorState::Collecting(mut buffer), LineKind::Data) => {
                buffer.push(line.to_string());
                self.state = CollectorState::Collecting(buffer);
                None
            }
            (CollectorState::Collecting(buffer), LineKind::Terminator) => Some(close(buffer)),
            (CollectorState::Idle, LineKind::Data | LineKind::Terminator) => None,
        }
    }

    /// End of input: close a frame that never saw its terminator.
    pub fn finish(&mut self) -> Option<FrameEvent> {
        match std::mem::take(&mut self.state) {
            CollectorState::Collecting(buffer) => Some(close(buffer)),
            CollectorState::Idle => None,
        }
    }

    /// Drop any partial frame. Returns the number of discarded lines.
    pub fn reset(&mut self) -> usize {
        match std::mem::take(&mut self.state) {
            CollectorState::Collecting(buffer) => buffer.len(),
            CollectorState::Idle => 0,
        }
    }
}

fn close(buffer: Vec<String>) -> FrameEvent {
    if buffer.is_empty() {
        FrameEvent::Empty
    } else {
        FrameEvent::Complete(buffer)
    }
}
