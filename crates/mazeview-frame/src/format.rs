use std::fmt;
use std::str::FromStr;

/// Substring that marks the start of a maze frame.
pub const HEADER_MARKER: &str = "Labyrinth Karte:";

/// Distance value the controller uses for cells the flood fill has not reached.
pub const UNVISITED_DISTANCE: u32 = 9999;

/// Shape of the value segment after `[row][col]:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// `[row][col]:mask`
    Basic,
    /// `[row][col]:mask:distance`
    #[default]
    Extended,
}

impl FrameFormat {
    /// Number of `:`-separated integers in the value segment.
    pub fn value_count(self) -> usize {
        match self {
            FrameFormat::Basic => 1,
            FrameFormat::Extended => 2,
        }
    }

    pub fn has_distances(self) -> bool {
        matches!(self, FrameFormat::Extended)
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameFormat::Basic => f.write_str("basic"),
            FrameFormat::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for FrameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FrameFormat::Basic),
            "extended" => Ok(FrameFormat::Extended),
            other => Err(format!("unknown frame format: {other}")),
        }
    }
}
