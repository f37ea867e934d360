//! Maze map frames as printed by the micromouse controller.
//!
//! A frame starts with a `Labyrinth Karte:` header line, followed by data
//! lines of comma-separated cell tokens, and ends at the first empty or
//! non-data line:
//!
//! ```text
//! Labyrinth Karte:
//! [3][0]:9:4,[3][1]:1:3,[3][2]:3:9999,
//! ...
//! [0][0]:14:7,[0][1]:4:6,[0][2]:6:5,
//!
//! ```
//!
//! [`FrameCollector`] groups incoming lines into frames, [`FrameParser`]
//! turns a frame into a [`MazeGrid`] and, for the extended format, a
//! [`DistanceGrid`].

pub mod collector;
pub mod error;
pub mod format;
pub mod grid;
pub mod parser;
pub mod token;

pub use collector::{classify, CollectorState, FrameCollector, FrameEvent, LineKind};
pub use error::{Result, TokenError};
pub use format::{FrameFormat, HEADER_MARKER, UNVISITED_DISTANCE};
pub use grid::{walls, DistanceGrid, Grid, MazeDimensions, MazeGrid, MAX_SIDE};
pub use parser::{FrameParser, ParsedFrame, Rejection, TOKEN_LOG_TARGET};
pub use token::{decode_value, parse_token, scan_token, CellUpdate, CellValue, RawToken};
