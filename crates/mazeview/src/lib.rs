//! Serial maze map visualizer for micromouse controllers.
//!
//! The controller prints its wall map (and flood-fill distances) as text
//! frames over a UART; mazeview collects those frames, parses them into
//! grids and draws the maze as ASCII art.
//!
//! # Crate Structure
//!
//! - [`transport`] — Line sources (serial port, any `Read` stream)
//! - [`frame`] — Frame collection and wire-token parsing
//! - [`render`] — ASCII maze rendering

/// Re-export transport types.
pub mod transport {
    pub use mazeview_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mazeview_frame::*;
}

/// Re-export render functions.
pub mod render {
    pub use mazeview_render::*;
}
