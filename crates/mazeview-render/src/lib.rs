//! ASCII rendering of maze maps.
//!
//! Every cell occupies a 4x2 block on a fixed grid of `o` corners:
//!
//! ```text
//! o---o---o
//! | 1   0 |
//! o   o---o
//! | 2  ?? |
//! o---o---o
//! ```
//!
//! Row 0 is printed last so cell `[0][0]` sits at the bottom-left, matching
//! the controller's coordinate system.

use mazeview_frame::{walls, DistanceGrid, MazeGrid, UNVISITED_DISTANCE};

/// Corner glyph between wall segments.
pub const CORNER: char = 'o';
/// Horizontal wall segment, one cell wide.
pub const HORIZONTAL_WALL: &str = "---";
/// Horizontal gap, one cell wide.
pub const HORIZONTAL_OPEN: &str = "   ";
pub const VERTICAL_WALL: char = '|';
pub const VERTICAL_OPEN: char = ' ';

/// Interior shown for an unvisited cell.
const UNVISITED_INTERIOR: &str = "?? ";
/// Interior shown for a distance too wide for the cell.
const OVERFLOW_INTERIOR: &str = "+++";
const EMPTY_INTERIOR: &str = "   ";

/// Render the maze as a multi-line string (no trailing newline).
pub fn render(maze: &MazeGrid, distances: Option<&DistanceGrid>) -> String {
    render_lines(maze, distances).join("\n")
}

/// Render the maze, one output line per element.
///
/// Each cell trusts its own bitmask. The only merge is the vertical boundary
/// between two neighbours, drawn when either side reports it.
pub fn render_lines(maze: &MazeGrid, distances: Option<&DistanceGrid>) -> Vec<String> {
    let (width, height) = (maze.width(), maze.height());
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let distances = distances.filter(|d| {
        let matches = d.dimensions() == maze.dimensions();
        if !matches {
            tracing::warn!(
                maze = ?maze.dimensions(),
                distances = ?d.dimensions(),
                "distance grid does not match maze, rendering walls only"
            );
        }
        matches
    });

    let mut lines = Vec::with_capacity(height * 2 + 1);
    for row in (0..height).rev() {
        lines.push(wall_line(maze, row, walls::NORTH));
        lines.push(content_line(maze, distances, row));
    }
    lines.push(wall_line(maze, 0, walls::SOUTH));
    lines
}

fn wall_line(maze: &MazeGrid, row: usize, wall: u32) -> String {
    let mut line = String::with_capacity(1 + maze.width() * 4);
    line.push(CORNER);
    for col in 0..maze.width() {
        line.push_str(if maze.has_wall(row, col, wall) {
            HORIZONTAL_WALL
        } else {
            HORIZONTAL_OPEN
        });
        line.push(CORNER);
    }
    line
}

fn content_line(maze: &MazeGrid, distances: Option<&DistanceGrid>, row: usize) -> String {
    let width = maze.width();
    let mut line = String::with_capacity(1 + width * 4);
    line.push(vertical(maze.has_wall(row, 0, walls::WEST)));

    for col in 0..width {
        match distances {
            Some(grid) => line.push_str(&cell_interior(grid.get(row, col).copied())),
            None => line.push_str(EMPTY_INTERIOR),
        }

        let boundary = maze.has_wall(row, col, walls::EAST)
            || (col + 1 < width && maze.has_wall(row, col + 1, walls::WEST));
        line.push(vertical(boundary));
    }
    line
}

fn vertical(present: bool) -> char {
    if present {
        VERTICAL_WALL
    } else {
        VERTICAL_OPEN
    }
}

/// Three-character interior for a cell's distance.
///
/// Values are right-justified in two characters plus a spacer; a third
/// digit takes the spacer.
pub fn cell_interior(distance: Option<u32>) -> String {
    match distance {
        None => EMPTY_INTERIOR.to_string(),
        Some(UNVISITED_DISTANCE) => UNVISITED_INTERIOR.to_string(),
        Some(d) if d <= 999 => format!("{:<3}", format!("{d:>2}")),
        Some(_) => OVERFLOW_INTERIOR.to_string(),
    }
}
