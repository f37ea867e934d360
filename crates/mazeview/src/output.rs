use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mazeview_frame::{walls, FrameFormat, ParsedFrame, UNVISITED_DISTANCE};
use serde::Serialize;

use crate::monitor::{FrameSink, Status};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII maze diagram with status lines.
    Pretty,
    /// One table row per cell.
    Table,
    /// One JSON object per frame.
    Json,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    width: usize,
    height: usize,
    format: FrameFormat,
    /// Rows from row 0 upward.
    walls: Vec<&'a [u32]>,
    distances: Option<Vec<&'a [u32]>>,
    applied: usize,
    rejected: usize,
}

impl<'a> FrameOutput<'a> {
    fn new(frame: &'a ParsedFrame) -> Self {
        let dims = frame.dimensions();
        Self {
            width: dims.width,
            height: dims.height,
            format: frame.format,
            walls: frame.maze.rows().collect(),
            distances: frame.distances.as_ref().map(|d| d.rows().collect()),
            applied: frame.applied,
            rejected: frame.rejected.len(),
        }
    }
}

/// Status lines only appear in `pretty` output; other formats keep stdout
/// machine-readable.
pub fn print_status(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Pretty => println!("[mapper] {message}"),
        OutputFormat::Table | OutputFormat::Json => tracing::info!("{message}"),
    }
}

pub fn print_frame(frame: &ParsedFrame, format: OutputFormat) {
    match format {
        OutputFormat::Pretty => {
            let title = if frame.distances.is_some() {
                "--- MAZE MAP (with distances) ---"
            } else {
                "--- MAZE MAP ---"
            };
            println!();
            println!("{title}");
            println!();
            println!(
                "{}",
                mazeview_render::render(&frame.maze, frame.distances.as_ref())
            );
        }
        OutputFormat::Table => {
            println!("{}", frame_table(frame));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&FrameOutput::new(frame)).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

fn frame_table(frame: &ParsedFrame) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ROW", "COL", "WALLS", "DIST"]);

    for row in (0..frame.maze.height()).rev() {
        for col in 0..frame.maze.width() {
            let mask = frame.maze.get(row, col).copied().unwrap_or_default();
            let distance = frame
                .distances
                .as_ref()
                .and_then(|d| d.get(row, col).copied());
            table.add_row(vec![
                row.to_string(),
                col.to_string(),
                wall_letters(mask),
                distance_label(distance),
            ]);
        }
    }
    table
}

/// `NESW`-style wall summary, `-` when the cell has no walls.
pub fn wall_letters(mask: u32) -> String {
    let letters: String = [
        (walls::NORTH, 'N'),
        (walls::EAST, 'E'),
        (walls::SOUTH, 'S'),
        (walls::WEST, 'W'),
    ]
    .iter()
    .filter(|(bit, _)| mask & bit != 0)
    .map(|(_, letter)| *letter)
    .collect();

    if letters.is_empty() {
        "-".to_string()
    } else {
        letters
    }
}

fn distance_label(distance: Option<u32>) -> String {
    match distance {
        None => String::new(),
        Some(UNVISITED_DISTANCE) => "??".to_string(),
        Some(d) => d.to_string(),
    }
}

/// Prints monitor output to stdout in the selected format.
pub struct ConsolePrinter {
    format: OutputFormat,
}

impl ConsolePrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl FrameSink for ConsolePrinter {
    fn status(&mut self, status: Status) {
        let message = match status {
            Status::Receiving => "reading maze data...",
            Status::Drawing => "maze data received, drawing map...",
            Status::EmptyFrame => "header without data, nothing to draw",
            Status::Reconnected => "reconnected",
        };
        print_status(self.format, message);
    }

    fn frame(&mut self, frame: &ParsedFrame) {
        print_frame(frame, self.format);
    }
}
