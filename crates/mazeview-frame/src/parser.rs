use crate::error::TokenError;
use crate::format::FrameFormat;
use crate::grid::{DistanceGrid, MazeDimensions, MazeGrid};
use crate::token::parse_token;

/// Log target of per-token rejection warnings, so they can be filtered
/// apart from the rest of the frame diagnostics.
pub const TOKEN_LOG_TARGET: &str = "mazeview_frame::tokens";

/// Delimiter between tokens on one data line.
const TOKEN_DELIMITER: char = ',';

/// A token the parser skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub token: String,
    pub error: TokenError,
}

/// Grids built from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub format: FrameFormat,
    pub maze: MazeGrid,
    /// Only present for [`FrameFormat::Extended`].
    pub distances: Option<DistanceGrid>,
    /// Number of tokens written to the grids.
    pub applied: usize,
    pub rejected: Vec<Rejection>,
}

impl ParsedFrame {
    pub fn dimensions(&self) -> MazeDimensions {
        self.maze.dimensions()
    }
}

/// Turns the lines of one frame into grids.
///
/// Parsing is a pure function of the lines, the dimensions and the format.
/// Bad tokens are logged and skipped; they never stop the rest of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParser {
    dims: MazeDimensions,
    format: FrameFormat,
}

impl FrameParser {
    pub fn new(dims: MazeDimensions, format: FrameFormat) -> Self {
        Self { dims, format }
    }

    pub fn dimensions(&self) -> MazeDimensions {
        self.dims
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn parse<I, S>(&self, lines: I) -> ParsedFrame
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frame = ParsedFrame {
            format: self.format,
            maze: MazeGrid::new(self.dims),
            distances: self
                .format
                .has_distances()
                .then(|| DistanceGrid::new(self.dims)),
            applied: 0,
            rejected: Vec::new(),
        };

        for line in lines {
            for token in line.as_ref().trim().split(TOKEN_DELIMITER) {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }

                match self.apply_token(token, &mut frame) {
                    Ok(()) => frame.applied += 1,
                    Err(error) => {
                        tracing::warn!(
                            target: TOKEN_LOG_TARGET,
                            token,
                            %error,
                            "skipping maze token"
                        );
                        frame.rejected.push(Rejection {
                            token: token.to_string(),
                            error,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            applied = frame.applied,
            rejected = frame.rejected.len(),
            format = %self.format,
            "parsed maze frame"
        );
        frame
    }

    fn apply_token(&self, token: &str, frame: &mut ParsedFrame) -> Result<(), TokenError> {
        let update = parse_token(token, self.format)?;
        if !self.dims.contains(update.row, update.col) {
            return Err(TokenError::OutOfBounds {
                row: update.row,
                col: update.col,
                width: self.dims.width,
                height: self.dims.height,
            });
        }

        frame.maze.set(update.row, update.col, update.value.mask);
        if let (Some(distances), Some(distance)) =
            (frame.distances.as_mut(), update.value.distance)
        {
            distances.set(update.row, update.col, distance);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::UNVISITED_DISTANCE;

    fn basic() -> FrameParser {
        FrameParser::new(MazeDimensions::new(7, 4), FrameFormat::Basic)
    }

    fn extended() -> FrameParser {
        FrameParser::new(MazeDimensions::new(7, 4), FrameFormat::Extended)
    }

    fn non_zero_cells(grid: &MazeGrid) -> Vec<(usize, usize, u32)> {
        let mut cells = Vec::new();
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let value = *grid.get(row, col).unwrap();
                if value != 0 {
                    cells.push((row, col, value));
                }
            }
        }
        cells
    }

    #[test]
    fn single_token_sets_only_its_cell() {
        for (row, col, value) in [(0, 0, 9), (3, 6, 15), (2, 4, 1)] {
            let frame = basic().parse([format!("[{row}][{col}]:{value}")]);
            assert_eq!(non_zero_cells(&frame.maze), vec![(row, col, value)]);
            assert!(frame.rejected.is_empty());
            assert!(frame.distances.is_none());
        }
    }

    #[test]
    fn comma_joined_tokens_on_one_line() {
        let frame = basic().parse(["[0][0]:9,[0][1]:3"]);

        assert_eq!(frame.maze.get(0, 0), Some(&9));
        assert_eq!(frame.maze.get(0, 1), Some(&3));
        assert_eq!(non_zero_cells(&frame.maze).len(), 2);
        assert_eq!(frame.applied, 2);
    }

    #[test]
    fn extended_token_updates_both_grids() {
        let frame = extended().parse(["[3][6]:5:12"]);

        assert_eq!(frame.maze.get(3, 6), Some(&5));
        let distances = frame.distances.expect("extended frame has distances");
        assert_eq!(distances.get(3, 6), Some(&12));
        assert_eq!(distances.get(0, 0), Some(&0));
    }

    #[test]
    fn out_of_bounds_token_is_dropped_with_diagnostic() {
        let frame = basic().parse(["[4][0]:15,[0][7]:15"]);

        assert!(non_zero_cells(&frame.maze).is_empty());
        assert_eq!(frame.rejected.len(), 2);
        assert_eq!(
            frame.rejected[0].error,
            TokenError::OutOfBounds {
                row: 4,
                col: 0,
                width: 7,
                height: 4
            }
        );
        assert_eq!(frame.rejected[1].token, "[0][7]:15");
    }

    #[test]
    fn wrong_arity_in_extended_mode_writes_nothing() {
        let frame = extended().parse(["[1][1]:5"]);

        assert!(non_zero_cells(&frame.maze).is_empty());
        assert!(frame
            .distances
            .as_ref()
            .unwrap()
            .rows()
            .flatten()
            .all(|&d| d == 0));
        assert!(matches!(
            frame.rejected[0].error,
            TokenError::ValueArity {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn bad_distance_in_extended_mode_writes_nothing() {
        let frame = extended().parse(["[1][1]:5:x"]);

        assert_eq!(frame.applied, 0);
        assert!(non_zero_cells(&frame.maze).is_empty());
        assert!(frame
            .distances
            .as_ref()
            .unwrap()
            .rows()
            .flatten()
            .all(|&d| d == 0));
        assert!(matches!(
            frame.rejected[0].error,
            TokenError::InvalidNumber {
                field: "distance",
                ..
            }
        ));
    }

    #[test]
    fn bad_token_does_not_block_its_neighbours() {
        let frame = basic().parse(["[0][0]:9,garbage,[0][x]:1,[0][2]:6"]);

        assert_eq!(frame.maze.get(0, 0), Some(&9));
        assert_eq!(frame.maze.get(0, 2), Some(&6));
        assert_eq!(frame.applied, 2);
        let rejected: Vec<&str> = frame.rejected.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(rejected, vec!["garbage", "[0][x]:1"]);
    }

    #[test]
    fn controller_output_with_trailing_commas() {
        let lines = [
            "[3][0]:9:9999,[3][1]:1:9999,[3][2]:1:9999,[3][3]:1:9999,[3][4]:1:9999,[3][5]:1:9999,[3][6]:3:9999,",
            "[2][0]:8:3,[2][1]:0:2,[2][2]:0:1,[2][3]:0:0,[2][4]:0:1,[2][5]:0:2,[2][6]:2:3,",
            "[1][0]:8:4,[1][1]:0:3,[1][2]:0:2,[1][3]:0:1,[1][4]:0:2,[1][5]:0:3,[1][6]:2:4,",
            "[0][0]:12:5,[0][1]:4:4,[0][2]:4:3,[0][3]:4:2,[0][4]:4:3,[0][5]:4:4,[0][6]:6:5,",
        ];
        let frame = extended().parse(lines);

        assert!(frame.rejected.is_empty());
        assert_eq!(frame.applied, 28);
        assert_eq!(frame.maze.get(0, 0), Some(&12));
        assert_eq!(frame.maze.get(3, 6), Some(&3));
        let distances = frame.distances.unwrap();
        assert_eq!(distances.get(3, 0), Some(&UNVISITED_DISTANCE));
        assert_eq!(distances.get(2, 3), Some(&0));
    }

    #[test]
    fn later_token_overwrites_earlier_one() {
        let frame = basic().parse(["[1][1]:1", "[1][1]:4"]);
        assert_eq!(frame.maze.get(1, 1), Some(&4));
    }

    #[test]
    fn parsing_is_repeatable() {
        let parser = extended();
        let lines = ["[0][0]:15:0", "bad"];
        assert_eq!(parser.parse(lines), parser.parse(lines));
    }
}
