use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use mazeview_frame::{FrameFormat, FrameParser, MazeDimensions, MAX_SIDE};
use mazeview_transport::DEFAULT_BAUD_RATE;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod replay;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch a serial port and draw every maze map the controller prints.
    Watch(WatchArgs),
    /// Draw the maze maps found in a captured serial log.
    Replay(ReplayArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Replay(args) => replay::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FrameFormatArg {
    /// `[row][col]:mask`
    Basic,
    /// `[row][col]:mask:distance`
    Extended,
}

impl FrameFormatArg {
    pub fn as_format(self) -> FrameFormat {
        match self {
            FrameFormatArg::Basic => FrameFormat::Basic,
            FrameFormatArg::Extended => FrameFormat::Extended,
        }
    }
}

/// Maze geometry and wire format, shared by every command that parses frames.
#[derive(Args, Debug, Clone)]
pub struct MazeArgs {
    /// Maze width in cells.
    #[arg(long, env = "MAZEVIEW_WIDTH", default_value_t = 7)]
    pub width: usize,
    /// Maze height in cells.
    #[arg(long, env = "MAZEVIEW_HEIGHT", default_value_t = 4)]
    pub height: usize,
    /// Value segment format of each cell token.
    #[arg(
        long,
        value_name = "FORMAT",
        env = "MAZEVIEW_FRAME_FORMAT",
        default_value = "extended"
    )]
    pub frame_format: FrameFormatArg,
}

impl MazeArgs {
    pub fn parser(&self) -> CliResult<FrameParser> {
        let dims = MazeDimensions::try_new(self.width, self.height).ok_or_else(|| {
            CliError::new(
                USAGE,
                format!(
                    "maze width and height must be between 1 and {MAX_SIDE} (got {}x{})",
                    self.width, self.height
                ),
            )
        })?;
        Ok(FrameParser::new(dims, self.frame_format.as_format()))
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Serial port to read (e.g. /dev/ttyUSB0, COM4).
    #[arg(env = "MAZEVIEW_PORT")]
    pub port: String,
    /// Baud rate of the controller's UART.
    #[arg(long, env = "MAZEVIEW_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Serial read timeout (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub read_timeout: String,
    /// Wait before the single reconnect attempt after a port failure.
    #[arg(long, default_value = "5s")]
    pub reconnect_delay: String,
    /// Exit after drawing N maps.
    #[arg(long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub maze: MazeArgs,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Captured serial log, or `-` for stdin.
    pub input: PathBuf,
    /// Exit after drawing N maps.
    #[arg(long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub maze: MazeArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `500ms`, `5s` or bare seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, from_value): (&str, fn(u64) -> Duration) =
        if let Some(num) = input.strip_suffix("ms") {
            (num, Duration::from_millis)
        } else {
            (input.strip_suffix('s').unwrap_or(input), Duration::from_secs)
        };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(from_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration(" 3s ").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_millis() {
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("5m").is_err());
        assert!(parse_duration("ms").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }

    #[test]
    fn zero_sized_maze_is_a_usage_error() {
        let args = MazeArgs {
            width: 0,
            height: 4,
            frame_format: FrameFormatArg::Basic,
        };
        assert_eq!(args.parser().unwrap_err().code, USAGE);
    }

    #[test]
    fn oversized_maze_is_a_usage_error() {
        for (width, height) in [(MAX_SIDE + 1, 4), (7, 100_000), (usize::MAX, usize::MAX)] {
            let args = MazeArgs {
                width,
                height,
                frame_format: FrameFormatArg::Extended,
            };
            let err = args.parser().unwrap_err();
            assert_eq!(err.code, USAGE);
            assert!(err.message.contains("between 1 and"), "{}", err.message);
        }
    }

    #[test]
    fn maze_args_build_parser() {
        let args = MazeArgs {
            width: 5,
            height: 5,
            frame_format: FrameFormatArg::Basic,
        };
        let parser = args.parser().unwrap();
        assert_eq!(parser.dimensions(), MazeDimensions::new(5, 5));
        assert_eq!(parser.format(), FrameFormat::Basic);
    }
}
