use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use mazeview_transport::{LineReader, LineSource, TransportError};

use crate::cmd::ReplayArgs;
use crate::exit::{io_error, transport_error, CliResult, SUCCESS};
use crate::monitor::{Monitor, MonitorConfig};
use crate::output::{ConsolePrinter, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let parser = args.maze.parser()?;
    let source = open_input(&args.input)?;
    let config = MonitorConfig {
        max_frames: args.count,
        ..MonitorConfig::default()
    };

    let mut printer = ConsolePrinter::new(format);
    let mut monitor = Monitor::new(parser, config, Arc::new(AtomicBool::new(true)));
    let stats = monitor
        .run(source, reopen_unsupported, &mut printer)
        .map_err(|err| transport_error("replay failed", err))?;

    tracing::info!(
        frames = stats.frames_rendered,
        empty = stats.empty_frames,
        rejected = stats.tokens_rejected,
        "replay finished"
    );
    Ok(SUCCESS)
}

fn open_input(path: &Path) -> CliResult<Box<dyn LineSource>> {
    if path == Path::new("-") {
        return Ok(Box::new(LineReader::new(io::stdin().lock())));
    }

    let file = File::open(path)
        .map_err(|err| io_error(&format!("cannot open {}", path.display()), err))?;
    Ok(Box::new(LineReader::new(file)))
}

/// A capture is read once; a read error mid-file cannot be retried.
fn reopen_unsupported() -> Result<Box<dyn LineSource>, TransportError> {
    Err(TransportError::Io(io::Error::other(
        "replay input cannot be reopened",
    )))
}
