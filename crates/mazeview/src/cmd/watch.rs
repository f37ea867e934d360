use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mazeview_frame::HEADER_MARKER;
use mazeview_transport::{SerialConfig, SerialLineSource};

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{transport_error, CliError, CliResult, SUCCESS};
use crate::monitor::{Monitor, MonitorConfig};
use crate::output::{print_status, ConsolePrinter, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let parser = args.maze.parser()?;
    let serial = SerialConfig {
        path: args.port,
        baud_rate: args.baud,
        read_timeout: parse_duration(&args.read_timeout)?,
    };
    let config = MonitorConfig {
        reconnect_delay: parse_duration(&args.reconnect_delay)?,
        max_frames: args.count,
        ..MonitorConfig::default()
    };

    // No session to preserve yet, so a failed first open is fatal.
    let source =
        SerialLineSource::open(&serial).map_err(|err| transport_error("open failed", err))?;
    print_status(
        format,
        &format!("connected to {} @ {} baud", serial.path, serial.baud_rate),
    );
    print_status(format, &format!("waiting for '{HEADER_MARKER}' header..."));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printer = ConsolePrinter::new(format);
    let mut monitor = Monitor::new(parser, config, running.clone());
    let stats = monitor
        .run(source, || SerialLineSource::open(&serial), &mut printer)
        .map_err(|err| transport_error("reconnect failed", err))?;

    tracing::info!(
        frames = stats.frames_rendered,
        empty = stats.empty_frames,
        rejected = stats.tokens_rejected,
        reconnects = stats.reconnects,
        "watch finished"
    );
    if !running.load(Ordering::SeqCst) {
        print_status(format, "stopped");
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
