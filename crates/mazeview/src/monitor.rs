//! The polling loop: line source -> collector -> parser -> sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mazeview_frame::{FrameCollector, FrameEvent, FrameParser, ParsedFrame};
use mazeview_transport::{LineEvent, LineSource, TransportError};

/// Progress notifications for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A header opened a new frame.
    Receiving,
    /// A complete frame is about to be drawn.
    Drawing,
    /// A header was followed directly by a terminator.
    EmptyFrame,
    /// The transport was reopened after a failure.
    Reconnected,
}

/// Receives what the monitor produces.
pub trait FrameSink {
    fn status(&mut self, status: Status);
    fn frame(&mut self, frame: &ParsedFrame);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Sleep between polls while the source is idle.
    pub poll_interval: Duration,
    /// Wait before the single reopen attempt after a transport failure.
    pub reconnect_delay: Duration,
    /// Stop after this many rendered frames.
    pub max_frames: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            reconnect_delay: Duration::from_secs(5),
            max_frames: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub frames_rendered: usize,
    pub empty_frames: usize,
    pub tokens_rejected: usize,
    pub reconnects: usize,
}

enum Flow {
    Continue,
    Stop,
}

/// Single-threaded control loop owning the frame collector.
pub struct Monitor {
    parser: FrameParser,
    config: MonitorConfig,
    running: Arc<AtomicBool>,
    collector: FrameCollector,
    stats: MonitorStats,
}

impl Monitor {
    pub fn new(parser: FrameParser, config: MonitorConfig, running: Arc<AtomicBool>) -> Self {
        Self {
            parser,
            config,
            running,
            collector: FrameCollector::new(),
            stats: MonitorStats::default(),
        }
    }

    /// Run until interrupted, the source closes, or `max_frames` is reached.
    ///
    /// A transport failure gets one reopen attempt after `reconnect_delay`;
    /// if that attempt fails its error is returned. The current source is
    /// dropped before reopening and on every exit path.
    pub fn run<S, O, K>(
        &mut self,
        source: S,
        mut reopen: O,
        sink: &mut K,
    ) -> Result<MonitorStats, TransportError>
    where
        S: LineSource,
        O: FnMut() -> Result<S, TransportError>,
        K: FrameSink,
    {
        let mut source = source;
        loop {
            let err = match self.pump(&mut source, sink) {
                Ok(()) => return Ok(self.stats),
                Err(err) => err,
            };

            tracing::error!(
                error = %err,
                delay = ?self.config.reconnect_delay,
                "transport failed, reconnecting"
            );
            drop(source);

            let discarded = self.collector.reset();
            if discarded > 0 {
                tracing::warn!(discarded, "dropped partial frame after transport failure");
            }

            if !self.wait(self.config.reconnect_delay) {
                return Ok(self.stats);
            }

            source = reopen().inspect_err(|retry| {
                tracing::error!(error = %retry, "reconnect failed, giving up");
            })?;
            self.stats.reconnects += 1;
            sink.status(Status::Reconnected);
        }
    }

    fn pump<S: LineSource, K: FrameSink>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> Result<(), TransportError> {
        while self.is_running() {
            match source.poll_line()? {
                LineEvent::Line(line) => {
                    tracing::trace!(line = %line, "received line");
                    if let Some(event) = self.collector.push(&line) {
                        if let Flow::Stop = self.handle(event, sink) {
                            return Ok(());
                        }
                    }
                }
                LineEvent::Idle => thread::sleep(self.config.poll_interval),
                LineEvent::Closed => {
                    tracing::debug!("line source closed");
                    if let Some(event) = self.collector.finish() {
                        self.handle(event, sink);
                    }
                    return Ok(());
                }
            }
        }

        tracing::debug!("interrupt received, stopping");
        Ok(())
    }

    fn handle<K: FrameSink>(&mut self, event: FrameEvent, sink: &mut K) -> Flow {
        match event {
            FrameEvent::Started => sink.status(Status::Receiving),
            FrameEvent::Restarted { discarded } => {
                tracing::warn!(discarded, "new header before frame end, restarting");
                sink.status(Status::Receiving);
            }
            FrameEvent::Empty => {
                tracing::warn!("maze header without data, nothing to draw");
                self.stats.empty_frames += 1;
                sink.status(Status::EmptyFrame);
            }
            FrameEvent::Complete(lines) => {
                let frame = self.parser.parse(&lines);
                self.stats.tokens_rejected += frame.rejected.len();
                self.stats.frames_rendered += 1;
                sink.status(Status::Drawing);
                sink.frame(&frame);

                if self
                    .config
                    .max_frames
                    .is_some_and(|max| self.stats.frames_rendered >= max)
                {
                    return Flow::Stop;
                }
            }
        }
        Flow::Continue
    }

    /// Sleep for `total` in poll-interval slices. Returns `false` as soon as
    /// the running flag is cleared.
    fn wait(&self, total: Duration) -> bool {
        let slice = self.config.poll_interval.max(Duration::from_millis(1));
        let mut remaining = total;
        while !remaining.is_zero() {
            if !self.is_running() {
                return false;
            }
            let nap = remaining.min(slice);
            thread::sleep(nap);
            remaining -= nap;
        }
        self.is_running()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::time::Instant;

    use mazeview_frame::{FrameFormat, MazeDimensions};

    use super::*;

    /// Replays a fixed script of poll results.
    struct Script {
        events: VecDeque<Result<LineEvent, TransportError>>,
    }

    impl Script {
        fn new(events: Vec<Result<LineEvent, TransportError>>) -> Self {
            Self {
                events: events.into(),
            }
        }

        fn lines(lines: &[&str]) -> Self {
            Self::new(
                lines
                    .iter()
                    .map(|l| Ok(LineEvent::Line(l.to_string())))
                    .collect(),
            )
        }
    }

    impl LineSource for Script {
        fn poll_line(&mut self) -> Result<LineEvent, TransportError> {
            self.events.pop_front().unwrap_or(Ok(LineEvent::Closed))
        }
    }

    #[derive(Default)]
    struct Recorder {
        statuses: Vec<Status>,
        frames: Vec<ParsedFrame>,
    }

    impl FrameSink for Recorder {
        fn status(&mut self, status: Status) {
            self.statuses.push(status);
        }

        fn frame(&mut self, frame: &ParsedFrame) {
            self.frames.push(frame.clone());
        }
    }

    fn monitor(max_frames: Option<usize>) -> Monitor {
        let parser = FrameParser::new(MazeDimensions::new(7, 4), FrameFormat::Extended);
        let config = MonitorConfig {
            poll_interval: Duration::from_millis(1),
            reconnect_delay: Duration::from_millis(1),
            max_frames,
        };
        Monitor::new(parser, config, Arc::new(AtomicBool::new(true)))
    }

    fn lost() -> Result<LineEvent, TransportError> {
        Err(TransportError::Io(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn no_reopen() -> Result<Script, TransportError> {
        panic!("reopen should not be called")
    }

    #[test]
    fn renders_each_complete_frame() {
        let source = Script::lines(&[
            "boot",
            "Labyrinth Karte:",
            "[0][0]:15:0,[0][1]:2:1,",
            "",
            "Labyrinth Karte:",
            "[3][6]:5:12,",
            "",
        ]);
        let mut sink = Recorder::default();

        let stats = monitor(None).run(source, no_reopen, &mut sink).unwrap();

        assert_eq!(stats.frames_rendered, 2);
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.frames[0].maze.get(0, 0), Some(&15));
        assert_eq!(sink.frames[1].maze.get(3, 6), Some(&5));
        assert_eq!(
            sink.frames[1].distances.as_ref().unwrap().get(3, 6),
            Some(&12)
        );
        assert_eq!(
            sink.statuses,
            vec![
                Status::Receiving,
                Status::Drawing,
                Status::Receiving,
                Status::Drawing
            ]
        );
    }

    #[test]
    fn empty_frame_is_reported_without_rendering() {
        let source = Script::lines(&["Labyrinth Karte:", ""]);
        let mut sink = Recorder::default();

        let stats = monitor(None).run(source, no_reopen, &mut sink).unwrap();

        assert!(sink.frames.is_empty());
        assert_eq!(stats.empty_frames, 1);
        assert_eq!(sink.statuses, vec![Status::Receiving, Status::EmptyFrame]);
    }

    #[test]
    fn rejected_tokens_are_counted() {
        let source = Script::lines(&["Labyrinth Karte:", "[0][0]:1,[9][9]:1:1,[0][1]:2:2", ""]);
        let mut sink = Recorder::default();

        let stats = monitor(None).run(source, no_reopen, &mut sink).unwrap();

        assert_eq!(stats.tokens_rejected, 2);
        assert_eq!(sink.frames[0].applied, 1);
    }

    #[test]
    fn end_of_input_flushes_pending_frame() {
        let source = Script::lines(&["Labyrinth Karte:", "[1][1]:4:2"]);
        let mut sink = Recorder::default();

        let stats = monitor(None).run(source, no_reopen, &mut sink).unwrap();

        assert_eq!(stats.frames_rendered, 1);
        assert_eq!(sink.frames[0].maze.get(1, 1), Some(&4));
    }

    #[test]
    fn stops_after_max_frames() {
        let source = Script::lines(&[
            "Labyrinth Karte:",
            "[0][0]:1:0",
            "",
            "Labyrinth Karte:",
            "[0][0]:2:0",
            "",
        ]);
        let mut sink = Recorder::default();

        let stats = monitor(Some(1)).run(source, no_reopen, &mut sink).unwrap();

        assert_eq!(stats.frames_rendered, 1);
        assert_eq!(sink.frames[0].maze.get(0, 0), Some(&1));
    }

    #[test]
    fn reconnects_once_and_resumes() {
        let first = Script::new(vec![
            Ok(LineEvent::Line("Labyrinth Karte:".into())),
            Ok(LineEvent::Line("[0][0]:1:0".into())),
            lost(),
        ]);
        let mut second = Some(Script::lines(&["Labyrinth Karte:", "[0][1]:8:3", ""]));
        let mut sink = Recorder::default();

        let stats = monitor(None)
            .run(
                first,
                || Ok(second.take().expect("only one reopen")),
                &mut sink,
            )
            .unwrap();

        assert_eq!(stats.reconnects, 1);
        assert_eq!(stats.frames_rendered, 1);
        // The partial frame from before the failure is gone.
        assert_eq!(sink.frames[0].maze.get(0, 0), Some(&0));
        assert_eq!(sink.frames[0].maze.get(0, 1), Some(&8));
        assert!(sink.statuses.contains(&Status::Reconnected));
    }

    #[test]
    fn failed_reconnect_is_fatal() {
        let source = Script::new(vec![lost()]);
        let mut attempts = 0;
        let mut sink = Recorder::default();

        let err = monitor(None)
            .run(
                source,
                || {
                    attempts += 1;
                    Err(TransportError::Io(io::Error::from(io::ErrorKind::NotFound)))
                },
                &mut sink,
            )
            .unwrap_err();

        assert_eq!(attempts, 1);
        assert!(matches!(err, TransportError::Io(e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn each_failure_after_a_good_reconnect_gets_its_own_retry() {
        let mut reopened = vec![
            Script::lines(&["Labyrinth Karte:", "[0][0]:4:0", ""]),
            Script::new(vec![lost()]),
        ];
        let mut sink = Recorder::default();

        let stats = monitor(None)
            .run(
                Script::new(vec![lost()]),
                || Ok(reopened.pop().expect("two reopens")),
                &mut sink,
            )
            .unwrap();

        assert_eq!(stats.reconnects, 2);
        assert_eq!(stats.frames_rendered, 1);
    }

    #[test]
    fn cleared_flag_stops_before_polling() {
        let running = Arc::new(AtomicBool::new(false));
        let parser = FrameParser::new(MazeDimensions::default(), FrameFormat::Basic);
        let mut monitor = Monitor::new(parser, MonitorConfig::default(), running);
        let mut sink = Recorder::default();

        let stats = monitor
            .run(Script::new(vec![lost()]), no_reopen, &mut sink)
            .unwrap();

        assert_eq!(stats, MonitorStats::default());
        assert!(sink.statuses.is_empty());
    }

    #[test]
    fn interrupt_cuts_the_reconnect_delay_short() {
        let running = Arc::new(AtomicBool::new(true));
        let parser = FrameParser::new(MazeDimensions::default(), FrameFormat::Extended);
        let config = MonitorConfig {
            poll_interval: Duration::from_millis(5),
            reconnect_delay: Duration::from_secs(60),
            max_frames: None,
        };
        let mut monitor = Monitor::new(parser, config, running.clone());
        let mut sink = Recorder::default();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            running.store(false, Ordering::SeqCst);
        });
        let started = Instant::now();
        let stats = monitor
            .run(Script::new(vec![lost()]), no_reopen, &mut sink)
            .unwrap();
        stopper.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(stats.reconnects, 0);
        assert!(sink.statuses.is_empty());
    }

    #[test]
    fn idle_polls_do_not_end_the_loop() {
        let source = Script::new(vec![
            Ok(LineEvent::Idle),
            Ok(LineEvent::Line("Labyrinth Karte:".into())),
            Ok(LineEvent::Idle),
            Ok(LineEvent::Line("[2][2]:15:9999".into())),
            Ok(LineEvent::Line(String::new())),
        ]);
        let mut sink = Recorder::default();

        let stats = monitor(None).run(source, no_reopen, &mut sink).unwrap();
        assert_eq!(stats.frames_rendered, 1);
    }
}
