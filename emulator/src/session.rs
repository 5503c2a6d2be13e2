use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant as HostInstant};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, PrintStyledContent, Stylize};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use signal_core::console::{ConsoleExecutor, ConsoleOutcome};
use signal_core::controller::{NoopSignalDriver, SharedController, SignalDriver, TickReport};
use signal_core::rate::RateError;
use signal_core::sequences::{Color, LightOutputs};
use signal_core::telemetry::EventId;

/// Controller shared between the console thread and the ticker thread.
pub type HostController = SharedController<CriticalSectionRawMutex>;

type BoxedDriver = Box<dyn SignalDriver + Send>;

/// Start-up options assembled from the command line.
#[derive(Clone, Debug, Default)]
pub struct SessionOptions<'a> {
    pub manual: bool,
    pub rate: Option<&'a str>,
    pub trace: bool,
    pub transcript: Option<&'a Path>,
}

pub struct Session {
    controller: Arc<HostController>,
    ticks: TickSource,
    transcript: Option<TranscriptLogger>,
    started_at: HostInstant,
    telemetry_cursor: EventId,
}

impl Session {
    pub fn new(options: &SessionOptions<'_>) -> io::Result<Self> {
        let controller = Arc::new(HostController::new());
        if let Some(rate) = options.rate {
            controller
                .write_rate(rate.as_bytes())
                .map_err(|err| invalid_input(&err))?;
        }

        let driver: BoxedDriver = if options.trace {
            Box::new(TerminalSignalDriver::new())
        } else {
            Box::new(NoopSignalDriver::new())
        };
        let ticks = if options.manual {
            TickSource::Manual(driver)
        } else {
            TickSource::Automatic(Ticker::spawn(Arc::clone(&controller), driver)?)
        };

        let transcript = options
            .transcript
            .map(|path| TranscriptLogger::create(path, options.manual))
            .transpose()?;
        let telemetry_cursor = controller.with_state(|state| state.telemetry().next_event_id());

        Ok(Self {
            controller,
            ticks,
            transcript,
            started_at: HostInstant::now(),
            telemetry_cursor,
        })
    }

    #[must_use]
    pub fn controller(&self) -> &HostController {
        &self.controller
    }

    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self.ticks, TickSource::Manual(_))
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let elapsed = self.started_at.elapsed();
        self.log(elapsed, TranscriptRole::Host, trimmed)?;

        let outcome = ConsoleExecutor::new(&*self.controller).execute(trimmed);
        let lines = match outcome {
            Ok(ConsoleOutcome::TickRequested(count)) => self.run_ticks(count),
            Ok(outcome) => outcome.to_string().lines().map(str::to_owned).collect(),
            Err(err) => vec![format!("ERR {err}")],
        };

        for response in &lines {
            self.log(elapsed, TranscriptRole::Emulator, response)?;
        }
        self.drain_telemetry(elapsed)?;
        Ok(lines)
    }

    /// Stops the tick source and darkens every lamp.
    pub fn shutdown(mut self) -> io::Result<()> {
        match &mut self.ticks {
            TickSource::Manual(driver) => driver.all_off(),
            TickSource::Automatic(ticker) => ticker.stop(),
        }

        let elapsed = self.started_at.elapsed();
        self.drain_telemetry(elapsed)?;
        self.log(elapsed, TranscriptRole::Emulator, "lamps off, session closed")
    }

    fn run_ticks(&mut self, count: u8) -> Vec<String> {
        let TickSource::Manual(driver) = &mut self.ticks else {
            return vec!["ERR tick needs --manual; the ticker thread owns the tick source".into()];
        };

        (0..count)
            .map(|_| {
                let report = self.controller.tick();
                driver.apply(report.outputs);
                describe_tick(&report)
            })
            .collect()
    }

    fn drain_telemetry(&mut self, elapsed: Duration) -> io::Result<()> {
        let cursor = self.telemetry_cursor;
        let (records, next) = self.controller.with_state(|state| {
            let telemetry = state.telemetry();
            let records: Vec<String> = telemetry
                .since(cursor)
                .map(ToString::to_string)
                .collect();
            (records, telemetry.next_event_id())
        });
        self.telemetry_cursor = next;

        for record in records {
            self.log(elapsed, TranscriptRole::Event, &record)?;
        }
        Ok(())
    }

    fn log(&mut self, elapsed: Duration, role: TranscriptRole, line: &str) -> io::Result<()> {
        match self.transcript.as_mut() {
            Some(transcript) => transcript.append_line(elapsed, role, line),
            None => Ok(()),
        }
    }
}

enum TickSource {
    /// Ticks only run when the console asks for them.
    Manual(BoxedDriver),
    Automatic(Ticker),
}

/// Background tick source that re-reads the period before every wait.
struct Ticker {
    stop: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(controller: Arc<HostController>, mut driver: BoxedDriver) -> io::Result<Self> {
        let (stop, stopped) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("signal-ticker".into())
            .spawn(move || {
                loop {
                    let period = Duration::from_millis(u64::from(controller.period_ms()));
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => driver.apply(controller.tick().outputs),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                driver.all_off();
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    fn stop(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Draws the signal head as three coloured lamps on stdout.
pub struct TerminalSignalDriver {
    out: io::Stdout,
}

impl TerminalSignalDriver {
    #[must_use]
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    fn draw(&mut self, outputs: LightOutputs) -> io::Result<()> {
        let mut out = self.out.lock();
        queue!(out, Print("\r  "))?;
        for color in Color::ALL {
            let lamp = if outputs.is_lit(color) {
                "●".with(lamp_color(color)).bold()
            } else {
                "○".dark_grey()
            };
            queue!(out, PrintStyledContent(lamp), Print(" "))?;
        }
        queue!(out, Print("\n"))?;
        out.flush()
    }
}

impl Default for TerminalSignalDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalDriver for TerminalSignalDriver {
    fn apply(&mut self, outputs: LightOutputs) {
        // A closed stdout must not take the tick source down with it.
        let _ = self.draw(outputs);
    }
}

fn lamp_color(color: Color) -> TermColor {
    match color {
        Color::Red => TermColor::Red,
        Color::Yellow => TermColor::Yellow,
        Color::Green => TermColor::Green,
    }
}

fn describe_tick(report: &TickReport) -> String {
    format!(
        "tick {:>3} [{}] lights: {}",
        report.tick, report.mode, report.outputs
    )
}

fn invalid_input(err: &RateError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("--rate: {err}"))
}

/// Timestamped record of console traffic and telemetry.
pub struct TranscriptLogger {
    writer: BufWriter<fs::File>,
}

impl TranscriptLogger {
    pub fn create(path: &Path, manual: bool) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };

        logger.write_header(manual)?;
        Ok(logger)
    }

    fn write_header(&mut self, manual: bool) -> io::Result<()> {
        writeln!(self.writer, "# Traffic signal emulator transcript")?;
        writeln!(
            self.writer,
            "# Tick source: {}",
            if manual { "manual" } else { "automatic" }
        )?;
        writeln!(
            self.writer,
            "# Timestamps are milliseconds since session start"
        )?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn append_line(
        &mut self,
        elapsed: Duration,
        role: TranscriptRole,
        line: &str,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>6} ms] {} {}",
            elapsed.as_millis(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}

enum TranscriptRole {
    Host,
    Emulator,
    Event,
}

impl TranscriptRole {
    fn prefix(&self) -> &'static str {
        match self {
            TranscriptRole::Host => "HOST>",
            TranscriptRole::Emulator => "EMU <",
            TranscriptRole::Event => "EVT !",
        }
    }
}
