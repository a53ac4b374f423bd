use crate::{
    config::Config,
    error::Result,
    format::{format_console, format_row},
    logger::CsvLogger,
    metrics::SnapshotSource,
    model::{LogRow, SampleCycle},
    rate::{disk_rates, network_rates, SAMPLE_WINDOW},
};
use chrono::Local;
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

/// Blocking wait between samples
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Longest stretch slept without looking at the cancel flag
const CANCEL_POLL: Duration = Duration::from_millis(100);

/// Sleeps on the current thread, returning early once `cancel` is raised
#[derive(Debug, Clone)]
pub struct ThreadSleeper {
    cancel: Arc<AtomicBool>,
}

impl ThreadSleeper {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.cancel.load(Ordering::SeqCst) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            std::thread::sleep(remaining.min(CANCEL_POLL));
        }
    }
}

/// Drives sampling cycles until cancelled.
///
/// One cycle costs at least `interval + 2 * SAMPLE_WINDOW` of wall clock: the
/// outer sleep plus one fixed window each for the network and disk pairs.
pub struct Scheduler<S, L = ThreadSleeper> {
    config: Config,
    source: S,
    sleeper: L,
    logger: CsvLogger,
    cancel: Arc<AtomicBool>,
    console: Box<dyn Write>,
    cycles: u64,
}

impl<S: SnapshotSource> Scheduler<S, ThreadSleeper> {
    pub fn new(config: Config, source: S, cancel: Arc<AtomicBool>) -> Self {
        let sleeper = ThreadSleeper::new(cancel.clone());
        Self::with_sleeper(config, source, sleeper, cancel)
    }
}

impl<S: SnapshotSource, L: Sleeper> Scheduler<S, L> {
    pub fn with_sleeper(config: Config, source: S, sleeper: L, cancel: Arc<AtomicBool>) -> Self {
        let logger = CsvLogger::new(config.log_path.clone());
        Self {
            config,
            source,
            sleeper,
            logger,
            cancel,
            console: Box::new(io::stdout()),
            cycles: 0,
        }
    }

    /// Send the verbose echo somewhere other than stdout
    pub fn with_console<W: Write + 'static>(mut self, console: W) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn sleeper(&self) -> &L {
        &self.sleeper
    }

    /// Number of rows written so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run cycles until the cancel flag is raised.
    ///
    /// Failing to create the log file is fatal; every later error only costs
    /// the current cycle. Returns the number of rows written.
    pub fn run(&mut self) -> Result<u64> {
        self.logger.ensure_header()?;
        info!(
            path = %self.logger.path().display(),
            interval_secs = self.config.interval_secs,
            bandwidth_gb = self.config.bandwidth_gb,
            "scanner started"
        );

        while !self.cancelled() {
            match self.run_once() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => error!(
                    path = %self.logger.path().display(),
                    error = %e,
                    "failed to write log row, metrics for this cycle are lost"
                ),
            }
        }

        info!(cycles = self.cycles, "scanner stopped");
        Ok(self.cycles)
    }

    /// One full cycle: wait, sample, log, optionally echo.
    ///
    /// Returns `Ok(None)` when cancelled before a row was written; a cycle
    /// whose sample windows were cut short is discarded. Only log file errors
    /// are returned; sampling and echo failures degrade the cycle instead.
    pub fn run_once(&mut self) -> Result<Option<LogRow>> {
        self.sleeper.sleep(self.config.interval());
        if self.cancelled() {
            return Ok(None);
        }

        let cycle = self.sample();
        if self.cancelled() {
            debug!("cancelled during sampling, discarding partial cycle");
            return Ok(None);
        }
        let row = format_row(&cycle);
        self.logger.append(&row)?;
        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            interfaces = cycle.networks.len(),
            disks = cycle.disks.len(),
            "row appended"
        );

        if self.config.verbose {
            self.echo(&row);
        }

        Ok(Some(row))
    }

    fn echo(&mut self, row: &LogRow) {
        let written = writeln!(self.console, "{}", format_console(row))
            .and_then(|_| self.console.flush());
        if let Err(e) = written {
            warn!(error = %e, "failed to echo cycle to console");
        }
    }

    /// Take both snapshot pairs and the scalar readings
    pub fn sample(&mut self) -> SampleCycle {
        let timestamp = Local::now();

        let networks = match self.sample_pair(|source| source.sample_network()) {
            Some((first, second)) => {
                network_rates(&first, &second, self.config.bandwidth_bytes(), SAMPLE_WINDOW)
            }
            None => Vec::new(),
        };

        let disks = match self.sample_pair(|source| source.sample_disks()) {
            Some((first, second)) => disk_rates(&first, &second, SAMPLE_WINDOW),
            None => Vec::new(),
        };

        let cpu_percent = self
            .source
            .sample_cpu()
            .inspect_err(|e| warn!(error = %e, "cpu sample failed"))
            .ok();
        let memory = self
            .source
            .sample_memory()
            .inspect_err(|e| warn!(error = %e, "memory sample failed"))
            .ok();

        SampleCycle {
            timestamp,
            cpu_percent,
            memory,
            networks,
            disks,
        }
    }

    /// Two readings separated by one sample window.
    ///
    /// The window is slept even when the first reading fails so that the
    /// cycle length stays fixed.
    fn sample_pair<T, F>(&mut self, mut read: F) -> Option<(T, T)>
    where
        F: FnMut(&mut S) -> Result<T>,
    {
        let first = read(&mut self.source);
        self.sleeper.sleep(SAMPLE_WINDOW);
        let second = read(&mut self.source);

        match (first, second) {
            (Ok(first), Ok(second)) => Some((first, second)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "snapshot failed, skipping this family for the cycle");
                None
            }
        }
    }
}
