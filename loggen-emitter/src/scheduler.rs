//! Emission scheduler.
//!
//! One loop, one producer: wait for a tick, then generate, serialize and
//! append a single record. The first error ends the loop.

use crate::serializer::to_line;
use crate::writer::AppendWriter;
use async_trait::async_trait;
use loggen_core::config::EmitterConfig;
use loggen_core::error::{LoggenError, Result};
use loggen_core::generator::{Clock, RandomSource, generate_record};
use loggen_core::record::LogRecord;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info};

// ── Ticker ───────────────────────────────────────────────────────────────────

/// Periodic trigger for the emission loop.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick. `None` stops the loop.
    async fn tick(&mut self) -> Option<Instant>;
}

/// Fixed-period ticker backed by `tokio::time::interval`.
///
/// The first tick fires one full period after construction. Late ticks are
/// skipped, not bursted, so slow appends lower the effective rate instead of
/// queueing work. Never returns `None`.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Must be called from within a tokio runtime. Fails when `period` is
    /// zero or the first deadline is past what the monotonic clock can hold.
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(LoggenError::Config("emission interval must be non-zero".into()));
        }
        let start = Instant::now().checked_add(period).ok_or_else(|| {
            LoggenError::Config(format!("emission interval {period:?} is too long"))
        })?;
        let mut interval = interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Ok(Self { interval })
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> Option<Instant> {
        Some(self.interval.tick().await)
    }
}

// ── Emitter ──────────────────────────────────────────────────────────────────

/// Owns everything one emission needs.
pub struct Emitter<C, R> {
    config: EmitterConfig,
    writer: AppendWriter,
    clock: C,
    rng: R,
    emitted: u64,
}

impl<C: Clock, R: RandomSource> Emitter<C, R> {
    pub fn new(config: EmitterConfig, clock: C, rng: R) -> Self {
        let writer = AppendWriter::new(config.log_file.clone());
        Self {
            config,
            writer,
            clock,
            rng,
            emitted: 0,
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Records written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Generate, serialize and append one record.
    pub fn emit_once(&mut self) -> Result<LogRecord> {
        let record = generate_record(
            &self.clock.now(),
            &self.config.host,
            &self.config.vocabulary,
            &mut self.rng,
        );
        let line = to_line(&record)?;
        self.writer.append(&line)?;
        self.emitted += 1;

        debug!(
            seq = self.emitted,
            remote_addr = %record.remote_addr,
            method = %record.request_method,
            uri = %record.request_uri,
            "Emitted record"
        );
        Ok(record)
    }

    /// Emit one record per tick until the ticker stops or a step fails.
    ///
    /// Returns the number of records written by this call. Dropping the
    /// future only ever interrupts the wait, never an append.
    pub async fn run<T: Ticker + ?Sized>(&mut self, ticker: &mut T) -> Result<u64> {
        let start = self.emitted;
        while ticker.tick().await.is_some() {
            self.emit_once()?;
        }

        let written = self.emitted - start;
        info!(written, "Emission loop stopped");
        Ok(written)
    }
}
