//! Record synthesis.
//!
//! [`generate_record`] is a pure function of the wall-clock instant, the host
//! label, the vocabulary and a [`RandomSource`]. Every choice is uniform and
//! independent of the others.

use crate::config::Vocabulary;
use crate::record::{LogRecord, TIME_LOCAL_FORMAT};
use chrono::{DateTime, FixedOffset, Local};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::net::Ipv4Addr;

// ── Clock ────────────────────────────────────────────────────────────────────

/// Source of the `time_local` instant.
pub trait Clock: Send {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Local wall-clock time, with the host's UTC offset.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

// ── Randomness ───────────────────────────────────────────────────────────────

/// Uniform random primitives the generator needs.
pub trait RandomSource: Send {
    /// Uniform in `[0, 255]`.
    fn next_byte(&mut self) -> u8;
    /// Uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
    /// Uniform in `[0, len)`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

/// The generator used by the binary.
pub type DefaultSource = RngSource<SmallRng>;

impl DefaultSource {
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_os_rng())
    }

    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_byte(&mut self) -> u8 {
        self.0.random()
    }

    fn next_unit(&mut self) -> f64 {
        self.0.random()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Upper bound (exclusive) of the timing fields, in milliseconds.
const MAX_TIMING_MS: u32 = 500;

fn pick<'v, R: RandomSource + ?Sized>(rng: &mut R, set: &'v [String]) -> &'v str {
    &set[rng.pick_index(set.len())]
}

fn random_ipv4<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    Ipv4Addr::new(rng.next_byte(), rng.next_byte(), rng.next_byte(), rng.next_byte()).to_string()
}

/// Seconds in `[0, 0.5)` with exactly three fraction digits.
///
/// Truncates to whole milliseconds so the text never rounds up to `0.500`.
fn random_timing<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let ms = ((rng.next_unit() * MAX_TIMING_MS as f64) as u32).min(MAX_TIMING_MS - 1);
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// Build one record. `vocabulary` must have passed [`Vocabulary::validate`].
pub fn generate_record<R: RandomSource + ?Sized>(
    now: &DateTime<FixedOffset>,
    host: &str,
    vocabulary: &Vocabulary,
    rng: &mut R,
) -> LogRecord {
    LogRecord {
        time_local: now.format(TIME_LOCAL_FORMAT).to_string(),
        remote_addr: random_ipv4(rng),
        request_method: pick(rng, &vocabulary.methods).to_string(),
        request_uri: pick(rng, &vocabulary.uris).to_string(),
        referrer: format!("www.{}/", pick(rng, &vocabulary.domains)),
        useragent: pick(rng, &vocabulary.user_agents).to_string(),
        host: host.to_string(),
        bytes_sent: vocabulary.bytes_sent.clone(),
        status: vocabulary.status.clone(),
        upstream_response_time: random_timing(rng),
        request_time: random_timing(rng),
    }
}
