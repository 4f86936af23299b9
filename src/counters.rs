// Counter store and rate calculation.
//
// The store keeps exactly one previous reading per identity. Rates are derived
// from the delta against that reading and the elapsed wall time, then the
// reading is overwritten so the next pass has a fresh baseline.

use std::collections::HashMap;
use std::time::Instant;

/// One raw cumulative counter reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSample {
    pub value: u64,
    pub at: Instant,
}

/// Previous reading per identity (e.g. `disk/sda/read`, `net/eth0/sent`).
///
/// Entries for devices that disappear are kept until the identity shows up
/// again; the set of physical devices is small and slow-changing.
#[derive(Debug, Default)]
pub struct CounterStore {
    samples: HashMap<String, CounterSample>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &str) -> Option<CounterSample> {
        self.samples.get(identity).copied()
    }

    pub fn put(&mut self, identity: &str, sample: CounterSample) {
        match self.samples.get_mut(identity) {
            Some(slot) => *slot = sample,
            None => {
                self.samples.insert(identity.to_string(), sample);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Per-second throughput derived from two counter readings.
///
/// An invalid result (no baseline, or no time elapsed) renders as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateResult {
    pub per_second: u64,
    pub valid: bool,
}

impl RateResult {
    pub const INVALID: RateResult = RateResult {
        per_second: 0,
        valid: false,
    };

    /// Value to display: the rate when valid, zero otherwise.
    pub fn value(&self) -> u64 {
        if self.valid { self.per_second } else { 0 }
    }
}

/// Difference between `current` and the stored baseline for `identity`,
/// together with the elapsed seconds. Always overwrites the baseline.
///
/// Returns `None` when there is no baseline or `elapsed <= 0`. A counter that
/// went backwards (reset, device replaced) yields a zero delta.
fn advance(
    store: &mut CounterStore,
    identity: &str,
    current: u64,
    now: Instant,
) -> Option<(u64, f64)> {
    let prior = store.get(identity);
    store.put(identity, CounterSample { value: current, at: now });

    let prior = prior?;
    // checked_duration_since: an earlier `now` than the baseline counts as zero elapsed
    let elapsed = now
        .checked_duration_since(prior.at)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    if elapsed <= 0.0 {
        return None;
    }
    Some((current.saturating_sub(prior.value), elapsed))
}

/// Rate of `identity` per second, floored.
///
/// The first reading of every identity is the warm-up: it only establishes
/// the baseline and is reported as invalid (zero).
pub fn compute_rate(
    store: &mut CounterStore,
    identity: &str,
    current: u64,
    now: Instant,
) -> RateResult {
    match advance(store, identity, current, now) {
        Some((delta, elapsed)) => RateResult {
            per_second: (delta as f64 / elapsed).floor() as u64,
            valid: true,
        },
        None => RateResult::INVALID,
    }
}

/// Share of `busy` ticks over `total` ticks since the last reading, as a
/// percentage in `[0, 100]`.
///
/// Both counters are tracked under `<identity>/busy` and `<identity>/total`.
/// Zero on warm-up or when no ticks elapsed.
pub fn busy_percent(
    store: &mut CounterStore,
    identity: &str,
    busy: u64,
    total: u64,
    now: Instant,
) -> f64 {
    let busy_delta = advance(store, &format!("{identity}/busy"), busy, now);
    let total_delta = advance(store, &format!("{identity}/total"), total, now);
    match (busy_delta, total_delta) {
        (Some((b, _)), Some((t, _))) if t > 0 => (b as f64 / t as f64 * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}
