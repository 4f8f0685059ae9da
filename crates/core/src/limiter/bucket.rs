//! Token-bucket state machine with smooth warm-up.
//!
//! Permits accrue over time up to a maximum. While the bucket holds "stored"
//! permits accumulated during idleness, each one costs more wall time to
//! dispense than the stable interval, up to 3x when fully cold; the cost
//! falls linearly as stored permits drain. With a zero warm-up period no
//! permits are ever stored and the bucket degenerates to a plain steady-rate
//! token bucket holding a single permit.
//!
//! All arithmetic is in microseconds since limiter creation. The decision
//! function takes an explicit `now` so tests can drive the clock.

use super::TimeUnit;

const COLD_FACTOR: f64 = 3.0;

pub(super) struct WarmupBucket {
    /// Microseconds between permits at steady state.
    stable_interval: f64,
    /// Permits below this mark dispense at the stable interval.
    threshold_permits: f64,
    /// Upper bound on stored permits.
    max_permits: f64,
    /// Extra micros of cost per stored permit above the threshold.
    slope: f64,
    /// Micros of idleness that accrue one stored permit.
    cooldown_interval: f64,
    stored_permits: f64,
    /// Earliest instant the next permit can be granted.
    next_free_ticket: f64,
}

impl WarmupBucket {
    pub(super) fn new(request_limit: u32, warmup_period: u32, time_unit: TimeUnit) -> Self {
        let stable_interval = time_unit.as_micros() / f64::from(request_limit);
        let warmup = f64::from(warmup_period) * time_unit.as_micros();
        let cold_interval = stable_interval * COLD_FACTOR;

        let threshold_permits = 0.5 * warmup / stable_interval;
        let max_permits = threshold_permits + 2.0 * warmup / (stable_interval + cold_interval);
        let slope = if max_permits > threshold_permits {
            (cold_interval - stable_interval) / (max_permits - threshold_permits)
        } else {
            0.0
        };
        let cooldown_interval = if max_permits > 0.0 {
            warmup / max_permits
        } else {
            stable_interval
        };

        Self {
            stable_interval,
            threshold_permits,
            max_permits,
            slope,
            cooldown_interval,
            // A warm-up bucket starts fully cold.
            stored_permits: max_permits,
            next_free_ticket: 0.0,
        }
    }

    /// Grant one permit if the bucket allows it at `now_micros`.
    pub(super) fn try_admit_at(&mut self, now_micros: u64) -> bool {
        let now = now_micros as f64;
        if now > self.next_free_ticket {
            let accrued = (now - self.next_free_ticket) / self.cooldown_interval;
            self.stored_permits = (self.stored_permits + accrued).min(self.max_permits);
            self.next_free_ticket = now;
        }
        if self.next_free_ticket > now {
            return false;
        }

        let stored_spent = self.stored_permits.min(1.0);
        let fresh = 1.0 - stored_spent;
        let cost =
            self.stored_to_wait(self.stored_permits, stored_spent) + fresh * self.stable_interval;
        self.stored_permits -= stored_spent;
        self.next_free_ticket += cost;
        true
    }

    /// Wall-time cost of taking `take` permits off a pile of `available`
    /// stored permits. Permits above the warm-up threshold are charged along
    /// the linear ramp (trapezoid area), the rest at the stable interval.
    fn stored_to_wait(&self, available: f64, take: f64) -> f64 {
        let above_threshold = (available - self.threshold_permits).max(0.0);
        let take_above = above_threshold.min(take);
        let mut micros = 0.0;
        if take_above > 0.0 {
            let top = self.ramp_interval(above_threshold);
            let bottom = self.ramp_interval(above_threshold - take_above);
            micros += take_above * (top + bottom) / 2.0;
        }
        micros + (take - take_above) * self.stable_interval
    }

    fn ramp_interval(&self, permits_above_threshold: f64) -> f64 {
        self.stable_interval + permits_above_threshold * self.slope
    }
}
