//! Admission control: a process-local token-bucket rate limiter with smooth
//! warm-up. One shared instance gates every create-document request.

mod bucket;

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Instant;

use thiserror::Error;

use bucket::WarmupBucket;

/// Unit of the configured rate and warm-up period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in microseconds.
    pub fn as_micros(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1e-3,
            TimeUnit::Microseconds => 1.0,
            TimeUnit::Milliseconds => 1e3,
            TimeUnit::Seconds => 1e6,
            TimeUnit::Minutes => 60.0 * 1e6,
            TimeUnit::Hours => 3_600.0 * 1e6,
            TimeUnit::Days => 86_400.0 * 1e6,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Nanoseconds => "NANOSECONDS",
            TimeUnit::Microseconds => "MICROSECONDS",
            TimeUnit::Milliseconds => "MILLISECONDS",
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
        };
        f.write_str(name)
    }
}

impl FromStr for TimeUnit {
    type Err = LimiterConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NANOSECONDS" => Ok(TimeUnit::Nanoseconds),
            "MICROSECONDS" => Ok(TimeUnit::Microseconds),
            "MILLISECONDS" => Ok(TimeUnit::Milliseconds),
            "SECONDS" => Ok(TimeUnit::Seconds),
            "MINUTES" => Ok(TimeUnit::Minutes),
            "HOURS" => Ok(TimeUnit::Hours),
            "DAYS" => Ok(TimeUnit::Days),
            other => Err(LimiterConfigError::UnknownTimeUnit(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LimiterConfigError {
    #[error("unknown time unit: {0}")]
    UnknownTimeUnit(String),
    #[error("request limit must be positive")]
    ZeroRequestLimit,
}

/// Limiter settings: `request_limit` permits per `time_unit`, ramping up over
/// `warmup_period` units after a cold start or long idle stretch.
#[derive(Debug, Clone, Copy)]
pub struct LimiterConfig {
    pub request_limit: u32,
    pub warmup_period: u32,
    pub time_unit: TimeUnit,
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<(), LimiterConfigError> {
        if self.request_limit == 0 {
            return Err(LimiterConfigError::ZeroRequestLimit);
        }
        Ok(())
    }
}

/// Token-bucket admission limiter.
///
/// `try_admit` is non-blocking and safe under concurrent callers: the bucket
/// sits behind a short critical section, so exactly one caller per available
/// permit succeeds.
pub struct AdmissionLimiter {
    bucket: Mutex<WarmupBucket>,
    origin: Instant,
    config: LimiterConfig,
}

impl AdmissionLimiter {
    pub fn new(config: LimiterConfig) -> Result<Self, LimiterConfigError> {
        config.validate()?;
        Ok(Self {
            bucket: Mutex::new(WarmupBucket::new(
                config.request_limit,
                config.warmup_period,
                config.time_unit,
            )),
            origin: Instant::now(),
            config,
        })
    }

    /// Consume one permit if available right now. Never blocks.
    pub fn try_admit(&self) -> bool {
        let now = self.origin.elapsed().as_micros() as u64;
        self.bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .try_admit_at(now)
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn time_unit_parses_all_names() {
        for name in [
            "NANOSECONDS",
            "MICROSECONDS",
            "MILLISECONDS",
            "SECONDS",
            "MINUTES",
            "HOURS",
            "DAYS",
        ] {
            let unit: TimeUnit = name.parse().unwrap();
            assert_eq!(unit.to_string(), name);
        }
        assert!("FORTNIGHTS".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn zero_request_limit_rejected() {
        let config = LimiterConfig {
            request_limit: 0,
            warmup_period: 0,
            time_unit: TimeUnit::Seconds,
        };
        assert!(AdmissionLimiter::new(config).is_err());
    }

    #[test]
    fn concurrent_burst_admits_exactly_one() {
        // Stable interval of 30 minutes: the fresh bucket holds a single
        // immediately-available permit, so one of the racing threads wins.
        let limiter = Arc::new(
            AdmissionLimiter::new(LimiterConfig {
                request_limit: 2,
                warmup_period: 0,
                time_unit: TimeUnit::Hours,
            })
            .unwrap(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.try_admit())
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.join().unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }
}
