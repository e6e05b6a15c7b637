use std::time::{Duration, Instant};

/// Cooldown window driven by caller-supplied timestamps.
///
/// Unlike a timer callback, expiry is evaluated lazily with `now >= expiry`
/// so the caller's clock is the only source of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooldown {
    expiry: Option<Instant>,
    duration: Duration,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            expiry: None,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True while `now` is still inside the window opened by the last `arm`
    pub fn is_active(&self, now: Instant) -> bool {
        matches!(self.expiry, Some(expiry) if now < expiry)
    }

    /// Open a new window starting at `now`
    pub fn arm(&mut self, now: Instant) {
        self.expiry = Some(now + self.duration);
    }

    pub fn expiry(&self) -> Option<Instant> {
        self.expiry
    }

    pub fn reset(&mut self) {
        self.expiry = None;
    }
}

/// Collects per-tick processing times for an end-of-run report
#[derive(Debug, Default)]
pub struct TickStats {
    samples_us: Vec<f64>,
}

impl TickStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples_us: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, elapsed: Duration) {
        self.samples_us.push(elapsed.as_secs_f64() * 1_000_000.0);
    }

    pub fn len(&self) -> usize {
        self.samples_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_us.is_empty()
    }

    /// Calculate percentile from sorted data
    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx]
    }

    /// (mean, p50, p95, p99) in microseconds
    pub fn summary(&self) -> (f64, f64, f64, f64) {
        if self.samples_us.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut values = self.samples_us.clone();
        values.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        (
            mean,
            Self::percentile(&values, 50.0),
            Self::percentile(&values, 95.0),
            Self::percentile(&values, 99.0),
        )
    }

    pub fn log_report(&self) {
        if self.samples_us.is_empty() {
            tracing::info!("No tick timing data collected");
            return;
        }

        let (mean, p50, p95, p99) = self.summary();
        tracing::info!(
            "Tick timing over {} ticks: mean {:.0} µs, p50 {:.0} µs, p95 {:.0} µs, p99 {:.0} µs",
            self.samples_us.len(),
            mean,
            p50,
            p95,
            p99
        );
    }
}
