//! Random delays gathered concurrently.
//!
//! [`Gather`] launches many random-delay futures at once, waits for all of
//! them and hands back the drawn delays in ascending order. The same fan-out
//! is offered over bare futures ([`Gather::wait_n`]) and over cancellable
//! [`Task`] wrappers ([`Gather::task_wait_n`]).
//!
//! The free functions at the bottom of this module run with
//! [`Config::default()`], where one unit of delay is one second of wall time.

use std::time::{Duration, Instant};

use futures::{executor::block_on, future::join_all};
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::Result,
    task::Task,
    timing::sleep,
};

/// Fan-out over random delays.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gather {
    config: Config,
}

impl Gather {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draws a delay uniformly from `[0, max_delay]`, suspends for that many
    /// time units and returns the drawn value.
    ///
    /// A negative, NaN or infinite bound is treated as `0`.
    pub async fn wait_random(&self, max_delay: f64) -> f64 {
        random_delay(self.config.time_unit, max_delay).await
    }

    /// Runs `n` [`wait_random`](Self::wait_random) calls concurrently and
    /// returns their delays sorted ascending.
    ///
    /// The order reflects the drawn values, not completion order.
    pub async fn wait_n(&self, n: usize, max_delay: f64) -> Vec<f64> {
        debug!(n, max_delay, "gathering delays");
        let mut delays = join_all((0..n).map(|_| self.wait_random(max_delay))).await;
        delays.sort_by(f64::total_cmp);
        delays
    }

    /// Blocks on [`wait_n`](Self::wait_n) and returns the average wall time
    /// per gathered delay.
    ///
    /// Returns [`Duration::ZERO`] when `n` is `0`.
    pub fn measure_time(&self, n: usize, max_delay: f64) -> Duration {
        let start = Instant::now();
        block_on(self.wait_n(n, max_delay));
        let elapsed = start.elapsed();
        debug!(?elapsed, n, "measured gather");
        if n == 0 {
            return Duration::ZERO;
        }
        elapsed.div_f64(n as f64)
    }

    /// Wraps a single [`wait_random`](Self::wait_random) into a [`Task`] that
    /// can be canceled through its handle.
    pub fn task_wait_random(&self, max_delay: f64) -> Task<impl Future<Output = f64> + Send + use<>> {
        Task::new(random_delay(self.config.time_unit, max_delay))
    }

    /// Same contract as [`wait_n`](Self::wait_n), with every unit wrapped in a
    /// [`Task`] before being gathered.
    ///
    /// Use [`gather_tasks`] to keep the handles and cancel individual units.
    pub async fn task_wait_n(&self, n: usize, max_delay: f64) -> Vec<f64> {
        debug!(n, max_delay, "gathering delay tasks");
        let tasks = (0..n).map(|_| self.task_wait_random(max_delay));
        // No handle leaves this function, so every task resolves to `Ok`.
        let mut delays: Vec<f64> = join_all(tasks).await.into_iter().flatten().collect();
        delays.sort_by(f64::total_cmp);
        delays
    }
}

/// Gathers caller-built delay tasks and returns their values sorted ascending.
///
/// Every task is driven to its end, canceled or not.
///
/// # Errors
///
/// Returns [`Error::Canceled`](crate::Error::Canceled) if any task was
/// canceled through its handle before it finished.
pub async fn gather_tasks<F>(tasks: impl IntoIterator<Item = Task<F>>) -> Result<Vec<f64>>
where
    F: Future<Output = f64>,
{
    let mut delays = join_all(tasks)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
    delays.sort_by(f64::total_cmp);
    Ok(delays)
}

async fn random_delay(time_unit: Duration, max_delay: f64) -> f64 {
    let delay = uniform(max_delay);
    let pause = Duration::try_from_secs_f64(time_unit.as_secs_f64() * delay).unwrap_or(Duration::MAX);
    sleep(pause).await;
    delay
}

/// Draws a value uniformly from `[0, bound]`.
pub(crate) fn uniform(bound: f64) -> f64 {
    if !bound.is_finite() || bound < 0.0 {
        warn!(bound, "invalid upper bound, using 0");
        return 0.0;
    }
    if bound == 0.0 {
        return 0.0;
    }
    rand::thread_rng().gen_range(0.0..=bound)
}

/// [`Gather::wait_random`] with the default configuration.
pub async fn wait_random(max_delay: f64) -> f64 {
    Gather::default().wait_random(max_delay).await
}

/// [`Gather::wait_n`] with the default configuration.
pub async fn wait_n(n: usize, max_delay: f64) -> Vec<f64> {
    Gather::default().wait_n(n, max_delay).await
}

/// [`Gather::measure_time`] with the default configuration.
pub fn measure_time(n: usize, max_delay: f64) -> Duration {
    Gather::default().measure_time(n, max_delay)
}

/// [`Gather::task_wait_random`] with the default configuration.
pub fn task_wait_random(max_delay: f64) -> Task<impl Future<Output = f64> + Send + use<>> {
    Gather::default().task_wait_random(max_delay)
}

/// [`Gather::task_wait_n`] with the default configuration.
pub async fn task_wait_n(n: usize, max_delay: f64) -> Vec<f64> {
    Gather::default().task_wait_n(n, max_delay).await
}
