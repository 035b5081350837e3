//! Periodic random streams drained into vectors.
//!
//! [`Comprehension::async_generator`] yields a fixed number of random values,
//! pausing for one tick before each of them. [`Comprehension::async_comprehension`]
//! drains one such stream and [`Comprehension::measure_runtime`] runs several
//! drains side by side to show that their pauses overlap instead of adding up.

use std::time::{Duration, Instant};

use futures::{StreamExt, future::join_all};
use tracing::debug;

use crate::{config::Config, gather::uniform, periodic::Periodic};

#[derive(Clone, Copy, Debug, Default)]
pub struct Comprehension {
    config: Config,
}

impl Comprehension {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a fresh stream of `values_per_drain` values drawn from
    /// `[0, value_bound]`, each preceded by a pause of `tick`.
    pub fn async_generator(&self) -> Periodic<impl FnMut() -> f64 + Send + use<>> {
        let bound = self.config.value_bound;
        Periodic::new(self.config.tick, self.config.values_per_drain, move || {
            uniform(bound)
        })
    }

    /// Drains one generator, keeping the order in which values were produced.
    pub async fn async_comprehension(&self) -> Vec<f64> {
        self.async_generator().collect().await
    }

    /// Runs `drains` comprehensions concurrently and returns the total wall
    /// time.
    pub async fn measure_runtime(&self) -> Duration {
        let start = Instant::now();
        join_all((0..self.config.drains).map(|_| self.async_comprehension())).await;
        let elapsed = start.elapsed();
        debug!(?elapsed, drains = self.config.drains, "measured comprehensions");
        elapsed
    }
}

/// [`Comprehension::async_generator`] with the default configuration.
pub fn async_generator() -> Periodic<impl FnMut() -> f64 + Send + use<>> {
    Comprehension::default().async_generator()
}

/// [`Comprehension::async_comprehension`] with the default configuration.
pub async fn async_comprehension() -> Vec<f64> {
    Comprehension::default().async_comprehension().await
}

/// [`Comprehension::measure_runtime`] with the default configuration.
pub async fn measure_runtime() -> Duration {
    Comprehension::default().measure_runtime().await
}
