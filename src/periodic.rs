use std::{
    pin::Pin,
    task::{Context, Poll, ready},
    time::Duration,
};

use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;
use tracing::trace;

use crate::timing::{Sleep, sleep};

pin_project! {
    /// A finite stream that yields `generator()` once per interval.
    ///
    /// Each item is preceded by a full `interval` of suspension, counted from
    /// the poll that asks for it. After `count` items the stream is exhausted
    /// and keeps returning `None`; a new `Periodic` is needed to start over.
    #[must_use = "streams do nothing unless polled"]
    pub struct Periodic<G> {
        generator: G,
        interval: Duration,
        remaining: usize,
        tick: Option<Sleep>,
    }
}

impl<G, T> Periodic<G>
where
    G: FnMut() -> T,
{
    pub fn new(interval: Duration, count: usize, generator: G) -> Self {
        Self {
            generator,
            interval,
            remaining: count,
            tick: None,
        }
    }

    /// Items still to be produced.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<G, T> Stream for Periodic<G>
where
    G: FnMut() -> T,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.remaining == 0 {
            return Poll::Ready(None);
        }

        let interval = *this.interval;
        let tick = this.tick.get_or_insert_with(|| sleep(interval));
        ready!(Pin::new(tick).poll(cx));

        *this.tick = None;
        *this.remaining -= 1;
        trace!(remaining = *this.remaining, "periodic tick");
        Poll::Ready(Some((this.generator)()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<G, T> FusedStream for Periodic<G>
where
    G: FnMut() -> T,
{
    fn is_terminated(&self) -> bool {
        self.remaining == 0
    }
}
