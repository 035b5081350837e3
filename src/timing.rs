//! Timing utilities for asynchronous workflows.
//!
//! Provides [`Delay`], a wrapper that holds back its inner future until a
//! deadline has passed, and [`sleep`], a bare delay with nothing behind it.
//!
//! Deadlines are tracked by a single background timer thread that is started
//! lazily on first use. Pending delays hand their waker to that thread and are
//! woken once their deadline is reached, so the types in this module work with
//! any executor: tokio, smol or `futures::executor` alike.

use std::{
    collections::BTreeMap,
    future::Ready,
    ops::{Deref, DerefMut},
    pin::Pin,
    sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError},
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

use pin_project_lite::pin_project;
use tracing::trace;

static TIMER: OnceLock<Timer> = OnceLock::new();

// Roughly 30 years, used when a requested delay overflows `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

pin_project! {
    /// A future that begins polling its inner future only after a deadline.
    ///
    /// The deadline is fixed when the `Delay` is created. Until it passes, every
    /// poll returns [`Poll::Pending`] and the current waker is registered with
    /// the shared timer thread. Once the deadline is reached all polls are
    /// delegated to the inner future.
    ///
    /// Dropping a pending `Delay` withdraws its registration from the timer.
    #[must_use = "futures do nothing unless polled or .awaited"]
    pub struct Delay<F> {
        #[pin]
        future: F,
        due: Instant,
        registration: Option<Registration>,
    }
}

impl<F> Delay<F> {
    /// Creates a new `Delay` that defers the given future by `delay`.
    ///
    /// A more convenient way to construct this is via the
    /// [`delay()`](crate::delay_ext::DelayExt::delay) operator.
    pub fn new(future: F, delay: Duration) -> Self {
        let now = Instant::now();
        let due = now
            .checked_add(delay)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Delay {
            future,
            due,
            registration: None,
        }
    }

    /// The instant after which the inner future is polled.
    pub fn deadline(&self) -> Instant {
        self.due
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.due
    }

    /// Consumes the `Delay` and returns the inner future.
    pub fn inner(self) -> F {
        self.future
    }
}

impl<F> Deref for Delay<F> {
    type Target = F;

    fn deref(&self) -> &Self::Target {
        &self.future
    }
}

impl<F> DerefMut for Delay<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.future
    }
}

impl<F> Future for Delay<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if Instant::now() < *this.due {
            let waker = cx.waker();
            // Only hand a waker to the timer when it differs from the last one,
            // otherwise spurious polls would pile up duplicate entries.
            if !this
                .registration
                .as_ref()
                .is_some_and(|r| r.waker.will_wake(waker))
            {
                trace!(due = ?*this.due, "scheduling delay");
                // Replacing the old registration withdraws its entry.
                *this.registration = Some(timer().register(*this.due, waker.clone()));
            }
            return Poll::Pending;
        }
        this.registration.take();
        this.future.poll(cx)
    }
}

/// A [`Delay`] around a future that is immediately ready.
pub type Sleep = Delay<Ready<()>>;

/// Returns a future that completes once `duration` has elapsed.
pub fn sleep(duration: Duration) -> Sleep {
    Delay::new(std::future::ready(()), duration)
}

/// Number of deadlines currently waiting in the shared timer.
///
/// Each pending, registered [`Delay`] accounts for one entry. Entries leave
/// when their deadline fires or when their `Delay` is dropped.
pub fn pending_deadlines() -> usize {
    TIMER.get().map_or(0, |timer| timer.shared.lock().entries.len())
}

// Entries are keyed by deadline first, then by a sequence number that keeps
// equal deadlines apart.
type Key = (Instant, u64);

/// A live timer entry, removed from the queue when dropped.
struct Registration {
    key: Key,
    waker: Waker,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(timer) = TIMER.get() {
            timer.shared.lock().entries.remove(&self.key);
        }
    }
}

#[derive(Default)]
struct Queue {
    entries: BTreeMap<Key, Waker>,
    next_seq: u64,
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    signal: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Timer {
    shared: Arc<Shared>,
}

impl Timer {
    fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let driver = Arc::clone(&shared);
        std::thread::Builder::new()
            .name("gatherwait-timer".into())
            .spawn(move || drive(&driver))
            .expect("Timer thread creation failed");
        Timer { shared }
    }

    fn register(&self, due: Instant, waker: Waker) -> Registration {
        let mut queue = self.shared.lock();
        let key = (due, queue.next_seq);
        queue.next_seq = queue.next_seq.wrapping_add(1);
        queue.entries.insert(key, waker.clone());
        drop(queue);
        self.shared.signal.notify_one();
        Registration { key, waker }
    }
}

fn timer() -> &'static Timer {
    TIMER.get_or_init(Timer::start)
}

fn drive(shared: &Shared) {
    let mut queue = shared.lock();
    loop {
        let now = Instant::now();
        let mut fired = Vec::new();
        while let Some(entry) = queue.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            fired.push(entry.remove());
        }

        if !fired.is_empty() {
            // Wake outside the lock so woken tasks can re-register immediately.
            drop(queue);
            trace!(count = fired.len(), "timer fired");
            fired.into_iter().for_each(Waker::wake);
            queue = shared.lock();
            continue;
        }

        let next_due = queue.entries.first_key_value().map(|(&(due, _), _)| due);
        queue = match next_due {
            Some(due) => shared
                .signal
                .wait_timeout(queue, due.saturating_duration_since(now))
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0),
            None => shared
                .signal
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner),
        };
    }
}
