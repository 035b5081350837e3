//! Defines the `Task` struct and related functionality.
//!
//! A `Task` wraps a unit of asynchronous work into an explicitly schedulable
//! object. Every task comes with a [`TaskHandle`] that can cancel it
//! independently of any other task it is gathered or spawned with.
use std::{
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    task::{Context, Poll},
};

use futures::task::AtomicWaker;
use pin_project_lite::pin_project;
use tracing::debug;

use crate::error::{Error, Result};

const PENDING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELED: u8 = 2;

// Shared between a task and all of its handles. `status` leaves `PENDING` at
// most once, so a task is never both completed and canceled.
struct TaskState {
    status: AtomicU8,
    waker: AtomicWaker,
}

/// A handle for canceling a task.
///
/// Canceling a task that has not yet been polled prevents it from starting.
/// Canceling a pending task wakes it so it resolves with [`Error::Canceled`] on
/// its next poll. If the task has already completed, cancellation has no effect.
/// This handle is obtained by calling [`Task::handle`].
#[derive(Clone)]
pub struct TaskHandle {
    state: Arc<TaskState>,
}

impl TaskHandle {
    /// Marks the task for cancellation and wakes it.
    pub fn cancel(&self) {
        if self
            .state
            .status
            .compare_exchange(PENDING, CANCELED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("canceling task");
            self.state.waker.wake();
        }
    }

    /// Returns `true` if cancellation was requested before completion.
    pub fn is_canceled(&self) -> bool {
        self.state.status.load(Ordering::Acquire) == CANCELED
    }

    /// Returns `true` once the task has produced its output.
    pub fn is_completed(&self) -> bool {
        self.state.status.load(Ordering::Acquire) == COMPLETED
    }
}

pin_project! {
    /// A schedulable, cancellable asynchronous task.
    ///
    /// Awaiting a `Task` drives the wrapped future and yields `Ok(output)`, or
    /// `Err(Error::Canceled)` when [`TaskHandle::cancel`] was called first.
    /// Tasks can be awaited directly, gathered with other tasks, or spawned on
    /// any executor.
    #[must_use = "futures do nothing unless polled or .awaited"]
    pub struct Task<F> {
        #[pin]
        future: F,
        state: Arc<TaskState>,
    }
}

impl<F> Task<F>
where
    F: Future,
{
    /// Creates a new task with the given future.
    ///
    /// The task does not start running immediately; it must be `.awaited`
    /// or handed to an executor.
    pub fn new(future: F) -> Self {
        Self {
            future,
            state: Arc::new(TaskState {
                status: AtomicU8::new(PENDING),
                waker: AtomicWaker::new(),
            }),
        }
    }

    /// Returns a handle for canceling the task.
    #[must_use]
    pub fn handle(&self) -> TaskHandle {
        TaskHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl<F> Future for Task<F>
where
    F: Future,
{
    type Output = Result<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        this.state.waker.register(cx.waker());
        if this.state.status.load(Ordering::Acquire) == CANCELED {
            return Poll::Ready(Err(Error::Canceled));
        }
        match this.future.poll(cx) {
            // A cancel that lands while the future is finishing wins: the
            // output is discarded so the result agrees with the handle.
            Poll::Ready(output) => match this.state.status.compare_exchange(
                PENDING,
                COMPLETED,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => Poll::Ready(Ok(output)),
                Err(_) => Poll::Ready(Err(Error::Canceled)),
            },
            Poll::Pending => Poll::Pending,
        }
    }
}
