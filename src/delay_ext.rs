use std::time::Duration;

use crate::timing::Delay;

/// Extend `Future` with time-based operations.
pub trait DelayExt: Future {
    /// Holds this future back until `duration` has elapsed from now.
    ///
    /// ```
    /// # use gatherwait::delay_ext::DelayExt;
    /// # use std::time::Duration;
    /// # futures::executor::block_on(async {
    /// let answer = async { 42 }.delay(Duration::from_millis(5)).await;
    /// assert_eq!(answer, 42);
    /// # });
    /// ```
    fn delay(self, duration: Duration) -> Delay<Self>
    where
        Self: Sized,
    {
        Delay::new(self, duration)
    }
}

impl<T> DelayExt for T where T: Future {}
